/// Convenience result type used across gifwright.
pub type GifwrightResult<T> = Result<T, GifwrightError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum GifwrightError {
    /// Invalid caller-provided parameters (dimensions, fps, colour counts).
    #[error("validation error: {0}")]
    Validation(String),

    /// An artifact was requested from a sequence that holds no frames.
    #[error("no content: {0}")]
    Empty(String),

    /// Palette synthesis could not produce a usable colour table.
    #[error("quantization error: {0}")]
    Quantize(String),

    /// The animated image could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifwrightError {
    /// Build a [`GifwrightError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GifwrightError::Empty`] value.
    pub fn empty(msg: impl Into<String>) -> Self {
        Self::Empty(msg.into())
    }

    /// Build a [`GifwrightError::Quantize`] value.
    pub fn quantize(msg: impl Into<String>) -> Self {
        Self::Quantize(msg.into())
    }

    /// Build a [`GifwrightError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

impl From<std::io::Error> for GifwrightError {
    fn from(e: std::io::Error) -> Self {
        Self::Other(anyhow::Error::new(e))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
