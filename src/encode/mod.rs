use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::GifwrightResult;

/// GIF stream serialization.
pub mod gif;
/// Reading encoded GIFs back for inspection.
pub mod probe;

/// Create the parent directory of `path` if it does not exist.
pub fn ensure_parent_dir(path: &Path) -> GifwrightResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Write an encoded artifact in one blocking call.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> GifwrightResult<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "artifact written");
    Ok(())
}
