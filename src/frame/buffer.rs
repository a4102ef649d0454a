use image::{DynamicImage, RgbImage, RgbaImage, imageops::FilterType};

use crate::foundation::core::Rgb8;
use crate::foundation::error::{GifwrightError, GifwrightResult};

/// A rendered frame as opaque RGB8 pixels.
///
/// Alpha only exists while drawing collaborators composite; by the time a frame reaches a
/// [`FrameSequence`](crate::FrameSequence) it is flattened to three channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgb {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRgb {
    /// Wrap raw RGB8 bytes, checking the length against `width * height * 3`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> GifwrightResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(3);
        if data.len() != expected {
            return Err(GifwrightError::validation(format!(
                "frame data has {} bytes, expected {expected} for {width}x{height} rgb8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Rgb8) -> Self {
        let n = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(n * 3);
        for _ in 0..n {
            data.extend_from_slice(&color.to_array());
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Read one pixel. Returns `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        Some(Rgb8::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Overwrite one pixel. Writes outside the frame are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgb8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        self.data[i..i + 3].copy_from_slice(&color.to_array());
    }

    /// Copy into an [`image::RgbImage`].
    pub fn to_image(&self) -> GifwrightResult<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| GifwrightError::validation("frame data does not match its dimensions"))
    }

    /// Resample to `width x height` with a Lanczos3 filter.
    ///
    /// Returns a clone when the size already matches.
    pub fn resized(&self, width: u32, height: u32) -> GifwrightResult<Self> {
        if self.width == width && self.height == height {
            return Ok(self.clone());
        }
        if width == 0 || height == 0 {
            return Err(GifwrightError::validation(format!(
                "cannot resize frame to {width}x{height}"
            )));
        }
        let src = self.to_image()?;
        let out = image::imageops::resize(&src, width, height, FilterType::Lanczos3);
        Ok(Self::from(out))
    }
}

impl From<RgbImage> for FrameRgb {
    fn from(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

impl From<RgbaImage> for FrameRgb {
    /// Drops the alpha channel, keeping the stored colour values.
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for px in img.as_raw().chunks_exact(4) {
            data.extend_from_slice(&px[..3]);
        }
        Self {
            width,
            height,
            data,
        }
    }
}

impl From<DynamicImage> for FrameRgb {
    fn from(img: DynamicImage) -> Self {
        Self::from(img.into_rgb8())
    }
}

impl From<&FrameRgb> for FrameRgb {
    fn from(frame: &FrameRgb) -> Self {
        frame.clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/buffer.rs"]
mod tests;
