use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::{BehindTextError, BehindTextResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded raster image in premultiplied RGBA8 form.
///
/// Cloning is cheap: the pixel buffer is shared and never mutated after decoding.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl RasterImage {
    /// Wrap an already premultiplied RGBA8 buffer.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> BehindTextResult<Self> {
        if width == 0 || height == 0 {
            return Err(BehindTextError::validation("image width/height must be non-zero"));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| BehindTextError::validation("image buffer size overflow"))?;
        if data.len() != expected {
            return Err(BehindTextError::validation(format!(
                "image buffer has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }

    /// Wrap a straight-alpha RGBA8 buffer, premultiplying it.
    pub fn from_straight_rgba8(width: u32, height: u32, mut data: Vec<u8>) -> BehindTextResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul_rgba8(width, height, data)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Native size as a canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Return `true` when both handles share the same pixel buffer.
    pub fn same_pixels(&self, other: &RasterImage) -> bool {
        Arc::ptr_eq(&self.rgba8_premul, &other.rgba8_premul)
    }
}

/// Upload formats accepted by the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadFormat {
    /// JPEG (`image/jpeg`, `image/jpg`).
    Jpeg,
    /// PNG (`image/png`).
    Png,
}

impl UploadFormat {
    /// Map a declared MIME type onto an accepted format.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// Sniff encoded bytes and accept only JPEG or PNG.
///
/// When `declared_mime` is given it must also name an accepted type.
pub fn sniff_upload_format(bytes: &[u8], declared_mime: Option<&str>) -> BehindTextResult<UploadFormat> {
    if let Some(mime) = declared_mime
        && UploadFormat::from_mime(mime).is_none()
    {
        return Err(BehindTextError::upload(format!(
            "invalid file type '{mime}': only JPEG or PNG images are accepted"
        )));
    }
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => Ok(UploadFormat::Jpeg),
        Ok(image::ImageFormat::Png) => Ok(UploadFormat::Png),
        Ok(other) => Err(BehindTextError::upload(format!(
            "invalid file type {other:?}: only JPEG or PNG images are accepted"
        ))),
        Err(_) => Err(BehindTextError::upload(
            "unrecognised file type: only JPEG or PNG images are accepted",
        )),
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> BehindTextResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    RasterImage::from_straight_rgba8(width, height, rgba.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
