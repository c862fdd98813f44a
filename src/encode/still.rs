use image::ImageEncoder as _;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;

use crate::assets::color::Color;
use crate::effects::composite::flatten_premul_over_bg;
use crate::foundation::error::{BehindTextError, BehindTextResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::surface::FrameRGBA;

/// JPEG quality used for still export.
pub const JPEG_QUALITY: u8 = 90;

/// Encoded still-image formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StillFormat {
    /// Lossless, keeps transparency.
    #[default]
    Png,
    /// Lossy, flattened over black.
    Jpeg,
}

impl StillFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Suggested download name.
    pub fn file_name(self) -> String {
        format!("behindtext-effect.{}", self.extension())
    }
}

/// Encode one composited frame.
#[tracing::instrument(skip(frame), fields(w = frame.width, h = frame.height))]
pub fn encode_still(frame: &FrameRGBA, format: StillFormat) -> BehindTextResult<Vec<u8>> {
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.width == 0 || frame.height == 0 || frame.data.len() != expected {
        return Err(BehindTextError::validation(format!(
            "frame buffer has {} bytes, expected {expected} for {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let mut out = Vec::new();
    match format {
        StillFormat::Png => {
            let mut straight = frame.data.clone();
            if frame.premultiplied {
                unpremultiply_rgba8_in_place(&mut straight);
            }
            PngEncoder::new(&mut out)
                .write_image(
                    &straight,
                    frame.width,
                    frame.height,
                    image::ExtendedColorType::Rgba8,
                )
                .map_err(|e| BehindTextError::export(format!("encode png: {e}")))?;
        }
        StillFormat::Jpeg => {
            let mut premul = frame.data.clone();
            if !frame.premultiplied {
                crate::foundation::math::premultiply_rgba8_in_place(&mut premul);
            }
            let mut flat = vec![0u8; premul.len()];
            flatten_premul_over_bg(&mut flat, &premul, Color::BLACK)?;
            let rgb: Vec<u8> = flat
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
                .write_image(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
                .map_err(|e| BehindTextError::export(format!("encode jpeg: {e}")))?;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/still.rs"]
mod tests;
