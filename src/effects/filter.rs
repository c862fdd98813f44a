//! CSS-style colour filter chain: `brightness() contrast() saturate() blur()`.

use std::fmt;

use crate::effects::blur::blur_sigma_rgba8_premul;
use crate::foundation::error::BehindTextResult;
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::scene::model::ImageLayerSettings;

/// Filter chain applied to an image layer, in fixed order.
///
/// Percentages follow CSS: `100` is neutral. Neutral steps are skipped entirely so that a chain of
/// all-neutral values leaves pixels bit-identical.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterChain {
    /// Brightness percentage.
    pub brightness: f64,
    /// Contrast percentage.
    pub contrast: f64,
    /// Saturation percentage.
    pub saturate: f64,
    /// Gaussian blur standard deviation in pixels.
    pub blur_px: f64,
}

impl FilterChain {
    /// Chain that changes nothing.
    pub const IDENTITY: FilterChain = FilterChain {
        brightness: 100.0,
        contrast: 100.0,
        saturate: 100.0,
        blur_px: 0.0,
    };

    /// Chain described by an image layer's settings.
    pub fn from_layer(layer: &ImageLayerSettings) -> Self {
        Self {
            brightness: layer.brightness,
            contrast: layer.contrast,
            saturate: layer.saturation,
            blur_px: layer.blur,
        }
    }

    /// Return `true` when applying this chain is a no-op.
    pub fn is_identity(&self) -> bool {
        !self.has_color_ops() && self.blur_px <= 0.0
    }

    fn has_color_ops(&self) -> bool {
        self.brightness != 100.0 || self.contrast != 100.0 || self.saturate != 100.0
    }

    /// Apply the chain to a premultiplied RGBA8 buffer.
    pub fn apply_in_place(&self, rgba: &mut [u8], width: u32, height: u32) -> BehindTextResult<()> {
        if self.has_color_ops() {
            unpremultiply_rgba8_in_place(rgba);
            for px in rgba.chunks_exact_mut(4) {
                if px[3] == 0 {
                    continue;
                }
                let rgb = [px[0], px[1], px[2]].map(|c| f64::from(c) / 255.0);
                let rgb = self.color_ops(rgb);
                for (dst, v) in px[..3].iter_mut().zip(rgb) {
                    *dst = (v * 255.0).round().clamp(0.0, 255.0) as u8;
                }
            }
            premultiply_rgba8_in_place(rgba);
        }
        if self.blur_px > 0.0 {
            let blurred = blur_sigma_rgba8_premul(rgba, width, height, self.blur_px)?;
            rgba.copy_from_slice(&blurred);
        }
        Ok(())
    }

    fn color_ops(&self, mut rgb: [f64; 3]) -> [f64; 3] {
        if self.brightness != 100.0 {
            let k = self.brightness / 100.0;
            rgb = rgb.map(|c| (c * k).clamp(0.0, 1.0));
        }
        if self.contrast != 100.0 {
            let k = self.contrast / 100.0;
            rgb = rgb.map(|c| ((c - 0.5) * k + 0.5).clamp(0.0, 1.0));
        }
        if self.saturate != 100.0 {
            let s = self.saturate / 100.0;
            let [r, g, b] = rgb;
            rgb = [
                (0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * b,
                (0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * b,
                (0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * b,
            ]
            .map(|c| c.clamp(0.0, 1.0));
        }
        rgb
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for FilterChain {
    /// CSS filter string; `blur` is omitted when zero.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "brightness({}%) contrast({}%) saturate({}%)",
            self.brightness, self.contrast, self.saturate
        )?;
        if self.blur_px > 0.0 {
            write!(f, " blur({}px)", self.blur_px)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filter.rs"]
mod tests;
