//! Sticker creation seam and the built-in outline sticker.

use crate::assets::decode::RasterImage;
use crate::effects::composite::{ShadowParams, cast_shadow, over_in_place};
use crate::foundation::error::{BehindTextError, BehindTextResult};
use crate::foundation::math::mul_div255_u8;
use crate::scene::model::StickerSettings;

/// Turns a cut-out subject into a "sticker": the same image with a border and a drop shadow.
pub trait StickerMaker {
    /// Build the stickerized subject. The result must keep the subject's pixel size.
    fn create_sticker(
        &self,
        subject: &RasterImage,
        opts: &StickerSettings,
    ) -> BehindTextResult<RasterImage>;
}

impl<F> StickerMaker for F
where
    F: Fn(&RasterImage, &StickerSettings) -> BehindTextResult<RasterImage>,
{
    fn create_sticker(
        &self,
        subject: &RasterImage,
        opts: &StickerSettings,
    ) -> BehindTextResult<RasterImage> {
        self(subject, opts)
    }
}

/// Grows the subject silhouette by the border width, fills the ring with the border colour and
/// casts a blurred shadow of the whole silhouette underneath.
#[derive(Clone, Copy, Debug, Default)]
pub struct OutlineSticker;

impl StickerMaker for OutlineSticker {
    #[tracing::instrument(skip_all, fields(w = subject.width(), h = subject.height()))]
    fn create_sticker(
        &self,
        subject: &RasterImage,
        opts: &StickerSettings,
    ) -> BehindTextResult<RasterImage> {
        let (w, h) = (subject.width(), subject.height());
        let src = subject.data();
        if !src.chunks_exact(4).any(|px| px[3] != 0) {
            return Err(BehindTextError::sticker(
                "subject image is fully transparent",
            ));
        }

        let radius = opts.border_width.max(0.0).round() as u32;
        let alpha: Vec<u8> = src.chunks_exact(4).map(|px| px[3]).collect();
        let grown = dilate_disc(&alpha, w, h, radius);

        let border = opts.border_color.to_premul().to_array();
        let mut silhouette = Vec::with_capacity(src.len());
        for &a in &grown {
            let a = u16::from(a);
            silhouette.extend(border.map(|c| mul_div255_u8(u16::from(c), a)));
        }

        let shadow = ShadowParams {
            color: opts
                .shadow_color
                .with_opacity(opts.shadow_opacity / 100.0),
            blur: opts.shadow_blur,
            offset_x: opts.shadow_offset_x,
            offset_y: opts.shadow_offset_y,
        };
        let mut out = if shadow.is_invisible() {
            vec![0u8; src.len()]
        } else {
            cast_shadow(&silhouette, w, h, &shadow)?
        };
        over_in_place(&mut out, &silhouette, 1.0)?;
        over_in_place(&mut out, src, 1.0)?;

        RasterImage::from_premul_rgba8(w, h, out)
    }
}

/// Grayscale dilation with a disc-shaped structuring element.
///
/// The disc is split into one horizontal span per row offset, and each span is a 1-D running
/// max, so the cost is linear in the radius instead of quadratic.
fn dilate_disc(alpha: &[u8], width: u32, height: u32, radius: u32) -> Vec<u8> {
    if radius == 0 {
        return alpha.to_vec();
    }
    let (w, h) = (width as usize, height as usize);
    let r = i64::from(radius);
    let spans: Vec<(i64, usize)> = (-r..=r).map(|dy| (dy, isqrt(r * r - dy * dy))).collect();

    let mut out = vec![0u8; alpha.len()];
    let mut scratch = RunningMax::default();
    for y in 0..h {
        let dst = &mut out[y * w..(y + 1) * w];
        for &(dy, half) in &spans {
            let sy = y as i64 + dy;
            if sy < 0 || sy >= h as i64 {
                continue;
            }
            let src = &alpha[sy as usize * w..(sy as usize + 1) * w];
            scratch.max_into(src, half, dst);
        }
    }
    out
}

fn isqrt(v: i64) -> usize {
    let mut s = (v as f64).sqrt() as i64;
    while s * s > v {
        s -= 1;
    }
    while (s + 1) * (s + 1) <= v {
        s += 1;
    }
    s as usize
}

/// Van Herk/Gil-Werman sliding-window max over a zero-padded row.
#[derive(Default)]
struct RunningMax {
    padded: Vec<u8>,
    prefix: Vec<u8>,
    suffix: Vec<u8>,
}

impl RunningMax {
    /// `dst[x] = max(dst[x], max(src[x - half..=x + half]))`, reading outside `src` as 0.
    fn max_into(&mut self, src: &[u8], half: usize, dst: &mut [u8]) {
        if half == 0 {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = (*d).max(s);
            }
            return;
        }
        let n = 2 * half + 1;
        let len = src.len() + 2 * half;
        self.padded.clear();
        self.padded.resize(len, 0);
        self.padded[half..half + src.len()].copy_from_slice(src);
        self.prefix.resize(len, 0);
        self.suffix.resize(len, 0);

        for i in 0..len {
            let v = self.padded[i];
            self.prefix[i] = if i % n == 0 { v } else { self.prefix[i - 1].max(v) };
        }
        for i in (0..len).rev() {
            let v = self.padded[i];
            self.suffix[i] = if i + 1 == len || (i + 1) % n == 0 {
                v
            } else {
                self.suffix[i + 1].max(v)
            };
        }
        for (x, d) in dst.iter_mut().enumerate() {
            *d = (*d).max(self.suffix[x].max(self.prefix[x + n - 1]));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sticker.rs"]
mod tests;
