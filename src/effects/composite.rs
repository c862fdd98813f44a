use crate::assets::color::Color;
use crate::effects::blur::blur_sigma_rgba8_premul;
use crate::foundation::error::{BehindTextError, BehindTextResult};
use crate::foundation::math::mul_div255_u16;

pub type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel, with `src` scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u16(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - sa;

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u16(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u16(u16::from(src[i]), op);
        let dc = mul_div255_u16(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Source-over of a whole buffer onto `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> BehindTextResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(BehindTextError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    if opacity <= 0.0 {
        return Ok(());
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Parameters of a drop shadow cast from a layer's alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowParams {
    /// Shadow colour; its alpha scales the cast coverage.
    pub color: Color,
    /// Canvas-style blur radius in pixels (gaussian sigma is half of it).
    pub blur: f64,
    /// X offset in pixels.
    pub offset_x: f64,
    /// Y offset in pixels.
    pub offset_y: f64,
}

impl ShadowParams {
    /// Return `true` when the shadow would draw nothing.
    pub fn is_invisible(&self) -> bool {
        self.color.a == 0
    }
}

/// Cast a shadow from the alpha of `src`: tint with `color`, shift by the offsets (rounded to
/// whole pixels), then blur.
pub fn cast_shadow(
    src: &[u8],
    width: u32,
    height: u32,
    shadow: &ShadowParams,
) -> BehindTextResult<Vec<u8>> {
    let expected_len = (width as usize) * (height as usize) * 4;
    if src.len() != expected_len {
        return Err(BehindTextError::render(
            "cast_shadow expects src matching width*height*4",
        ));
    }
    let tint = shadow.color.to_premul().to_array();
    let dx = shadow.offset_x.round() as i64;
    let dy = shadow.offset_y.round() as i64;
    let (w, h) = (i64::from(width), i64::from(height));

    let mut out = vec![0u8; expected_len];
    for y in 0..h {
        let sy = y - dy;
        if sy < 0 || sy >= h {
            continue;
        }
        for x in 0..w {
            let sx = x - dx;
            if sx < 0 || sx >= w {
                continue;
            }
            let a = u16::from(src[((sy * w + sx) as usize) * 4 + 3]);
            if a == 0 {
                continue;
            }
            let o = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                out[o + c] = mul_div255_u16(u16::from(tint[c]), a) as u8;
            }
        }
    }

    blur_sigma_rgba8_premul(&out, width, height, shadow.blur / 2.0)
}

/// Flatten premultiplied RGBA8 over an opaque straight-alpha background into opaque RGBA8.
pub fn flatten_premul_over_bg(
    dst: &mut [u8],
    src_premul: &[u8],
    bg: Color,
) -> BehindTextResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(BehindTextError::render(
            "flatten_premul_over_bg expects equal-length rgba8 buffers",
        ));
    }

    let bg = [u16::from(bg.r), u16::from(bg.g), u16::from(bg.b)];
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let inv = 255u16 - u16::from(s[3]);
        for c in 0..3 {
            d[c] = (u16::from(s[c]) + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

fn add_sat_u8(a: u16, b: u16) -> u8 {
    (a + b).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
