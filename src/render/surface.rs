use std::sync::Arc;

use crate::assets::decode::RasterImage;
use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::{BehindTextError, BehindTextResult};

/// A rendered frame as RGBA8 pixels.
///
/// Frames leave the renderer **premultiplied**; the `premultiplied` flag makes this explicit at
/// API boundaries (encoders un-premultiply or flatten as their format requires).
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Drawing surface: a premultiplied RGBA8 buffer sized to the canvas.
///
/// The preview and the export pipeline each own their own surface.
#[derive(Clone, Debug)]
pub struct Surface {
    canvas: Canvas,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate a transparent surface.
    pub fn new(canvas: Canvas) -> BehindTextResult<Self> {
        canvas_dims_u16(canvas)?;
        Ok(Self {
            canvas,
            data: vec![0u8; canvas.rgba8_len()],
        })
    }

    /// Surface size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Reallocate when the canvas size changed; otherwise keep the buffer.
    pub fn ensure_canvas(&mut self, canvas: Canvas) -> BehindTextResult<()> {
        if self.canvas != canvas {
            *self = Self::new(canvas)?;
        }
        Ok(())
    }

    /// Make every pixel transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Copy the current contents out as a frame.
    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.data.clone(),
            premultiplied: true,
        }
    }
}

/// Reusable `vello_cpu` context plus a small cache of image paints.
pub(crate) struct Rasterizer {
    ctx: Option<vello_cpu::RenderContext>,
    paints: Vec<(RasterImage, vello_cpu::Image)>,
}

const PAINT_CACHE_LEN: usize = 4;

impl Rasterizer {
    pub(crate) fn new() -> Self {
        Self {
            ctx: None,
            paints: Vec::new(),
        }
    }

    /// Run `draw` on a cleared context sized to `canvas` and read the result back.
    pub(crate) fn render_layer(
        &mut self,
        canvas: Canvas,
        draw: impl FnOnce(&mut vello_cpu::RenderContext) -> BehindTextResult<()>,
    ) -> BehindTextResult<Vec<u8>> {
        let (width, height) = canvas_dims_u16(canvas)?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        draw(&mut ctx)?;
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);
        Ok(pixmap.data_as_u8_slice().to_vec())
    }

    /// Image paint for `img`, converted once per distinct pixel buffer.
    pub(crate) fn image_paint(&mut self, img: &RasterImage) -> BehindTextResult<vello_cpu::Image> {
        if let Some((_, paint)) = self.paints.iter().find(|(k, _)| k.same_pixels(img)) {
            return Ok(paint.clone());
        }
        let pixmap = pixmap_from_premul_bytes(img.data(), img.width(), img.height())?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        if self.paints.len() >= PAINT_CACHE_LEN {
            self.paints.remove(0);
        }
        self.paints.push((img.clone(), paint.clone()));
        Ok(paint)
    }
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn canvas_dims_u16(canvas: Canvas) -> BehindTextResult<(u16, u16)> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(BehindTextError::render("surface width/height must be non-zero"));
    }
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| BehindTextError::render("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| BehindTextError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> BehindTextResult<vello_cpu::Pixmap> {
    let (w, h) = canvas_dims_u16(Canvas { width, height })?;
    if bytes.len() != (width as usize) * (height as usize) * 4 {
        return Err(BehindTextError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
