use crate::animation::tween::TextAnimation;
use crate::assets::fonts::FontBook;
use crate::foundation::error::BehindTextResult;
use crate::render::layer::draw_image_layer;
use crate::render::surface::{FrameRGBA, Rasterizer, Surface};
use crate::render::text::{RenderWarning, TextPainter, plan_text_block};
use crate::scene::state::CompositionState;

/// Frame Renderer: background, then text, then subject, into one surface.
///
/// Owns the font book and all rasterisation caches. Warnings are logged the first time they
/// occur and kept (deduplicated) for inspection.
pub struct FrameRenderer {
    fonts: FontBook,
    raster: Rasterizer,
    text: TextPainter,
    warnings: Vec<RenderWarning>,
}

impl FrameRenderer {
    /// Renderer drawing text with fonts from `fonts`.
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            raster: Rasterizer::new(),
            text: TextPainter::new(),
            warnings: Vec::new(),
        }
    }

    /// Fonts available to the text layer.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Mutable access to the font book; cached font lookups are dropped.
    pub fn fonts_mut(&mut self) -> &mut FontBook {
        self.text.invalidate_fonts();
        &mut self.fonts
    }

    /// Distinct warnings seen so far.
    pub fn warnings(&self) -> &[RenderWarning] {
        &self.warnings
    }

    /// Drain the collected warnings.
    pub fn take_warnings(&mut self) -> Vec<RenderWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Composite one frame of `state` into `surface`, resizing it to the canvas if needed.
    ///
    /// `anim` scales the text layer only; pass [`TextAnimation::NEUTRAL`] for a static frame.
    #[tracing::instrument(skip_all, fields(w = state.canvas().width, h = state.canvas().height))]
    pub fn render(
        &mut self,
        state: &CompositionState,
        anim: TextAnimation,
        surface: &mut Surface,
    ) -> BehindTextResult<()> {
        surface.ensure_canvas(state.canvas())?;
        surface.clear();

        if let Some(background) = state.original() {
            draw_image_layer(&mut self.raster, surface, background, &state.background)?;
        }

        if !state.text.text.is_empty()
            && let Some(plan) = plan_text_block(&state.text, state.canvas(), anim)
        {
            let warning =
                self.text
                    .paint(&mut self.raster, surface, &self.fonts, &state.text, &plan)?;
            if let Some(w) = warning {
                self.note(w);
            }
        }

        if let Some(subject) = state.active_subject() {
            draw_image_layer(
                &mut self.raster,
                surface,
                subject,
                &state.subject_settings.layer,
            )?;
        }
        Ok(())
    }

    /// Render into a fresh surface and return the frame.
    pub fn render_frame(
        &mut self,
        state: &CompositionState,
        anim: TextAnimation,
    ) -> BehindTextResult<FrameRGBA> {
        let mut surface = Surface::new(state.canvas())?;
        self.render(state, anim, &mut surface)?;
        Ok(surface.to_frame())
    }

    fn note(&mut self, warning: RenderWarning) {
        if !self.warnings.contains(&warning) {
            tracing::warn!(%warning, "text rendering degraded");
            self.warnings.push(warning);
        }
    }
}

impl std::fmt::Debug for FrameRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRenderer")
            .field("fonts", &self.fonts)
            .field("warnings", &self.warnings)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
