//! Text Layout Engine.
//!
//! Layout is split in two: [`plan_text_block`] is pure geometry (which lines, where, how large),
//! and [`TextPainter`] shapes each planned line with `parley` and rasterises the glyphs with
//! `vello_cpu`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use crate::animation::tween::TextAnimation;
use crate::assets::color::Color;
use crate::assets::fonts::{FontBook, FontFace, FontResolution};
use crate::effects::composite::{ShadowParams, cast_shadow, over_in_place};
use crate::foundation::core::{Affine, Canvas, Point, Vec2};
use crate::foundation::error::{BehindTextError, BehindTextResult};
use crate::foundation::math::deg_to_rad;
use crate::render::surface::{Rasterizer, Surface, affine_to_cpu};
use crate::scene::model::{TextAlign, TextSettings};

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;
/// Horizontal offset of left/right aligned text from the anchor, as a fraction of canvas width.
pub const SIDE_ALIGN_OFFSET: f64 = 0.4;

/// Non-fatal degradation noticed while drawing text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderWarning {
    /// The requested family is not installed; `used` was drawn instead.
    FontFallback {
        /// Family named in the text settings.
        requested: String,
        /// Family actually used.
        used: String,
    },
    /// No font is available; the text layer was skipped.
    FontUnavailable {
        /// Family named in the text settings.
        requested: String,
    },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontFallback { requested, used } => {
                write!(f, "font '{requested}' unavailable, using '{used}'")
            }
            Self::FontUnavailable { requested } => {
                write!(f, "font '{requested}' unavailable and no fallback exists")
            }
        }
    }
}

/// Split comma-delimited text into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split(',')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// One line of a planned text block, in the block's rotated local space.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedLine {
    /// Line content.
    pub text: String,
    /// Alignment x: the line's start, centre or end depending on the block alignment.
    pub x: f64,
    /// Vertical middle of the line.
    pub y: f64,
}

/// Geometry of the whole text layer for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlockPlan {
    /// Anchor in canvas pixels; the block rotates about it.
    pub anchor: Point,
    /// Rotation in radians.
    pub rotation: f64,
    /// Font size after the animated scale.
    pub font_size: f64,
    /// Distance between consecutive line middles.
    pub line_height: f64,
    /// Opacity after the animated multiplier, `0..=1`.
    pub opacity: f64,
    /// Horizontal alignment of every line.
    pub align: TextAlign,
    /// Lines top to bottom.
    pub lines: Vec<PlannedLine>,
}

impl TextBlockPlan {
    /// Local → canvas transform of the block.
    pub fn block_transform(&self) -> Affine {
        Affine::translate(self.anchor.to_vec2()) * Affine::rotate(self.rotation)
    }
}

/// Lay out the text block without touching fonts. Returns `None` when there is nothing to draw.
pub fn plan_text_block(
    settings: &TextSettings,
    canvas: Canvas,
    anim: TextAnimation,
) -> Option<TextBlockPlan> {
    let lines = split_lines(&settings.text);
    if lines.is_empty() {
        return None;
    }

    let font_size = settings.font_size * anim.scale;
    let line_height = font_size * LINE_HEIGHT_FACTOR;
    let start_y = -((lines.len() - 1) as f64) * line_height / 2.0;
    let width = f64::from(canvas.width);
    let x = match settings.text_align {
        TextAlign::Left => -width * SIDE_ALIGN_OFFSET,
        TextAlign::Center => 0.0,
        TextAlign::Right => width * SIDE_ALIGN_OFFSET,
    };

    Some(TextBlockPlan {
        anchor: Point::new(
            settings.x / 100.0 * width,
            settings.y / 100.0 * f64::from(canvas.height),
        ),
        rotation: deg_to_rad(settings.rotation),
        font_size,
        line_height,
        opacity: (settings.opacity / 100.0 * anim.opacity).clamp(0.0, 1.0),
        align: settings.text_align,
        lines: lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| PlannedLine {
                text: text.to_owned(),
                x,
                y: start_y + i as f64 * line_height,
            })
            .collect(),
    })
}

struct LoadedFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

struct ShapedLine {
    layout: parley::Layout<()>,
    origin: Vec2,
}

/// Shapes planned lines with `parley` and draws them with `vello_cpu`.
pub(crate) struct TextPainter {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    fonts: HashMap<(String, u32), LoadedFont>,
    resolved: HashMap<(String, u16), FontResolution>,
}

impl TextPainter {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: HashMap::new(),
            resolved: HashMap::new(),
        }
    }

    /// Forget cached lookups, e.g. after fonts were added to the book.
    pub(crate) fn invalidate_fonts(&mut self) {
        self.resolved.clear();
    }

    fn resolve(&mut self, book: &FontBook, family: &str, weight: u16) -> FontResolution {
        self.resolved
            .entry((family.to_owned(), weight))
            .or_insert_with(|| book.resolve(family, weight))
            .clone()
    }

    fn load(&mut self, face: &FontFace) -> BehindTextResult<&LoadedFont> {
        let key = (face.family.clone(), face.index);
        if !self.fonts.contains_key(&key) {
            let families = self
                .font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(face.data.to_vec()), None);
            let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
                BehindTextError::render(format!("no font families registered for '{}'", face.family))
            })?;
            let family = self
                .font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| BehindTextError::render("registered font family has no name"))?
                .to_string();
            let data = vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(face.data.to_vec()),
                face.index,
            );
            self.fonts.insert(key.clone(), LoadedFont { family, data });
        }
        self.fonts
            .get(&key)
            .ok_or_else(|| BehindTextError::render("font cache lost an entry"))
    }

    fn shape_line(
        &mut self,
        family: &str,
        text: &str,
        settings: &TextSettings,
        font_size: f32,
    ) -> parley::Layout<()> {
        use parley::style::{FontStack, FontWeight, StyleProperty};

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(StyleProperty::FontStack(FontStack::Source(Cow::Owned(
            family.to_owned(),
        ))));
        builder.push_default(StyleProperty::FontSize(font_size));
        builder.push_default(StyleProperty::FontWeight(FontWeight::new(f32::from(
            settings.font_weight,
        ))));
        if settings.letter_spacing != 0.0 {
            builder.push_default(StyleProperty::LetterSpacing(settings.letter_spacing as f32));
        }
        if settings.word_spacing != 0.0 {
            builder.push_default(StyleProperty::WordSpacing(settings.word_spacing as f32));
        }
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Draw the planned block onto `dst`. Returns a warning when the requested font was not used.
    pub(crate) fn paint(
        &mut self,
        raster: &mut Rasterizer,
        dst: &mut Surface,
        book: &FontBook,
        settings: &TextSettings,
        plan: &TextBlockPlan,
    ) -> BehindTextResult<Option<RenderWarning>> {
        if plan.opacity <= 0.0 || plan.font_size <= 0.0 {
            return Ok(None);
        }

        let resolution = self.resolve(book, &settings.font_family, settings.font_weight);
        let (face, warning) = match resolution {
            FontResolution::Exact(face) => (face, None),
            FontResolution::Fallback(face) => {
                let warning = RenderWarning::FontFallback {
                    requested: settings.font_family.clone(),
                    used: face.family.clone(),
                };
                (face, Some(warning))
            }
            FontResolution::Missing => {
                return Ok(Some(RenderWarning::FontUnavailable {
                    requested: settings.font_family.clone(),
                }));
            }
        };
        let loaded = self.load(&face)?;
        let family = loaded.family.clone();
        let font = loaded.data.clone();

        let font_size = plan.font_size as f32;
        let mut shaped = Vec::with_capacity(plan.lines.len());
        for line in &plan.lines {
            let layout = self.shape_line(&family, &line.text, settings, font_size);
            let width = f64::from(layout.width());
            let start_x = match plan.align {
                TextAlign::Left => line.x,
                TextAlign::Center => line.x - width / 2.0,
                TextAlign::Right => line.x - width,
            };
            // Middle baseline: the em box middle sits on the planned y.
            let middle = layout
                .lines()
                .next()
                .map(|l| {
                    let m = l.metrics();
                    f64::from(m.baseline) - f64::from(m.ascent - m.descent) / 2.0
                })
                .unwrap_or(0.0);
            shaped.push(ShapedLine {
                layout,
                origin: Vec2::new(start_x, line.y - middle),
            });
        }

        let canvas = dst.canvas();
        let block = plan.block_transform();
        let stroke = (settings.stroke_width > 0.0)
            .then_some((settings.stroke_width, settings.stroke_color));
        let fill = settings.color;
        let pixels = raster.render_layer(canvas, |ctx| {
            for line in &shaped {
                ctx.set_transform(affine_to_cpu(block * Affine::translate(line.origin)));
                if let Some((width, color)) = stroke {
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
                    ctx.set_paint(cpu_color(color));
                    draw_runs(ctx, &font, &line.layout, GlyphOp::Stroke);
                }
                ctx.set_paint(cpu_color(fill));
                draw_runs(ctx, &font, &line.layout, GlyphOp::Fill);
            }
            Ok(())
        })?;

        let opacity = plan.opacity as f32;
        if settings.shadow_blur > 0.0 {
            let shadow = ShadowParams {
                color: settings.shadow_color,
                blur: settings.shadow_blur,
                offset_x: settings.shadow_offset_x,
                offset_y: settings.shadow_offset_y,
            };
            let cast = cast_shadow(&pixels, canvas.width, canvas.height, &shadow)?;
            over_in_place(dst.data_mut(), &cast, opacity)?;
        }
        over_in_place(dst.data_mut(), &pixels, opacity)?;

        Ok(warning)
    }
}

#[derive(Clone, Copy)]
enum GlyphOp {
    Fill,
    Stroke,
}

fn draw_runs(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    layout: &parley::Layout<()>,
    op: GlyphOp,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            let builder = ctx.glyph_run(font).font_size(run.run().font_size());
            match op {
                GlyphOp::Fill => builder.fill_glyphs(glyphs),
                GlyphOp::Stroke => builder.stroke_glyphs(glyphs),
            }
        }
    }
}

fn cpu_color(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
