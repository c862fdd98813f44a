//! Settings value types for the three layers and the text animation.
//!
//! Values are plain data: every field is public, defaults reproduce the editor's initial state,
//! and the JSON form uses snake_case fields with kebab-case enum names. Ranges are enforced by
//! [`TextSettings::clamped`] and friends, which the session applies on every update; renderers
//! take whatever they are given.

use crate::assets::color::Color;
use serde::{Deserialize, Serialize};

/// Horizontal alignment of every text line around the anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    /// Lines start at `anchor_x - 0.4 * canvas_width`.
    Left,
    /// Lines are centred on the anchor.
    #[default]
    Center,
    /// Lines end at `anchor_x + 0.4 * canvas_width`.
    Right,
}

/// Styling and placement of the text layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// Comma-delimited content; each non-empty segment becomes one line.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// CSS-style numeric weight (100..=900).
    pub font_weight: u16,
    /// Requested font family name.
    pub font_family: String,
    /// Fill colour.
    pub color: Color,
    /// Layer opacity, 0–100.
    pub opacity: f64,
    /// Rotation about the anchor in degrees, -180–180.
    pub rotation: f64,
    /// Anchor x as a percentage of the canvas width.
    pub x: f64,
    /// Anchor y as a percentage of the canvas height.
    pub y: f64,
    /// Outline width in pixels; `0` disables the outline.
    pub stroke_width: f64,
    /// Outline colour.
    pub stroke_color: Color,
    /// Shadow blur radius in pixels; `0` disables the shadow.
    pub shadow_blur: f64,
    /// Shadow colour.
    pub shadow_color: Color,
    /// Shadow x offset in canvas pixels.
    pub shadow_offset_x: f64,
    /// Shadow y offset in canvas pixels.
    pub shadow_offset_y: f64,
    /// Line alignment.
    pub text_align: TextAlign,
    /// Extra spacing between letters in pixels.
    pub letter_spacing: f64,
    /// Extra spacing between words in pixels.
    pub word_spacing: f64,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            text: "Add your text here".to_owned(),
            font_size: 48.0,
            font_weight: 700,
            font_family: "Arial".to_owned(),
            color: Color::WHITE,
            opacity: 100.0,
            rotation: 0.0,
            x: 50.0,
            y: 50.0,
            stroke_width: 2.0,
            stroke_color: Color::BLACK,
            shadow_blur: 4.0,
            shadow_color: Color::BLACK,
            shadow_offset_x: 2.0,
            shadow_offset_y: 2.0,
            text_align: TextAlign::Center,
            letter_spacing: 0.0,
            word_spacing: 0.0,
        }
    }
}

impl TextSettings {
    /// Return a copy with every ranged field forced into its documented range.
    pub fn clamped(mut self) -> Self {
        self.opacity = clamp_finite(self.opacity, 0.0, 100.0);
        self.x = clamp_finite(self.x, 0.0, 100.0);
        self.y = clamp_finite(self.y, 0.0, 100.0);
        self.rotation = clamp_finite(self.rotation, -180.0, 180.0);
        self.font_size = clamp_finite(self.font_size, 1.0, 1000.0);
        self.font_weight = self.font_weight.clamp(100, 900);
        self.stroke_width = clamp_finite(self.stroke_width, 0.0, 100.0);
        self.shadow_blur = clamp_finite(self.shadow_blur, 0.0, 100.0);
        self
    }
}

/// Drop shadow cast by an image layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerShadow {
    /// Whether the shadow is drawn.
    pub enabled: bool,
    /// Blur radius in pixels.
    pub blur: f64,
    /// Shadow colour (alpha comes from `opacity`).
    pub color: Color,
    /// X offset in canvas pixels.
    pub offset_x: f64,
    /// Y offset in canvas pixels.
    pub offset_y: f64,
    /// Shadow opacity, 0–100.
    pub opacity: f64,
}

impl Default for LayerShadow {
    fn default() -> Self {
        Self {
            enabled: false,
            blur: 10.0,
            color: Color::BLACK,
            offset_x: 15.0,
            offset_y: 15.0,
            opacity: 100.0,
        }
    }
}

/// Filters, shadow and transform shared by the background and subject layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageLayerSettings {
    /// Layer opacity, 0–100.
    pub opacity: f64,
    /// Brightness percentage, 0–200 (100 = neutral).
    pub brightness: f64,
    /// Contrast percentage, 0–200 (100 = neutral).
    pub contrast: f64,
    /// Saturation percentage, 0–200 (100 = neutral).
    pub saturation: f64,
    /// Gaussian blur in pixels, 0–20.
    pub blur: f64,
    /// Drop shadow.
    pub shadow: LayerShadow,
    /// Rotation about the canvas centre in degrees, -180–180.
    pub rotation: f64,
    /// Uniform scale about the canvas centre, 0.1–3.0.
    pub scale: f64,
}

impl Default for ImageLayerSettings {
    fn default() -> Self {
        Self {
            opacity: 100.0,
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            blur: 0.0,
            shadow: LayerShadow::default(),
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

impl ImageLayerSettings {
    /// Return a copy with every ranged field forced into its documented range.
    pub fn clamped(mut self) -> Self {
        self.opacity = clamp_finite(self.opacity, 0.0, 100.0);
        self.brightness = clamp_finite(self.brightness, 0.0, 200.0);
        self.contrast = clamp_finite(self.contrast, 0.0, 200.0);
        self.saturation = clamp_finite(self.saturation, 0.0, 200.0);
        self.blur = clamp_finite(self.blur, 0.0, 20.0);
        self.rotation = clamp_finite(self.rotation, -180.0, 180.0);
        self.scale = clamp_finite(self.scale, 0.1, 3.0);
        self.shadow.blur = clamp_finite(self.shadow.blur, 0.0, 100.0);
        self.shadow.opacity = clamp_finite(self.shadow.opacity, 0.0, 100.0);
        self
    }
}

/// Parameters handed to the sticker collaborator.
///
/// The frame renderer never reads these except `enabled`, which selects the stickerized subject.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerSettings {
    /// Prefer the stickerized subject when one exists.
    pub enabled: bool,
    /// Border width in pixels.
    pub border_width: f64,
    /// Border colour.
    pub border_color: Color,
    /// Sticker shadow blur in pixels.
    pub shadow_blur: f64,
    /// Sticker shadow colour.
    pub shadow_color: Color,
    /// Sticker shadow x offset in pixels.
    pub shadow_offset_x: f64,
    /// Sticker shadow y offset in pixels.
    pub shadow_offset_y: f64,
    /// Sticker shadow opacity, 0–100.
    pub shadow_opacity: f64,
}

impl Default for StickerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            border_width: 5.0,
            border_color: Color::WHITE,
            shadow_blur: 10.0,
            shadow_color: Color::BLACK,
            shadow_offset_x: 5.0,
            shadow_offset_y: 5.0,
            shadow_opacity: 50.0,
        }
    }
}

impl StickerSettings {
    /// Return a copy with every ranged field forced into its documented range.
    pub fn clamped(mut self) -> Self {
        self.border_width = clamp_finite(self.border_width, 0.0, 50.0);
        self.shadow_blur = clamp_finite(self.shadow_blur, 0.0, 100.0);
        self.shadow_opacity = clamp_finite(self.shadow_opacity, 0.0, 100.0);
        self
    }
}

/// Subject layer: image-layer settings plus sticker parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectSettings {
    /// Filters, shadow and transform.
    #[serde(flatten)]
    pub layer: ImageLayerSettings,
    /// Sticker effect parameters.
    pub sticker: StickerSettings,
}

impl SubjectSettings {
    /// Return a copy with every ranged field forced into its documented range.
    pub fn clamped(self) -> Self {
        Self {
            layer: self.layer.clamped(),
            sticker: self.sticker.clamped(),
        }
    }
}

/// Named text animations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationKind {
    /// Opacity 0 → 1.
    #[default]
    FadeIn,
    /// Opacity 1 → 0.
    FadeOut,
    /// Scale 0.1 → 1.
    ZoomIn,
    /// Scale 1 → 0.1.
    ZoomOut,
}

/// Text animation and video length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// Which property animates and in which direction.
    pub animation_type: AnimationKind,
    /// Transition length in seconds.
    pub animation_duration: f64,
    /// Curve applied to the transition.
    pub easing: crate::animation::ease::Easing,
    /// Total exported video length in seconds.
    pub video_duration: f64,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            animation_type: AnimationKind::FadeIn,
            animation_duration: 2.0,
            easing: crate::animation::ease::Easing::EaseOut,
            video_duration: 10.0,
        }
    }
}

impl VideoSettings {
    /// Return a copy with non-negative, finite durations.
    pub fn clamped(mut self) -> Self {
        self.animation_duration = clamp_finite(self.animation_duration, 0.0, f64::MAX);
        self.video_duration = clamp_finite(self.video_duration, 0.0, f64::MAX);
        self
    }
}

fn clamp_finite(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
