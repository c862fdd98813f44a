//! Field-level partial updates.
//!
//! A patch names only the fields it changes; `apply_to` returns a fresh settings value with
//! those fields replaced and everything else copied from the base. The base is never mutated.

use serde::{Deserialize, Serialize};

use crate::animation::ease::Easing;
use crate::assets::color::Color;
use crate::scene::model::{
    AnimationKind, ImageLayerSettings, LayerShadow, StickerSettings, SubjectSettings, TextAlign,
    TextSettings, VideoSettings,
};

macro_rules! settings_patch {
    (
        $(#[$meta:meta])*
        $name:ident for $target:ty {
            $( $field:ident : $ty:ty, )*
        }
        $( nested { $( $nested:ident : $nested_ty:ty, )* } )?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
            $($(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $nested: Option<$nested_ty>,
            )*)?
        }

        impl $name {
            /// Copy `base`, replacing every field this patch sets.
            pub fn apply_to(&self, base: &$target) -> $target {
                let mut out = base.clone();
                $(
                    if let Some(v) = &self.$field {
                        out.$field = v.clone();
                    }
                )*
                $($(
                    if let Some(p) = &self.$nested {
                        out.$nested = p.apply_to(&out.$nested);
                    }
                )*)?
                out
            }
        }
    };
}

settings_patch! {
    /// Partial update of [`TextSettings`].
    TextPatch for TextSettings {
        text: String,
        font_size: f64,
        font_weight: u16,
        font_family: String,
        color: Color,
        opacity: f64,
        rotation: f64,
        x: f64,
        y: f64,
        stroke_width: f64,
        stroke_color: Color,
        shadow_blur: f64,
        shadow_color: Color,
        shadow_offset_x: f64,
        shadow_offset_y: f64,
        text_align: TextAlign,
        letter_spacing: f64,
        word_spacing: f64,
    }
}

settings_patch! {
    /// Partial update of [`LayerShadow`].
    LayerShadowPatch for LayerShadow {
        enabled: bool,
        blur: f64,
        color: Color,
        offset_x: f64,
        offset_y: f64,
        opacity: f64,
    }
}

settings_patch! {
    /// Partial update of [`ImageLayerSettings`]; the shadow is patched field by field.
    ImageLayerPatch for ImageLayerSettings {
        opacity: f64,
        brightness: f64,
        contrast: f64,
        saturation: f64,
        blur: f64,
        rotation: f64,
        scale: f64,
    }
    nested {
        shadow: LayerShadowPatch,
    }
}

settings_patch! {
    /// Partial update of [`StickerSettings`].
    StickerPatch for StickerSettings {
        enabled: bool,
        border_width: f64,
        border_color: Color,
        shadow_blur: f64,
        shadow_color: Color,
        shadow_offset_x: f64,
        shadow_offset_y: f64,
        shadow_opacity: f64,
    }
}

settings_patch! {
    /// Partial update of [`VideoSettings`].
    VideoPatch for VideoSettings {
        animation_type: AnimationKind,
        animation_duration: f64,
        easing: Easing,
        video_duration: f64,
    }
}

/// Partial update of [`SubjectSettings`]; layer fields sit at the top level like the settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectPatch {
    /// Filters, shadow and transform.
    #[serde(flatten)]
    pub layer: ImageLayerPatch,
    /// Sticker parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticker: Option<StickerPatch>,
}

impl SubjectPatch {
    /// Copy `base`, replacing every field this patch sets.
    pub fn apply_to(&self, base: &SubjectSettings) -> SubjectSettings {
        SubjectSettings {
            layer: self.layer.apply_to(&base.layer),
            sticker: match &self.sticker {
                Some(p) => p.apply_to(&base.sticker),
                None => base.sticker.clone(),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/patch.rs"]
mod tests;
