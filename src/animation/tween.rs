//! Pure time → `{opacity, scale}` functions shared by the preview loop and the export loop.

use crate::animation::ease::Easing;
use crate::foundation::core::Fps;
use crate::scene::model::{AnimationKind, VideoSettings};

/// Animated multipliers applied to the text layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextAnimation {
    /// Multiplies the text opacity.
    pub opacity: f64,
    /// Multiplies the font size.
    pub scale: f64,
}

impl TextAnimation {
    /// Multipliers that leave the text unchanged.
    pub const NEUTRAL: TextAnimation = TextAnimation {
        opacity: 1.0,
        scale: 1.0,
    };

    fn lerp(a: Self, b: Self, t: f64) -> Self {
        Self {
            opacity: a.opacity + (b.opacity - a.opacity) * t,
            scale: a.scale + (b.scale - a.scale) * t,
        }
    }
}

impl Default for TextAnimation {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl AnimationKind {
    /// Value the text starts from.
    pub fn start(self) -> TextAnimation {
        match self {
            Self::FadeIn => TextAnimation {
                opacity: 0.0,
                scale: 1.0,
            },
            Self::FadeOut | Self::ZoomOut => TextAnimation::NEUTRAL,
            Self::ZoomIn => TextAnimation {
                opacity: 1.0,
                scale: 0.1,
            },
        }
    }

    /// Value the transition ends on.
    pub fn target(self) -> TextAnimation {
        match self {
            Self::FadeIn | Self::ZoomIn => TextAnimation::NEUTRAL,
            Self::FadeOut => TextAnimation {
                opacity: 0.0,
                scale: 1.0,
            },
            Self::ZoomOut => TextAnimation {
                opacity: 1.0,
                scale: 0.1,
            },
        }
    }

    /// Fade kinds reverse direction on every other preview cycle; zoom kinds restart.
    pub fn yoyo(self) -> bool {
        matches!(self, Self::FadeIn | Self::FadeOut)
    }
}

/// One eased transition from an animation kind's start value to its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    /// Animation kind.
    pub kind: AnimationKind,
    /// Transition length in seconds.
    pub duration: f64,
    /// Curve applied over the transition.
    pub easing: Easing,
}

impl Tween {
    /// Tween described by the video settings.
    pub fn from_settings(video: &VideoSettings) -> Self {
        Self {
            kind: video.animation_type,
            duration: video.animation_duration.max(0.0),
            easing: video.easing,
        }
    }

    fn at_progress(&self, p: f64) -> TextAnimation {
        TextAnimation::lerp(self.kind.start(), self.kind.target(), self.easing.apply(p))
    }

    /// Value `t` seconds into a single transition; holds the target afterwards.
    ///
    /// A zero-length transition is already at its target.
    pub fn sample_transition(&self, t: f64) -> TextAnimation {
        if self.duration <= 0.0 {
            return self.kind.target();
        }
        self.at_progress(t / self.duration)
    }

    /// Value `elapsed` seconds into an endlessly repeating preview.
    pub fn sample_looping(&self, elapsed: f64) -> TextAnimation {
        if self.duration <= 0.0 {
            return self.kind.target();
        }
        let elapsed = elapsed.max(0.0);
        let cycle = (elapsed / self.duration).floor();
        let local = (elapsed - cycle * self.duration) / self.duration;
        let reversed = self.kind.yoyo() && (cycle as u64) % 2 == 1;
        if reversed {
            self.at_progress(1.0 - local)
        } else {
            self.at_progress(local)
        }
    }
}

/// Export timeline: the transition, then a hold on the target value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportTimeline {
    tween: Tween,
    hold_secs: f64,
}

impl ExportTimeline {
    /// Timeline for the given settings. The hold is never negative.
    pub fn new(video: &VideoSettings) -> Self {
        let tween = Tween::from_settings(video);
        let hold_secs = (video.video_duration - tween.duration).max(0.0);
        Self { tween, hold_secs }
    }

    /// The transition part of the timeline.
    pub fn tween(&self) -> Tween {
        self.tween
    }

    /// Seconds spent holding the target value after the transition.
    pub fn hold_secs(&self) -> f64 {
        self.hold_secs
    }

    /// Total timeline length in seconds.
    pub fn total_secs(&self) -> f64 {
        self.tween.duration + self.hold_secs
    }

    /// Multipliers at `t` seconds.
    pub fn sample(&self, t: f64) -> TextAnimation {
        self.tween.sample_transition(t.min(self.tween.duration))
    }

    /// Return `true` once `t` has reached the end of the timeline.
    pub fn is_complete(&self, t: f64) -> bool {
        t >= self.total_secs() - 1e-9
    }

    /// Number of frames a fixed-step scheduler produces at `fps`.
    pub fn frame_count(&self, fps: Fps) -> u64 {
        fps.secs_to_frames_ceil(self.total_secs())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
