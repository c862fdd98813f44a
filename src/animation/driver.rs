use crate::animation::tween::{TextAnimation, Tween};
use crate::scene::model::VideoSettings;

/// Which part of the editor is active. Only the video context may play animations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditContext {
    /// Text styling.
    #[default]
    Text,
    /// Background/subject image adjustments.
    Image,
    /// Animation and export.
    Video,
}

/// Playback state of the preview animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverState {
    /// Nothing playing; multipliers are neutral.
    #[default]
    Idle,
    /// Advancing on every tick.
    Playing,
    /// Frozen at the last published value.
    Paused,
}

/// Preview animation state machine.
///
/// The driver owns no clock: callers feed it timestamps through [`AnimationDriver::tick`] and read
/// the published value back. Elapsed time only accumulates while playing.
#[derive(Clone, Debug)]
pub struct AnimationDriver {
    state: DriverState,
    context: EditContext,
    tween: Option<Tween>,
    elapsed: f64,
    last_tick: Option<f64>,
    current: TextAnimation,
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationDriver {
    /// Idle driver in the text context.
    pub fn new() -> Self {
        Self {
            state: DriverState::Idle,
            context: EditContext::default(),
            tween: None,
            elapsed: 0.0,
            last_tick: None,
            current: TextAnimation::NEUTRAL,
        }
    }

    /// Current playback state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Active editing context.
    pub fn context(&self) -> EditContext {
        self.context
    }

    /// Last published multipliers.
    pub fn current(&self) -> TextAnimation {
        self.current
    }

    /// Seconds of animation played since the last `play`.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Switch editing context. Leaving the video context stops playback.
    pub fn set_context(&mut self, context: EditContext) {
        if self.context == EditContext::Video && context != EditContext::Video {
            self.stop();
        }
        self.context = context;
    }

    /// Start (or restart) the preview from the animation kind's start value.
    ///
    /// Returns `false` and does nothing outside the video context.
    pub fn play(&mut self, video: &VideoSettings) -> bool {
        if self.context != EditContext::Video {
            return false;
        }
        let tween = Tween::from_settings(video);
        self.current = tween.sample_looping(0.0);
        self.tween = Some(tween);
        self.elapsed = 0.0;
        self.last_tick = None;
        self.state = DriverState::Playing;
        true
    }

    /// Freeze at the current value.
    pub fn pause(&mut self) {
        if self.state == DriverState::Playing {
            self.state = DriverState::Paused;
        }
    }

    /// Continue from where `pause` left off; the paused interval is not counted.
    pub fn resume(&mut self) {
        if self.state == DriverState::Paused {
            self.last_tick = None;
            self.state = DriverState::Playing;
        }
    }

    /// Return to idle with neutral multipliers.
    pub fn stop(&mut self) {
        self.state = DriverState::Idle;
        self.tween = None;
        self.elapsed = 0.0;
        self.last_tick = None;
        self.current = TextAnimation::NEUTRAL;
    }

    /// Advance to the timestamp `now` (seconds, monotonic) and publish the new value.
    pub fn tick(&mut self, now: f64) -> TextAnimation {
        if self.state != DriverState::Playing {
            self.last_tick = Some(now);
            return self.current;
        }
        if let Some(prev) = self.last_tick {
            self.elapsed += (now - prev).max(0.0);
        }
        self.last_tick = Some(now);
        if let Some(tween) = &self.tween {
            self.current = tween.sample_looping(self.elapsed);
        }
        self.current
    }

    /// Multipliers the frame renderer should use right now.
    ///
    /// Neutral unless the video context is active and the driver is playing.
    pub fn render_multipliers(&self) -> TextAnimation {
        if self.context == EditContext::Video && self.state == DriverState::Playing {
            self.current
        } else {
            TextAnimation::NEUTRAL
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/driver.rs"]
mod tests;
