//! "Run again on the next frame" primitive, abstracted so export pacing can be deterministic.

use std::time::{Duration, Instant};

use crate::foundation::core::Fps;

/// Source of frame ticks.
pub trait FrameScheduler {
    /// Wait for the next frame and return its timestamp in seconds since the first tick.
    fn next_tick(&mut self) -> f64;
    /// Let `delay` pass before the recorder is stopped.
    fn settle(&mut self, delay: Duration);
}

/// Deterministic scheduler: tick `i` happens at exactly `i / fps` seconds, and nothing sleeps.
#[derive(Clone, Debug)]
pub struct FixedStepScheduler {
    fps: Fps,
    next: u64,
}

impl FixedStepScheduler {
    /// Scheduler starting at tick 0.
    pub fn new(fps: Fps) -> Self {
        Self { fps, next: 0 }
    }

    /// Number of ticks handed out so far.
    pub fn ticks(&self) -> u64 {
        self.next
    }
}

impl FrameScheduler for FixedStepScheduler {
    fn next_tick(&mut self) -> f64 {
        let t = (self.next as f64) * f64::from(self.fps.den) / f64::from(self.fps.num);
        self.next += 1;
        t
    }

    fn settle(&mut self, _delay: Duration) {}
}

/// Wall-clock scheduler for live preview, paced to a display refresh interval.
#[derive(Clone, Debug)]
pub struct RealTimeScheduler {
    interval: Duration,
    start: Option<Instant>,
    last: Option<Instant>,
}

impl RealTimeScheduler {
    /// Refresh interval used by [`RealTimeScheduler::default`] (60 Hz).
    pub const DEFAULT_INTERVAL: Duration = Duration::from_nanos(16_666_667);

    /// Scheduler ticking every `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            start: None,
            last: None,
        }
    }
}

impl Default for RealTimeScheduler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

impl FrameScheduler for RealTimeScheduler {
    fn next_tick(&mut self) -> f64 {
        let now = match self.last {
            None => Instant::now(),
            Some(last) => {
                let due = last + self.interval;
                let now = Instant::now();
                if due > now {
                    std::thread::sleep(due - now);
                }
                Instant::now()
            }
        };
        let start = *self.start.get_or_insert(now);
        self.last = Some(now);
        now.duration_since(start).as_secs_f64()
    }

    fn settle(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scheduler.rs"]
mod tests;
