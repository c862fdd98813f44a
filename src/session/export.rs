//! Export Pipeline: replays the text animation off-screen and feeds every frame to a recorder.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::animation::tween::ExportTimeline;
use crate::encode::recorder::{RecordedVideo, Recorder, RecorderConfig, RecorderStatus};
use crate::foundation::core::{FrameIndex, Fps};
use crate::foundation::error::{BehindTextError, BehindTextResult};
use crate::render::frame::FrameRenderer;
use crate::render::scheduler::FrameScheduler;
use crate::render::surface::Surface;
use crate::scene::state::CompositionState;

/// Tunables of the export loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportOpts {
    /// Recorder frame rate. Frame `i` shows the timeline at `i / fps` seconds.
    pub fps: Fps,
    /// Pause between the end of the timeline and stopping the recorder.
    pub settle_delay: Duration,
    /// Longest `video_duration` accepted, in seconds.
    pub max_video_secs: f64,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            settle_delay: Duration::from_millis(100),
            max_video_secs: 300.0,
        }
    }
}

/// Runs exports one at a time and exposes a cancellation flag.
#[derive(Debug, Default)]
pub struct VideoExporter {
    opts: ExportOpts,
    cancel: Arc<AtomicBool>,
    exporting: AtomicBool,
}

struct ExportingGuard<'a>(&'a AtomicBool);

impl Drop for ExportingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl VideoExporter {
    pub fn new(opts: ExportOpts) -> Self {
        Self {
            opts,
            cancel: Arc::new(AtomicBool::new(false)),
            exporting: AtomicBool::new(false),
        }
    }

    pub fn opts(&self) -> &ExportOpts {
        &self.opts
    }

    /// Setting the returned flag stops a running export before its next frame.
    ///
    /// The flag is cleared when an export starts.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }

    /// Encode the animated composition.
    ///
    /// Returns `Ok(None)` without touching the recorder when no background image is loaded. On any
    /// failure the recorder is aborted, so the next export starts from a clean recorder.
    #[tracing::instrument(skip_all, fields(fps = self.opts.fps.as_f64()))]
    pub fn export(
        &self,
        state: &CompositionState,
        renderer: &mut FrameRenderer,
        recorder: &mut dyn Recorder,
        scheduler: &mut dyn FrameScheduler,
    ) -> BehindTextResult<Option<RecordedVideo>> {
        if state.original().is_none() {
            tracing::debug!("no background image, nothing to export");
            return Ok(None);
        }
        if self
            .exporting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(BehindTextError::export("an export is already running"));
        }
        let _guard = ExportingGuard(&self.exporting);
        self.cancel.store(false, Ordering::Release);

        match self.run(state, renderer, recorder, scheduler) {
            Ok(video) => {
                tracing::info!(
                    frames = video.frames,
                    secs = video.duration_secs(),
                    path = ?video.path,
                    "export finished"
                );
                Ok(Some(video))
            }
            Err(e) => {
                if recorder.status() == RecorderStatus::Recording {
                    recorder.abort();
                }
                Err(e.into_export())
            }
        }
    }

    fn run(
        &self,
        state: &CompositionState,
        renderer: &mut FrameRenderer,
        recorder: &mut dyn Recorder,
        scheduler: &mut dyn FrameScheduler,
    ) -> BehindTextResult<RecordedVideo> {
        let video = &state.video;
        if !video.video_duration.is_finite() || video.video_duration > self.opts.max_video_secs {
            return Err(BehindTextError::validation(format!(
                "video_duration {}s exceeds the {}s limit",
                video.video_duration, self.opts.max_video_secs
            )));
        }
        let timeline = ExportTimeline::new(video);
        if timeline.total_secs() <= 0.0 {
            return Err(BehindTextError::validation(
                "video_duration and animation_duration are both zero",
            ));
        }

        let canvas = state.canvas();
        let mut surface = Surface::new(canvas)?;
        tracing::debug!(
            w = canvas.width,
            h = canvas.height,
            transition = timeline.tween().duration,
            hold = timeline.hold_secs(),
            frames = timeline.frame_count(self.opts.fps),
            "starting export"
        );

        recorder.start(RecorderConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.opts.fps,
        })?;

        let mut frame = FrameIndex(0);
        loop {
            if self.cancel.load(Ordering::Acquire) {
                return Err(BehindTextError::export("export cancelled"));
            }
            if recorder.status() != RecorderStatus::Recording {
                return Err(BehindTextError::export(format!(
                    "recorder stopped after {} frames, before the timeline completed",
                    frame.0
                )));
            }
            // Timeline position comes from the frame index; the scheduler only paces the loop.
            let t = self.opts.fps.frames_to_secs(frame.0);
            if timeline.is_complete(t) {
                break;
            }
            scheduler.next_tick();
            renderer.render(state, timeline.sample(t), &mut surface)?;
            recorder.step(&surface.to_frame())?;
            frame.0 += 1;
        }

        scheduler.settle(self.opts.settle_delay);
        if recorder.status() != RecorderStatus::Recording {
            return Err(BehindTextError::export("recorder stopped before finalizing"));
        }
        recorder.stop()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/export.rs"]
mod tests;
