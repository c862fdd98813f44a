use std::path::PathBuf;

use crate::foundation::core::Fps;
use crate::foundation::error::{BehindTextError, BehindTextResult};
use crate::render::surface::FrameRGBA;

/// Frame geometry and rate a recorder is started with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecorderConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
}

impl RecorderConfig {
    pub fn validate(&self) -> BehindTextResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BehindTextError::validation(
                "recorder width/height must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Lifecycle position of a recorder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecorderStatus {
    /// Not started, or reset after an abort.
    #[default]
    Ready,
    /// Accepting frames.
    Recording,
    /// Finalized; a new `start` begins a fresh recording.
    Stopped,
}

/// Summary of a finished recording.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedVideo {
    /// Encoded file, for recorders that write one.
    pub path: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    /// Number of frames appended.
    pub frames: u64,
}

impl RecordedVideo {
    /// Playback length implied by frame count and rate.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frames)
    }
}

/// The start → step* → stop sequence that turns frames into a video.
///
/// `abort` must leave the recorder in [`RecorderStatus::Ready`] with nothing half-written, so a
/// later export can start cleanly.
pub trait Recorder {
    fn start(&mut self, cfg: RecorderConfig) -> BehindTextResult<()>;
    fn step(&mut self, frame: &FrameRGBA) -> BehindTextResult<()>;
    fn stop(&mut self) -> BehindTextResult<RecordedVideo>;
    fn abort(&mut self);
    fn status(&self) -> RecorderStatus;
}

/// Keeps every frame in memory. Used by tests and by callers that encode themselves.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRecorder {
    cfg: Option<RecorderConfig>,
    frames: Vec<FrameRGBA>,
    status: RecorderStatus,
}

impl InMemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[FrameRGBA] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<FrameRGBA> {
        self.frames
    }
}

impl Recorder for InMemoryRecorder {
    fn start(&mut self, cfg: RecorderConfig) -> BehindTextResult<()> {
        if self.status == RecorderStatus::Recording {
            return Err(BehindTextError::export("recorder is already recording"));
        }
        cfg.validate()?;
        self.cfg = Some(cfg);
        self.frames.clear();
        self.status = RecorderStatus::Recording;
        Ok(())
    }

    fn step(&mut self, frame: &FrameRGBA) -> BehindTextResult<()> {
        let Some(cfg) = self.cfg.filter(|_| self.status == RecorderStatus::Recording) else {
            return Err(BehindTextError::export("recorder is not recording"));
        };
        check_frame_size(&cfg, frame)?;
        self.frames.push(frame.clone());
        Ok(())
    }

    fn stop(&mut self) -> BehindTextResult<RecordedVideo> {
        let Some(cfg) = self.cfg.filter(|_| self.status == RecorderStatus::Recording) else {
            return Err(BehindTextError::export("recorder is not recording"));
        };
        self.status = RecorderStatus::Stopped;
        Ok(RecordedVideo {
            path: None,
            width: cfg.width,
            height: cfg.height,
            fps: cfg.fps,
            frames: self.frames.len() as u64,
        })
    }

    fn abort(&mut self) {
        self.frames.clear();
        self.cfg = None;
        self.status = RecorderStatus::Ready;
    }

    fn status(&self) -> RecorderStatus {
        self.status
    }
}

pub(crate) fn check_frame_size(cfg: &RecorderConfig, frame: &FrameRGBA) -> BehindTextResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(BehindTextError::validation(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != (cfg.width as usize) * (cfg.height as usize) * 4 {
        return Err(BehindTextError::validation(
            "frame.data size mismatch with width*height*4",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/recorder.rs"]
mod tests;
