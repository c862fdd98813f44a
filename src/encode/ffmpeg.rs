use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::assets::color::Color;
use crate::effects::composite::flatten_premul_over_bg;
use crate::encode::recorder::{
    RecordedVideo, Recorder, RecorderConfig, RecorderStatus, check_frame_size,
};
use crate::foundation::error::{BehindTextError, BehindTextResult};
use crate::render::surface::FrameRGBA;

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> BehindTextResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

struct Encoding {
    cfg: RecorderConfig,
    child: Child,
    stdin: Option<ChildStdin>,
    frames: u64,
}

/// MP4 (H.264, yuv420p) recorder backed by the system `ffmpeg` binary.
///
/// Frames are flattened over `background` (black by default) and streamed as raw RGBA over
/// stdin. Canvas dimensions must be even.
pub struct FfmpegRecorder {
    out_path: PathBuf,
    overwrite: bool,
    background: Color,
    encoding: Option<Encoding>,
    status: RecorderStatus,
    scratch: Vec<u8>,
}

impl FfmpegRecorder {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Color::BLACK,
            encoding: None,
            status: RecorderStatus::Ready,
            scratch: Vec::new(),
        }
    }

    /// Refuse to replace an existing file when `false`.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn out_path(&self) -> &Path {
        &self.out_path
    }

    fn validate(&self, cfg: &RecorderConfig) -> BehindTextResult<()> {
        cfg.validate()?;
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(BehindTextError::validation(format!(
                "encode width/height must be even for yuv420p mp4 output, got {}x{}",
                cfg.width, cfg.height
            )));
        }
        if !self.overwrite && self.out_path.exists() {
            return Err(BehindTextError::validation(format!(
                "output file '{}' already exists",
                self.out_path.display()
            )));
        }
        Ok(())
    }

    fn spawn(&self, cfg: &RecorderConfig) -> BehindTextResult<Child> {
        if !is_ffmpeg_on_path() {
            return Err(BehindTextError::export(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&self.out_path);

        cmd.spawn().map_err(|e| {
            BehindTextError::export(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })
    }

    fn remove_partial_output(&self) {
        if let Err(e) = std::fs::remove_file(&self.out_path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::debug!(path = %self.out_path.display(), error = %e, "failed to remove partial video");
        }
    }
}

impl Recorder for FfmpegRecorder {
    #[tracing::instrument(skip(self), fields(out = %self.out_path.display()))]
    fn start(&mut self, cfg: RecorderConfig) -> BehindTextResult<()> {
        if self.status == RecorderStatus::Recording {
            return Err(BehindTextError::export("recorder is already recording"));
        }
        self.validate(&cfg)?;
        ensure_parent_dir(&self.out_path)?;

        let mut child = self.spawn(&cfg)?;
        let Some(stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(BehindTextError::export("failed to open ffmpeg stdin"));
        };

        self.scratch.resize((cfg.width as usize) * (cfg.height as usize) * 4, 0);
        self.encoding = Some(Encoding {
            cfg,
            child,
            stdin: Some(stdin),
            frames: 0,
        });
        self.status = RecorderStatus::Recording;
        Ok(())
    }

    fn step(&mut self, frame: &FrameRGBA) -> BehindTextResult<()> {
        let Some(enc) = self.encoding.as_mut() else {
            return Err(BehindTextError::export("recorder is not recording"));
        };
        check_frame_size(&enc.cfg, frame)?;

        if frame.premultiplied {
            flatten_premul_over_bg(&mut self.scratch, &frame.data, self.background)?;
        } else {
            let mut premul = frame.data.clone();
            crate::foundation::math::premultiply_rgba8_in_place(&mut premul);
            flatten_premul_over_bg(&mut self.scratch, &premul, self.background)?;
        }

        let Some(stdin) = enc.stdin.as_mut() else {
            return Err(BehindTextError::export("ffmpeg encoder is already finalized"));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            BehindTextError::export(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        enc.frames += 1;
        Ok(())
    }

    fn stop(&mut self) -> BehindTextResult<RecordedVideo> {
        let Some(mut enc) = self.encoding.take() else {
            return Err(BehindTextError::export("recorder is not recording"));
        };
        drop(enc.stdin.take());
        self.status = RecorderStatus::Stopped;

        let output = enc.child.wait_with_output().map_err(|e| {
            BehindTextError::export(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BehindTextError::export(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(RecordedVideo {
            path: Some(self.out_path.clone()),
            width: enc.cfg.width,
            height: enc.cfg.height,
            fps: enc.cfg.fps,
            frames: enc.frames,
        })
    }

    fn abort(&mut self) {
        if let Some(mut enc) = self.encoding.take() {
            drop(enc.stdin.take());
            if let Err(e) = enc.child.kill() {
                tracing::debug!(error = %e, "ffmpeg already exited");
            }
            let _ = enc.child.wait();
            self.remove_partial_output();
            tracing::warn!(out = %self.out_path.display(), frames = enc.frames, "video recording aborted");
        }
        self.status = RecorderStatus::Ready;
    }

    fn status(&self) -> RecorderStatus {
        self.status
    }
}

impl Drop for FfmpegRecorder {
    fn drop(&mut self) {
        if self.encoding.is_some() {
            self.abort();
        }
    }
}

impl std::fmt::Debug for FfmpegRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegRecorder")
            .field("out_path", &self.out_path)
            .field("overwrite", &self.overwrite)
            .field("status", &self.status)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
