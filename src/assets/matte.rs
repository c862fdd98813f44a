//! Background removal seam.
//!
//! The editor treats matting as an opaque function: encoded photo bytes in, encoded alpha-masked
//! image bytes out. Failures surface as upload errors and abort the upload.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;

use crate::foundation::error::{BehindTextError, BehindTextResult};

/// Produces an alpha-masked version of an uploaded photo.
pub trait BackgroundRemover {
    /// Return encoded image bytes (PNG with alpha) containing only the subject.
    fn remove_background(&mut self, source: &[u8]) -> BehindTextResult<Vec<u8>>;
}

impl<F> BackgroundRemover for F
where
    F: FnMut(&[u8]) -> BehindTextResult<Vec<u8>>,
{
    fn remove_background(&mut self, source: &[u8]) -> BehindTextResult<Vec<u8>> {
        self(source)
    }
}

/// Returns the bytes of a subject image that was cut out ahead of time.
#[derive(Clone, Debug)]
pub struct PrecutMatte {
    bytes: Vec<u8>,
}

impl PrecutMatte {
    /// Wrap encoded subject bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Read encoded subject bytes from disk.
    pub fn from_path(path: impl AsRef<Path>) -> BehindTextResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read subject image '{}'", path.display()))?;
        Ok(Self { bytes })
    }
}

impl BackgroundRemover for PrecutMatte {
    fn remove_background(&mut self, _source: &[u8]) -> BehindTextResult<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// Runs an external matting tool through temporary files.
///
/// `argv[0]` is the program; any argument equal to or containing `{input}` / `{output}` has the
/// placeholder replaced by the temporary input/output path, e.g. `["rembg", "i", "{input}",
/// "{output}"]`.
#[derive(Clone, Debug)]
pub struct CommandRemover {
    argv: Vec<String>,
    work_dir: PathBuf,
}

static NEXT_JOB: AtomicU64 = AtomicU64::new(0);

impl CommandRemover {
    /// Create a remover for `argv`; both placeholders must appear.
    pub fn new(argv: Vec<String>) -> BehindTextResult<Self> {
        if argv.is_empty() {
            return Err(BehindTextError::validation(
                "background removal command must not be empty",
            ));
        }
        for placeholder in ["{input}", "{output}"] {
            if !argv.iter().skip(1).any(|a| a.contains(placeholder)) {
                return Err(BehindTextError::validation(format!(
                    "background removal command must reference {placeholder}"
                )));
            }
        }
        Ok(Self {
            argv,
            work_dir: std::env::temp_dir(),
        })
    }

    /// Place temporary files in `dir` instead of the system temp directory.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    fn job_paths(&self) -> (PathBuf, PathBuf) {
        let job = NEXT_JOB.fetch_add(1, Ordering::Relaxed);
        let stem = format!("behindtext_matte_{}_{job}", std::process::id());
        (
            self.work_dir.join(format!("{stem}_in")),
            self.work_dir.join(format!("{stem}_out.png")),
        )
    }

    fn run(&self, input: &Path, output: &Path) -> BehindTextResult<Vec<u8>> {
        let args = self.argv[1..].iter().map(|a| {
            a.replace("{input}", &input.to_string_lossy())
                .replace("{output}", &output.to_string_lossy())
        });
        let out = Command::new(&self.argv[0])
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("spawn background removal command '{}'", self.argv[0]))?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(BehindTextError::upload(format!(
                "background removal exited with status {}: {}",
                out.status,
                stderr.trim()
            )));
        }
        let bytes = std::fs::read(output)
            .with_context(|| format!("read background removal output '{}'", output.display()))?;
        Ok(bytes)
    }
}

impl BackgroundRemover for CommandRemover {
    #[tracing::instrument(skip(self, source), fields(program = %self.argv[0], bytes = source.len()))]
    fn remove_background(&mut self, source: &[u8]) -> BehindTextResult<Vec<u8>> {
        let (input, output) = self.job_paths();
        std::fs::write(&input, source)
            .with_context(|| format!("write background removal input '{}'", input.display()))?;
        let result = self.run(&input, &output);
        for p in [&input, &output] {
            if let Err(e) = std::fs::remove_file(p)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                tracing::debug!(path = %p.display(), error = %e, "failed to remove matte temp file");
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/matte.rs"]
mod tests;
