use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::assets::matte::{BackgroundRemover, CommandRemover, PrecutMatte};
use crate::foundation::error::{BehindTextError, BehindTextResult};
use crate::scene::model::{ImageLayerSettings, SubjectSettings, TextSettings, VideoSettings};

/// JSON description of one edit, read by the `behindtext` binary.
///
/// Relative paths are resolved against the directory holding the project file. The file is an
/// input only; nothing is ever written back to it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Background photo (JPEG or PNG).
    pub background_image: PathBuf,
    /// Already cut-out subject PNG. Takes precedence over `remove_background_command`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_image: Option<PathBuf>,
    /// External matting tool, argv form, with `{input}`/`{output}` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_background_command: Option<Vec<String>>,
    /// Extra fonts to register next to the system fonts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts_dir: Option<PathBuf>,
    /// Text layer settings.
    #[serde(default)]
    pub text: TextSettings,
    /// Background layer settings.
    #[serde(default)]
    pub background: ImageLayerSettings,
    /// Subject layer settings, including the sticker toggle.
    #[serde(default)]
    pub subject: SubjectSettings,
    /// Animation and video length.
    #[serde(default)]
    pub video: VideoSettings,
}

impl ProjectFile {
    /// Parse a project from a JSON reader. Paths are left as written.
    pub fn from_reader<R: std::io::Read>(r: R) -> BehindTextResult<Self> {
        let project: ProjectFile = serde_json::from_reader(r)
            .map_err(|e| BehindTextError::serde(format!("parse project JSON: {e}")))?;
        project.validate()?;
        Ok(project)
    }

    /// Parse a project file and resolve its relative paths against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> BehindTextResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BehindTextError::validation(format!("open project JSON '{}': {e}", path.display()))
        })?;
        let mut project = Self::from_reader(BufReader::new(f))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        project.resolve_paths(base);
        Ok(project)
    }

    /// Check that a subject source is configured.
    pub fn validate(&self) -> BehindTextResult<()> {
        match (&self.subject_image, &self.remove_background_command) {
            (None, None) => Err(BehindTextError::validation(
                "project needs either subject_image or remove_background_command",
            )),
            (None, Some(argv)) if argv.is_empty() => Err(BehindTextError::validation(
                "remove_background_command must not be empty",
            )),
            _ => Ok(()),
        }
    }

    /// Make every relative path absolute with respect to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.background_image);
        if let Some(p) = &mut self.subject_image {
            join(p);
        }
        if let Some(p) = &mut self.fonts_dir {
            join(p);
        }
    }

    /// Read the background photo bytes.
    pub fn read_background(&self) -> BehindTextResult<Vec<u8>> {
        let bytes = std::fs::read(&self.background_image).with_context(|| {
            format!("read background image '{}'", self.background_image.display())
        })?;
        Ok(bytes)
    }

    /// Build the background-removal collaborator this project asks for.
    pub fn remover(&self) -> BehindTextResult<Box<dyn BackgroundRemover>> {
        if let Some(path) = &self.subject_image {
            return Ok(Box::new(PrecutMatte::from_path(path)?));
        }
        match &self.remove_background_command {
            Some(argv) => Ok(Box::new(CommandRemover::new(argv.clone())?)),
            None => Err(BehindTextError::validation(
                "project needs either subject_image or remove_background_command",
            )),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/project.rs"]
mod tests;
