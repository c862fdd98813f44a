use std::fmt;
use std::path::Path;
use std::sync::Arc;

use usvg::fontdb;

/// Font bytes for one resolved face.
#[derive(Clone)]
pub struct FontFace {
    /// Primary family name of the face.
    pub family: String,
    /// Whole font file (a collection for `.ttc`).
    pub data: Arc<Vec<u8>>,
    /// Face index inside `data`.
    pub index: u32,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("data_len", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

/// Outcome of a font lookup.
#[derive(Clone, Debug)]
pub enum FontResolution {
    /// The requested family is installed.
    Exact(FontFace),
    /// The requested family is missing; another face stands in.
    Fallback(FontFace),
    /// No font is available at all.
    Missing,
}

impl FontResolution {
    /// The face to draw with, if any.
    pub fn face(&self) -> Option<&FontFace> {
        match self {
            Self::Exact(f) | Self::Fallback(f) => Some(f),
            Self::Missing => None,
        }
    }
}

/// Local font availability, backed by `fontdb`.
///
/// Lookups are synchronous: a family is either installed or it is not.
#[derive(Clone, Default)]
pub struct FontBook {
    db: fontdb::Database,
}

impl fmt::Debug for FontBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.face_count())
            .finish()
    }
}

impl FontBook {
    /// Empty book with no faces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Book holding every font installed on the system.
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self { db }
    }

    /// Register every `.ttf`, `.otf` and `.ttc` file directly inside `dir`.
    pub fn load_dir(&mut self, dir: &Path) {
        let Ok(rd) = std::fs::read_dir(dir) else {
            tracing::warn!(dir = %dir.display(), "font directory is not readable");
            return;
        };

        for entry in rd.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            let ext = ext.to_ascii_lowercase();
            if ext != "ttf" && ext != "otf" && ext != "ttc" {
                continue;
            }
            if let Err(e) = self.db.load_font_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to load font file");
            }
        }
    }

    /// Register a font from raw bytes.
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
    }

    /// Number of registered faces.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Find a face for `family` at `weight`, falling back to sans-serif, then to anything.
    pub fn resolve(&self, family: &str, weight: u16) -> FontResolution {
        let exact = [fontdb::Family::Name(family)];
        if let Some(face) = self.query(&exact, weight) {
            return FontResolution::Exact(face);
        }
        let generic = [fontdb::Family::SansSerif];
        if let Some(face) = self.query(&generic, weight) {
            return FontResolution::Fallback(face);
        }
        match self.db.faces().next().and_then(|f| self.load(f.id)) {
            Some(face) => FontResolution::Fallback(face),
            None => FontResolution::Missing,
        }
    }

    fn query(&self, families: &[fontdb::Family<'_>], weight: u16) -> Option<FontFace> {
        let query = fontdb::Query {
            families,
            weight: fontdb::Weight(weight),
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        self.db.query(&query).and_then(|id| self.load(id))
    }

    fn load(&self, id: fontdb::ID) -> Option<FontFace> {
        let family = self
            .db
            .face(id)
            .and_then(|info| info.families.first())
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| "unknown".to_owned());
        self.db
            .with_face_data(id, |data, index| FontFace {
                family,
                data: Arc::new(data.to_vec()),
                index,
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
