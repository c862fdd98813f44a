use crate::assets::decode::RasterImage;
use crate::foundation::core::Canvas;
use crate::scene::model::{ImageLayerSettings, SubjectSettings, TextSettings, VideoSettings};

/// Everything the frame renderer and the export pipeline read.
///
/// Image handles are shared and immutable; they are only ever replaced as a whole through
/// [`CompositionState::replace_images`] and [`CompositionState::set_sticker`]. Settings are plain
/// values swapped by the owning session.
#[derive(Clone, Debug, Default)]
pub struct CompositionState {
    original: Option<RasterImage>,
    subject: Option<RasterImage>,
    sticker: Option<RasterImage>,
    canvas: Canvas,
    /// Text layer settings.
    pub text: TextSettings,
    /// Background layer settings.
    pub background: ImageLayerSettings,
    /// Subject layer settings.
    pub subject_settings: SubjectSettings,
    /// Animation and video length.
    pub video: VideoSettings,
}

impl CompositionState {
    /// Empty state: no images, default settings, initial canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Background source image, if uploaded.
    pub fn original(&self) -> Option<&RasterImage> {
        self.original.as_ref()
    }

    /// Background-removed subject image, if uploaded.
    pub fn subject(&self) -> Option<&RasterImage> {
        self.subject.as_ref()
    }

    /// Stickerized subject, if one was created for the current upload.
    pub fn sticker(&self) -> Option<&RasterImage> {
        self.sticker.as_ref()
    }

    /// Canvas size in pixels.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// The subject image the renderer draws.
    ///
    /// The stickerized variant wins only while the sticker effect is enabled and one exists.
    pub fn active_subject(&self) -> Option<&RasterImage> {
        if self.subject_settings.sticker.enabled
            && let Some(sticker) = &self.sticker
        {
            return Some(sticker);
        }
        self.subject.as_ref()
    }

    /// Replace the original/subject pair, drop any stale sticker and adopt the original's size.
    pub fn replace_images(&mut self, original: RasterImage, subject: RasterImage) {
        self.canvas = original.canvas();
        self.original = Some(original);
        self.subject = Some(subject);
        self.sticker = None;
    }

    /// Store (or clear) the stickerized subject.
    pub fn set_sticker(&mut self, sticker: Option<RasterImage>) {
        self.sticker = sticker;
    }

    /// Override the canvas size, e.g. with a bounded fit of the native size.
    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/state.rs"]
mod tests;
