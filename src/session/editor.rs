use crate::animation::driver::{AnimationDriver, DriverState, EditContext};
use crate::assets::decode::{decode_image, sniff_upload_format};
use crate::assets::fonts::FontBook;
use crate::assets::matte::BackgroundRemover;
use crate::assets::sticker::{OutlineSticker, StickerMaker};
use crate::encode::recorder::{RecordedVideo, Recorder};
use crate::encode::still::{StillFormat, encode_still};
use crate::foundation::core::Canvas;
use crate::foundation::error::{BehindTextError, BehindTextResult};
use crate::render::frame::FrameRenderer;
use crate::render::scheduler::FrameScheduler;
use crate::render::surface::Surface;
use crate::scene::model::{ImageLayerSettings, SubjectSettings, TextSettings, VideoSettings};
use crate::scene::patch::{ImageLayerPatch, SubjectPatch, TextPatch, VideoPatch};
use crate::scene::project::ProjectFile;
use crate::scene::state::CompositionState;
use crate::session::export::{ExportOpts, VideoExporter};

/// One editing session: the composition, the preview animation and both render targets.
///
/// All mutation of [`CompositionState`] goes through this type. Settings updates are field-level
/// patches, clamped into range before they are stored; uploads and sticker creation either
/// succeed completely or leave the state as it was.
#[derive(Debug)]
pub struct EditorSession {
    state: CompositionState,
    driver: AnimationDriver,
    renderer: FrameRenderer,
    preview: Surface,
    exporter: VideoExporter,
}

impl EditorSession {
    pub fn new(fonts: FontBook) -> BehindTextResult<Self> {
        let state = CompositionState::new();
        Ok(Self {
            preview: Surface::new(state.canvas())?,
            state,
            driver: AnimationDriver::new(),
            renderer: FrameRenderer::new(fonts),
            exporter: VideoExporter::default(),
        })
    }

    pub fn with_export_opts(mut self, opts: ExportOpts) -> Self {
        self.exporter = VideoExporter::new(opts);
        self
    }

    /// Build a session from a project file: fonts, settings, upload and (if enabled) sticker.
    ///
    /// A failing sticker is logged and the plain subject is used.
    #[tracing::instrument(skip_all, fields(background = %project.background_image.display()))]
    pub fn from_project(project: &ProjectFile) -> BehindTextResult<Self> {
        let mut fonts = FontBook::system();
        if let Some(dir) = &project.fonts_dir {
            fonts.load_dir(dir);
        }
        let mut session = Self::new(fonts)?;
        session.state.text = project.text.clone().clamped();
        session.state.background = project.background.clone().clamped();
        session.state.subject_settings = project.subject.clone().clamped();
        session.state.video = project.video.clone().clamped();

        let bytes = project.read_background()?;
        let mut remover = project.remover()?;
        session.upload(&bytes, None, remover.as_mut())?;

        if session.state.subject_settings.sticker.enabled
            && let Err(e) = session.create_sticker(&OutlineSticker)
        {
            tracing::warn!(error = %e, "sticker creation failed, using the plain subject");
        }
        Ok(session)
    }

    pub fn state(&self) -> &CompositionState {
        &self.state
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut FrameRenderer {
        &mut self.renderer
    }

    /// Last frame drawn by [`EditorSession::preview_frame`].
    pub fn preview(&self) -> &Surface {
        &self.preview
    }

    pub fn exporter(&self) -> &VideoExporter {
        &self.exporter
    }

    /// Accept a JPEG/PNG photo, cut out its subject and make both the new layers.
    ///
    /// The canvas takes the photo's native size. Any failure (wrong type, undecodable bytes, a
    /// rejected background removal) is an upload error and changes nothing.
    #[tracing::instrument(skip(self, bytes, remover), fields(len = bytes.len()))]
    pub fn upload(
        &mut self,
        bytes: &[u8],
        declared_mime: Option<&str>,
        remover: &mut dyn BackgroundRemover,
    ) -> BehindTextResult<Canvas> {
        let decoded = (|| -> BehindTextResult<_> {
            sniff_upload_format(bytes, declared_mime)?;
            let original = decode_image(bytes)?;
            let cut = remover.remove_background(bytes)?;
            let subject = decode_image(&cut)?;
            Ok((original, subject))
        })();
        let (original, subject) = decoded.map_err(BehindTextError::into_upload)?;

        if subject.canvas() != original.canvas() {
            tracing::debug!(
                subject_w = subject.width(),
                subject_h = subject.height(),
                "subject size differs from the photo, it will be stretched to the canvas"
            );
        }
        self.state.replace_images(original, subject);
        tracing::info!(
            w = self.state.canvas().width,
            h = self.state.canvas().height,
            "image uploaded"
        );
        Ok(self.state.canvas())
    }

    /// Create the stickerized subject with the current sticker settings.
    ///
    /// On failure the previous sticker (if any) is kept.
    #[tracing::instrument(skip_all)]
    pub fn create_sticker(&mut self, maker: &dyn StickerMaker) -> BehindTextResult<()> {
        let Some(subject) = self.state.subject() else {
            return Err(BehindTextError::sticker("no subject image to stickerize"));
        };
        let sticker = maker
            .create_sticker(subject, &self.state.subject_settings.sticker)
            .map_err(BehindTextError::into_sticker)?;
        if sticker.canvas() != subject.canvas() {
            return Err(BehindTextError::sticker(format!(
                "sticker is {}x{}, expected the subject's {}x{}",
                sticker.width(),
                sticker.height(),
                subject.width(),
                subject.height()
            )));
        }
        self.state.set_sticker(Some(sticker));
        Ok(())
    }

    pub fn update_text(&mut self, patch: &TextPatch) -> &TextSettings {
        self.state.text = patch.apply_to(&self.state.text).clamped();
        &self.state.text
    }

    pub fn update_background(&mut self, patch: &ImageLayerPatch) -> &ImageLayerSettings {
        self.state.background = patch.apply_to(&self.state.background).clamped();
        &self.state.background
    }

    pub fn update_subject(&mut self, patch: &SubjectPatch) -> &SubjectSettings {
        self.state.subject_settings = patch.apply_to(&self.state.subject_settings).clamped();
        &self.state.subject_settings
    }

    /// A running preview restarts with the new settings.
    pub fn update_video(&mut self, patch: &VideoPatch) -> &VideoSettings {
        self.state.video = patch.apply_to(&self.state.video).clamped();
        if self.driver.state() == DriverState::Playing {
            self.driver.play(&self.state.video);
        }
        &self.state.video
    }

    /// Switch editing context; leaving the video context stops the preview animation.
    pub fn set_context(&mut self, context: EditContext) {
        self.driver.set_context(context);
    }

    /// Start the preview animation. Returns `false` outside the video context.
    pub fn play(&mut self) -> bool {
        self.driver.play(&self.state.video)
    }

    pub fn pause(&mut self) {
        self.driver.pause();
    }

    pub fn resume(&mut self) {
        self.driver.resume();
    }

    pub fn stop(&mut self) {
        self.driver.stop();
    }

    /// Advance the preview animation to the scheduler's next tick and redraw the preview surface.
    pub fn preview_frame(
        &mut self,
        scheduler: &mut dyn FrameScheduler,
    ) -> BehindTextResult<&Surface> {
        let now = scheduler.next_tick();
        self.driver.tick(now);
        self.renderer.render(
            &self.state,
            self.driver.render_multipliers(),
            &mut self.preview,
        )?;
        Ok(&self.preview)
    }

    /// Encode the frame currently shown in the preview as a still image.
    pub fn render_still(&mut self, format: StillFormat) -> BehindTextResult<Vec<u8>> {
        let frame = self
            .renderer
            .render_frame(&self.state, self.driver.render_multipliers())?;
        encode_still(&frame, format).map_err(BehindTextError::into_export)
    }

    /// Export the animated composition through `recorder`, on its own off-screen surface.
    ///
    /// Returns `Ok(None)` when there is no background image.
    pub fn export_video(
        &mut self,
        recorder: &mut dyn Recorder,
        scheduler: &mut dyn FrameScheduler,
    ) -> BehindTextResult<Option<RecordedVideo>> {
        self.exporter
            .export(&self.state, &mut self.renderer, recorder, scheduler)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
