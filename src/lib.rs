//! Behindtext composites text *behind* the subject of a photo.
//!
//! An upload is split into the original photo and a cut-out subject (via a pluggable background
//! remover). Each frame draws the filtered background, then the text block, then the subject on
//! top, so the text appears to sit between them. The text can be animated (fade/zoom) and the
//! result exported as a still image or an MP4 video.
//!
//! - Drive everything through an [`EditorSession`]
//! - Render single frames with a [`FrameRenderer`]
//! - Stream an animated export into a [`Recorder`] such as [`FfmpegRecorder`]
#![forbid(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod effects;
pub mod encode;
pub mod foundation;
pub mod render;
pub mod scene;
pub mod session;

pub use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, Point, Rgba8Premul, Vec2};
pub use crate::foundation::error::{BehindTextError, BehindTextResult};

pub use crate::animation::driver::{AnimationDriver, DriverState, EditContext};
pub use crate::animation::ease::Easing;
pub use crate::animation::tween::{ExportTimeline, TextAnimation, Tween};
pub use crate::assets::color::Color;
pub use crate::assets::decode::{RasterImage, UploadFormat, decode_image, sniff_upload_format};
pub use crate::assets::fonts::{FontBook, FontResolution};
pub use crate::assets::matte::{BackgroundRemover, CommandRemover, PrecutMatte};
pub use crate::assets::sticker::{OutlineSticker, StickerMaker};
pub use crate::encode::ffmpeg::{FfmpegRecorder, is_ffmpeg_on_path};
pub use crate::encode::recorder::{
    InMemoryRecorder, RecordedVideo, Recorder, RecorderConfig, RecorderStatus,
};
pub use crate::encode::still::{StillFormat, encode_still};
pub use crate::render::frame::FrameRenderer;
pub use crate::render::scheduler::{FixedStepScheduler, FrameScheduler, RealTimeScheduler};
pub use crate::render::surface::{FrameRGBA, Surface};
pub use crate::render::text::RenderWarning;
pub use crate::scene::model::{
    AnimationKind, ImageLayerSettings, LayerShadow, StickerSettings, SubjectSettings, TextAlign,
    TextSettings, VideoSettings,
};
pub use crate::scene::patch::{
    ImageLayerPatch, LayerShadowPatch, StickerPatch, SubjectPatch, TextPatch, VideoPatch,
};
pub use crate::scene::project::ProjectFile;
pub use crate::scene::state::CompositionState;
pub use crate::session::editor::EditorSession;
pub use crate::session::export::{ExportOpts, VideoExporter};
