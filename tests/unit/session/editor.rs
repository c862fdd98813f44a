use super::*;
use crate::animation::driver::EditContext;
use crate::assets::decode::RasterImage;
use crate::encode::recorder::InMemoryRecorder;
use crate::foundation::core::Fps;
use crate::render::scheduler::FixedStepScheduler;
use crate::scene::model::StickerSettings;

fn png(w: u32, h: u32, px: impl Fn(u32, u32) -> [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(w, h, |x, y| image::Rgba(px(x, y)));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn photo() -> Vec<u8> {
    png(400, 300, |x, _| [(x % 256) as u8, 90, 160, 255])
}

fn cutout() -> Vec<u8> {
    png(400, 300, |x, y| {
        if (150..250).contains(&x) && (100..200).contains(&y) {
            [220, 40, 40, 255]
        } else {
            [0, 0, 0, 0]
        }
    })
}

fn session_with_upload() -> EditorSession {
    let mut s = EditorSession::new(FontBook::new()).unwrap();
    let subject = cutout();
    let mut remover = |_: &[u8]| -> BehindTextResult<Vec<u8>> { Ok(subject.clone()) };
    s.upload(&photo(), Some("image/png"), &mut remover).unwrap();
    s
}

#[test]
fn upload_adopts_native_size() {
    let s = session_with_upload();
    assert_eq!(s.state().canvas(), Canvas::new(400, 300).unwrap());
    assert!(s.state().original().is_some());
    assert!(s.state().subject().is_some());
}

#[test]
fn rejected_type_leaves_state_untouched() {
    let mut s = EditorSession::new(FontBook::new()).unwrap();
    let mut remover = |b: &[u8]| -> BehindTextResult<Vec<u8>> { Ok(b.to_vec()) };
    let err = s
        .upload(&photo(), Some("image/gif"), &mut remover)
        .unwrap_err();
    assert!(matches!(err, BehindTextError::Upload(_)));
    let err = s.upload(b"not an image", None, &mut remover).unwrap_err();
    assert!(matches!(err, BehindTextError::Upload(_)));
    assert!(s.state().original().is_none());
    assert_eq!(s.state().canvas(), Canvas::INITIAL);
}

#[test]
fn failed_background_removal_keeps_previous_upload() {
    let mut s = session_with_upload();
    let before = s.state().original().cloned().unwrap();
    let mut failing =
        |_: &[u8]| -> BehindTextResult<Vec<u8>> { Err(BehindTextError::render("service down")) };
    let small = png(10, 10, |_, _| [0, 0, 0, 255]);
    let err = s.upload(&small, None, &mut failing).unwrap_err();
    assert!(matches!(err, BehindTextError::Upload(ref m) if m.contains("service down")));
    assert!(s.state().original().unwrap().same_pixels(&before));
    assert_eq!(s.state().canvas().width, 400);
}

#[test]
fn sticker_needs_a_subject() {
    let mut s = EditorSession::new(FontBook::new()).unwrap();
    let err = s.create_sticker(&OutlineSticker).unwrap_err();
    assert!(matches!(err, BehindTextError::Sticker(_)));
}

#[test]
fn sticker_failure_keeps_plain_subject_active() {
    let mut s = session_with_upload();
    s.update_subject(&SubjectPatch {
        sticker: Some(crate::scene::patch::StickerPatch {
            enabled: Some(true),
            ..Default::default()
        }),
        ..SubjectPatch::default()
    });
    let failing = |_: &RasterImage, _: &StickerSettings| -> BehindTextResult<RasterImage> {
        Err(BehindTextError::validation("nope"))
    };
    let err = s.create_sticker(&failing).unwrap_err();
    assert!(matches!(err, BehindTextError::Sticker(_)));
    assert!(s.state().sticker().is_none());
    assert!(
        s.state()
            .active_subject()
            .unwrap()
            .same_pixels(s.state().subject().unwrap())
    );

    s.create_sticker(&OutlineSticker).unwrap();
    assert!(s.state().sticker().is_some());
    assert!(
        s.state()
            .active_subject()
            .unwrap()
            .same_pixels(s.state().sticker().unwrap())
    );
}

#[test]
fn updates_are_clamped_and_partial() {
    let mut s = EditorSession::new(FontBook::new()).unwrap();
    let t = s.update_text(&TextPatch {
        opacity: Some(400.0),
        text: Some("Hello, World".into()),
        ..TextPatch::default()
    });
    assert_eq!(t.opacity, 100.0);
    assert_eq!(t.text, "Hello, World");
    assert_eq!(t.font_size, 48.0);

    let bg = s.update_background(&ImageLayerPatch {
        scale: Some(0.0),
        ..ImageLayerPatch::default()
    });
    assert_eq!(bg.scale, 0.1);

    let v = s.update_video(&VideoPatch {
        video_duration: Some(-1.0),
        ..VideoPatch::default()
    });
    assert_eq!(v.video_duration, 0.0);
}

#[test]
fn playback_only_in_video_context() {
    let mut s = EditorSession::new(FontBook::new()).unwrap();
    assert!(!s.play());
    s.set_context(EditContext::Video);
    assert!(s.play());
    assert_eq!(s.driver().state(), DriverState::Playing);
    s.pause();
    assert_eq!(s.driver().state(), DriverState::Paused);
    s.resume();
    assert_eq!(s.driver().state(), DriverState::Playing);
    s.set_context(EditContext::Text);
    assert_eq!(s.driver().state(), DriverState::Idle);
}

#[test]
fn preview_follows_canvas_and_animation() {
    let mut s = session_with_upload();
    s.set_context(EditContext::Video);
    s.update_video(&VideoPatch {
        easing: Some(crate::animation::ease::Easing::Linear),
        ..VideoPatch::default()
    });
    s.play();
    let mut sched = FixedStepScheduler::new(Fps::new(30, 1).unwrap());
    s.preview_frame(&mut sched).unwrap();
    for _ in 0..30 {
        s.preview_frame(&mut sched).unwrap();
    }
    assert_eq!(s.preview().canvas(), Canvas::new(400, 300).unwrap());
    assert!((s.driver().current().opacity - 0.5).abs() < 1e-9);
}

#[test]
fn still_export_is_canvas_sized() {
    let mut s = session_with_upload();
    let png_bytes = s.render_still(StillFormat::Png).unwrap();
    let img = image::load_from_memory(&png_bytes).unwrap();
    assert_eq!((img.width(), img.height()), (400, 300));
    let jpeg = s.render_still(StillFormat::Jpeg).unwrap();
    assert_eq!(image::guess_format(&jpeg).unwrap(), image::ImageFormat::Jpeg);
}

#[test]
fn export_uses_its_own_surface() {
    let mut s = session_with_upload();
    s.update_video(&VideoPatch {
        video_duration: Some(1.0),
        animation_duration: Some(0.5),
        ..VideoPatch::default()
    });
    let mut rec = InMemoryRecorder::new();
    let mut sched = FixedStepScheduler::new(Fps::new(30, 1).unwrap());
    let video = s.export_video(&mut rec, &mut sched).unwrap().unwrap();
    assert_eq!(video.frames, 30);
    assert_eq!(rec.frames()[0].width, 400);
    assert_eq!(s.preview().canvas(), Canvas::INITIAL, "preview surface untouched");
}

#[test]
fn export_after_preview_starts_from_the_beginning() {
    let mut s = session_with_upload();
    s.set_context(EditContext::Video);
    s.play();
    let mut sched = FixedStepScheduler::new(Fps::new(30, 1).unwrap());
    for _ in 0..150 {
        s.preview_frame(&mut sched).unwrap();
    }
    let mut rec = InMemoryRecorder::new();
    let video = s.export_video(&mut rec, &mut sched).unwrap().unwrap();
    assert_eq!(video.frames, 300);
    assert!((video.duration_secs() - 10.0).abs() < 1e-9);
}

#[test]
fn export_without_upload_does_nothing() {
    let mut s = EditorSession::new(FontBook::new()).unwrap();
    let mut rec = InMemoryRecorder::new();
    let mut sched = FixedStepScheduler::new(Fps::new(30, 1).unwrap());
    assert!(s.export_video(&mut rec, &mut sched).unwrap().is_none());
}
