use super::*;

fn img(w: u32, h: u32) -> RasterImage {
    RasterImage::from_premul_rgba8(w, h, vec![0u8; (w * h * 4) as usize]).unwrap()
}

#[test]
fn new_state_is_empty_with_initial_canvas() {
    let s = CompositionState::new();
    assert!(s.original().is_none());
    assert!(s.subject().is_none());
    assert!(s.active_subject().is_none());
    assert_eq!(s.canvas(), Canvas::INITIAL);
}

#[test]
fn replace_images_adopts_original_size_and_drops_sticker() {
    let mut s = CompositionState::new();
    s.replace_images(img(40, 30), img(40, 30));
    s.set_sticker(Some(img(40, 30)));
    assert!(s.sticker().is_some());

    s.replace_images(img(20, 10), img(20, 10));
    assert_eq!(s.canvas(), Canvas::new(20, 10).unwrap());
    assert!(s.sticker().is_none());
}

#[test]
fn active_subject_prefers_enabled_sticker() {
    let mut s = CompositionState::new();
    s.replace_images(img(4, 4), img(4, 4));
    s.set_sticker(Some(img(2, 2)));
    assert_eq!(s.active_subject().unwrap().width(), 4);

    s.subject_settings.sticker.enabled = true;
    assert_eq!(s.active_subject().unwrap().width(), 2);

    s.set_sticker(None);
    assert_eq!(s.active_subject().unwrap().width(), 4, "falls back to the plain subject");
}

#[test]
fn canvas_can_be_overridden() {
    let mut s = CompositionState::new();
    s.replace_images(img(4, 4), img(4, 4));
    s.set_canvas(Canvas::new(8, 8).unwrap());
    assert_eq!(s.canvas(), Canvas::new(8, 8).unwrap());
}
