use super::*;

fn chain(brightness: f64, contrast: f64, saturate: f64, blur_px: f64) -> FilterChain {
    FilterChain {
        brightness,
        contrast,
        saturate,
        blur_px,
    }
}

#[test]
fn css_string_omits_zero_blur() {
    assert_eq!(
        FilterChain::IDENTITY.to_string(),
        "brightness(100%) contrast(100%) saturate(100%)"
    );
    assert_eq!(
        chain(120.0, 90.0, 0.0, 3.0).to_string(),
        "brightness(120%) contrast(90%) saturate(0%) blur(3px)"
    );
}

#[test]
fn from_layer_maps_saturation() {
    let layer = ImageLayerSettings {
        saturation: 150.0,
        blur: 2.0,
        ..ImageLayerSettings::default()
    };
    let c = FilterChain::from_layer(&layer);
    assert_eq!(c.saturate, 150.0);
    assert_eq!(c.blur_px, 2.0);
    assert!(!c.is_identity());
    assert!(FilterChain::from_layer(&ImageLayerSettings::default()).is_identity());
}

#[test]
fn identity_leaves_pixels_untouched() {
    let mut px = vec![10u8, 20, 30, 40, 200, 100, 50, 255];
    let before = px.clone();
    FilterChain::IDENTITY.apply_in_place(&mut px, 2, 1).unwrap();
    assert_eq!(px, before);
}

#[test]
fn brightness_zero_gives_black() {
    let mut px = vec![200u8, 150, 100, 255];
    chain(0.0, 100.0, 100.0, 0.0)
        .apply_in_place(&mut px, 1, 1)
        .unwrap();
    assert_eq!(px, vec![0, 0, 0, 255]);
}

#[test]
fn brightness_clamps_at_white() {
    let mut px = vec![200u8, 200, 200, 255];
    chain(200.0, 100.0, 100.0, 0.0)
        .apply_in_place(&mut px, 1, 1)
        .unwrap();
    assert_eq!(px, vec![255, 255, 255, 255]);
}

#[test]
fn contrast_zero_gives_mid_grey() {
    let mut px = vec![10u8, 240, 90, 255];
    chain(100.0, 0.0, 100.0, 0.0)
        .apply_in_place(&mut px, 1, 1)
        .unwrap();
    assert!(px[..3].iter().all(|&c| c == 128 || c == 127));
}

#[test]
fn saturate_zero_is_grey() {
    let mut px = vec![255u8, 0, 0, 255];
    chain(100.0, 100.0, 0.0, 0.0)
        .apply_in_place(&mut px, 1, 1)
        .unwrap();
    assert_eq!(px[0], px[1]);
    assert_eq!(px[1], px[2]);
    assert_eq!(px[0], (0.213f64 * 255.0).round() as u8);
}

#[test]
fn transparent_pixels_stay_transparent() {
    let mut px = vec![0u8, 0, 0, 0];
    chain(150.0, 150.0, 150.0, 0.0)
        .apply_in_place(&mut px, 1, 1)
        .unwrap();
    assert_eq!(px, vec![0, 0, 0, 0]);
}
