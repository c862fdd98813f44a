use super::*;

#[test]
fn defaults_match_initial_editor_state() {
    let t = TextSettings::default();
    assert_eq!(t.font_size, 48.0);
    assert_eq!(t.font_weight, 700);
    assert_eq!((t.x, t.y), (50.0, 50.0));
    assert_eq!(t.text_align, TextAlign::Center);

    let bg = ImageLayerSettings::default();
    assert_eq!(bg.opacity, 100.0);
    assert_eq!(bg.scale, 1.0);
    assert!(!bg.shadow.enabled);

    let v = VideoSettings::default();
    assert_eq!(v.animation_type, AnimationKind::FadeIn);
    assert_eq!(v.animation_duration, 2.0);
    assert_eq!(v.video_duration, 10.0);
}

#[test]
fn clamping_forces_ranges() {
    let t = TextSettings {
        opacity: 150.0,
        x: -5.0,
        y: f64::NAN,
        rotation: 720.0,
        font_weight: 50,
        ..TextSettings::default()
    }
    .clamped();
    assert_eq!(t.opacity, 100.0);
    assert_eq!(t.x, 0.0);
    assert_eq!(t.y, 0.0);
    assert_eq!(t.rotation, 180.0);
    assert_eq!(t.font_weight, 100);

    let l = ImageLayerSettings {
        scale: 10.0,
        blur: 50.0,
        brightness: -1.0,
        ..ImageLayerSettings::default()
    }
    .clamped();
    assert_eq!(l.scale, 3.0);
    assert_eq!(l.blur, 20.0);
    assert_eq!(l.brightness, 0.0);

    let v = VideoSettings {
        animation_duration: -2.0,
        ..VideoSettings::default()
    }
    .clamped();
    assert_eq!(v.animation_duration, 0.0);
}

#[test]
fn in_range_values_survive_clamping() {
    let s = SubjectSettings::default();
    assert_eq!(s.clone().clamped(), s);
    let t = TextSettings::default();
    assert_eq!(t.clone().clamped(), t);
}

#[test]
fn json_uses_kebab_case_enums_and_hex_colors() {
    let t: TextSettings = serde_json::from_str(
        r##"{"text":"A, B","text_align":"right","color":"#ff0000"}"##,
    )
    .unwrap();
    assert_eq!(t.text, "A, B");
    assert_eq!(t.text_align, TextAlign::Right);
    assert_eq!(t.color, Color::rgb(255, 0, 0));
    assert_eq!(t.font_size, 48.0, "missing fields fall back to defaults");

    let v: VideoSettings =
        serde_json::from_str(r#"{"animation_type":"zoom-out","easing":"ease-in-out"}"#).unwrap();
    assert_eq!(v.animation_type, AnimationKind::ZoomOut);
}

#[test]
fn subject_layer_fields_are_flattened() {
    let s: SubjectSettings =
        serde_json::from_str(r#"{"opacity":40,"sticker":{"enabled":true}}"#).unwrap();
    assert_eq!(s.layer.opacity, 40.0);
    assert!(s.sticker.enabled);
    assert_eq!(s.sticker.border_width, 5.0);

    let v = serde_json::to_value(&s).unwrap();
    assert_eq!(v["opacity"], 40.0);
    assert!(v.get("layer").is_none());
}
