use super::*;

#[test]
fn endpoints_are_fixed() {
    for e in [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ] {
        assert_eq!(e.apply(0.0), 0.0, "{e:?}");
        assert_eq!(e.apply(1.0), 1.0, "{e:?}");
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(Easing::Linear.apply(-1.0), 0.0);
    assert_eq!(Easing::EaseIn.apply(2.0), 1.0);
}

#[test]
fn curves_bend_the_expected_way() {
    assert_eq!(Easing::Linear.apply(0.25), 0.25);
    assert!(Easing::EaseIn.apply(0.25) < 0.25);
    assert!(Easing::EaseOut.apply(0.25) > 0.25);
    assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-12);
}

#[test]
fn serde_uses_kebab_case_names() {
    assert_eq!(
        serde_json::to_string(&Easing::EaseInOut).unwrap(),
        "\"ease-in-out\""
    );
    let e: Easing = serde_json::from_str("\"linear\"").unwrap();
    assert_eq!(e, Easing::Linear);
    assert_eq!(Easing::default(), Easing::EaseOut);
}
