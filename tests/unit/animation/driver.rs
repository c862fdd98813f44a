use super::*;
use crate::animation::ease::Easing;
use crate::scene::model::AnimationKind;

fn linear_fade_in() -> VideoSettings {
    VideoSettings {
        animation_type: AnimationKind::FadeIn,
        animation_duration: 2.0,
        easing: Easing::Linear,
        video_duration: 10.0,
    }
}

#[test]
fn play_requires_video_context() {
    let mut d = AnimationDriver::new();
    assert!(!d.play(&linear_fade_in()));
    assert_eq!(d.state(), DriverState::Idle);

    d.set_context(EditContext::Video);
    assert!(d.play(&linear_fade_in()));
    assert_eq!(d.state(), DriverState::Playing);
    assert_eq!(d.current().opacity, 0.0);
}

#[test]
fn ticks_advance_only_while_playing() {
    let mut d = AnimationDriver::new();
    d.set_context(EditContext::Video);
    d.play(&linear_fade_in());

    d.tick(100.0);
    let v = d.tick(101.0);
    assert!((v.opacity - 0.5).abs() < 1e-9);

    d.pause();
    assert_eq!(d.state(), DriverState::Paused);
    d.tick(105.0);
    assert!((d.elapsed() - 1.0).abs() < 1e-9);
    assert_eq!(d.render_multipliers(), TextAnimation::NEUTRAL);

    d.resume();
    d.tick(110.0);
    let v = d.tick(110.5);
    assert!((d.elapsed() - 1.5).abs() < 1e-9);
    assert!((v.opacity - 0.75).abs() < 1e-9);
    assert_eq!(d.render_multipliers(), v);
}

#[test]
fn leaving_video_context_stops_and_resets() {
    let mut d = AnimationDriver::new();
    d.set_context(EditContext::Video);
    d.play(&linear_fade_in());
    d.tick(0.0);
    d.tick(0.5);
    assert_ne!(d.current(), TextAnimation::NEUTRAL);

    d.set_context(EditContext::Text);
    assert_eq!(d.state(), DriverState::Idle);
    assert_eq!(d.current(), TextAnimation::NEUTRAL);
    assert_eq!(d.render_multipliers(), TextAnimation::NEUTRAL);
}

#[test]
fn stop_from_any_state_is_idle() {
    let mut d = AnimationDriver::new();
    d.set_context(EditContext::Video);
    d.play(&linear_fade_in());
    d.pause();
    d.stop();
    assert_eq!(d.state(), DriverState::Idle);
    d.resume();
    assert_eq!(d.state(), DriverState::Idle);
}

#[test]
fn play_restarts_from_start_value() {
    let mut d = AnimationDriver::new();
    d.set_context(EditContext::Video);
    d.play(&linear_fade_in());
    d.tick(0.0);
    d.tick(1.0);
    d.play(&linear_fade_in());
    assert_eq!(d.elapsed(), 0.0);
    assert_eq!(d.current().opacity, 0.0);
}
