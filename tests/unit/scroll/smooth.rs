use super::*;

fn linear(duration: f64) -> SmoothScrollOptions {
    SmoothScrollOptions {
        duration,
        easing: Ease::Linear,
        wheel_multiplier: 1.0,
        ..SmoothScrollOptions::window()
    }
}

#[test]
fn presets_match_scroll_modes() {
    let w = SmoothScrollOptions::window();
    let c = SmoothScrollOptions::container();
    assert_eq!(w.duration, 2.0);
    assert_eq!(w.wheel_multiplier, 0.3);
    assert_eq!(c.duration, 1.2);
    assert_eq!(c.wheel_multiplier, 1.0);
    assert_eq!(w.touch_multiplier, 2.0);
    assert_eq!(c.easing, Ease::SmoothScroll);
}

#[test]
fn wheel_eases_toward_target() {
    let mut s = SmoothScroll::new(linear(1.0), 0.0, 10_000.0).unwrap();
    s.wheel(400.0);
    assert_eq!(s.target_offset(), 400.0);
    assert!(s.is_scrolling());

    assert!(!s.raf(0.0)); // first frame establishes the clock
    assert!(s.raf(500.0));
    assert_eq!(s.current_offset(), 200.0);
    assert!(s.raf(1000.0));
    assert_eq!(s.current_offset(), 400.0);
    assert!(!s.is_scrolling());
    assert!(!s.raf(1016.0));
}

#[test]
fn wheel_multiplier_scales_delta() {
    let mut s = SmoothScroll::new(SmoothScrollOptions::window(), 0.0, 10_000.0).unwrap();
    s.wheel(1000.0);
    assert!((s.target_offset() - 300.0).abs() < 1e-9);
    s.touch(50.0);
    assert!((s.target_offset() - 400.0).abs() < 1e-9);
}

#[test]
fn retarget_starts_from_current_position() {
    let mut s = SmoothScroll::new(linear(1.0), 0.0, 10_000.0).unwrap();
    s.wheel(1000.0);
    s.raf(0.0);
    s.raf(500.0);
    assert_eq!(s.current_offset(), 500.0);

    // Accumulates onto the target, animates from the current position.
    s.wheel(1000.0);
    assert_eq!(s.target_offset(), 2000.0);
    s.raf(1000.0);
    assert_eq!(s.current_offset(), 1250.0);
    s.raf(1500.0);
    assert_eq!(s.current_offset(), 2000.0);
}

#[test]
fn targets_clamp_to_limit() {
    let mut s = SmoothScroll::new(linear(0.5), 0.0, 300.0).unwrap();
    s.wheel(-100.0);
    assert_eq!(s.target_offset(), 0.0);
    s.wheel(1000.0);
    assert_eq!(s.target_offset(), 300.0);

    s.set_limit(200.0);
    assert_eq!(s.target_offset(), 200.0);
    s.raf(0.0);
    s.raf(600.0);
    assert_eq!(s.current_offset(), 200.0);
}

#[test]
fn infinite_does_not_clamp() {
    let opts = SmoothScrollOptions {
        infinite: true,
        ..linear(1.0)
    };
    let mut s = SmoothScroll::new(opts, 0.0, 100.0).unwrap();
    s.wheel(-50.0);
    assert_eq!(s.target_offset(), -50.0);
}

#[test]
fn immediate_scroll_and_non_smooth_wheel_jump() {
    let mut s = SmoothScroll::new(linear(1.0), 0.0, 5000.0).unwrap();
    s.scroll_to(1200.0, true);
    assert_eq!(s.current_offset(), 1200.0);
    assert!(!s.is_scrolling());

    let opts = SmoothScrollOptions {
        smooth_wheel: false,
        ..linear(1.0)
    };
    let mut s = SmoothScroll::new(opts, 0.0, 5000.0).unwrap();
    s.wheel(80.0);
    assert_eq!(s.current_offset(), 80.0);
}

#[test]
fn stop_ignores_input_until_started() {
    let mut s = SmoothScroll::new(linear(1.0), 0.0, 5000.0).unwrap();
    s.stop();
    assert!(s.is_stopped());
    s.wheel(500.0);
    assert_eq!(s.target_offset(), 0.0);
    s.start();
    s.wheel(500.0);
    assert_eq!(s.target_offset(), 500.0);
}

#[test]
fn native_sync_only_when_idle() {
    let mut s = SmoothScroll::new(linear(1.0), 0.0, 5000.0).unwrap();
    s.sync_native(700.0);
    assert_eq!(s.current_offset(), 700.0);
    assert_eq!(s.target_offset(), 700.0);

    s.wheel(100.0);
    s.sync_native(10.0);
    assert_eq!(s.target_offset(), 800.0);
}

#[test]
fn destroy_is_idempotent_and_freezes() {
    let mut s = SmoothScroll::new(linear(1.0), 0.0, 5000.0).unwrap();
    s.wheel(500.0);
    s.destroy();
    s.destroy();
    assert!(s.is_destroyed());
    assert!(!s.raf(0.0));
    assert!(!s.raf(2000.0));
    assert_eq!(s.current_offset(), 0.0);
    s.scroll_to(100.0, true);
    assert_eq!(s.current_offset(), 0.0);
}

#[test]
fn invalid_options_are_rejected() {
    let bad = SmoothScrollOptions {
        duration: -1.0,
        ..SmoothScrollOptions::window()
    };
    assert!(SmoothScroll::new(bad, 0.0, 100.0).is_err());
    assert!(SmoothScroll::new(SmoothScrollOptions::window(), f64::NAN, 100.0).is_err());
}

#[test]
fn options_deserialize_camel_case() {
    let o: SmoothScrollOptions =
        serde_json::from_str(r#"{"duration": 1.5, "wheelMultiplier": 0.6, "easing": "out_expo"}"#)
            .unwrap();
    assert_eq!(o.duration, 1.5);
    assert_eq!(o.wheel_multiplier, 0.6);
    assert_eq!(o.easing, Ease::OutExpo);
    assert_eq!(o.touch_multiplier, 2.0);
}
