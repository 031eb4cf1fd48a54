use gpui::{Hsla, px};
use gpui_chart_canvas::animation::{
    Animatable, AnimatedValue, AnimationScope, AnimationSpec, Easing, Interpolate, LengthPair,
    ValueKind,
};
use std::time::{Duration, Instant};

fn linear(ms: u64) -> AnimationSpec {
    AnimationSpec {
        duration: Duration::from_millis(ms),
        easing: Easing::Linear,
    }
}

#[test]
fn test_set_target_same_value_is_idempotent() {
    let scope = AnimationScope::new();
    let value = Animatable::new(0.0f32, scope.clone(), linear(100));

    value.set_target(10.0);
    let first = value.ease_task().expect("ease spawned");
    value.set_target(10.0);
    let second = value.ease_task().expect("ease still there");

    assert!(!first.is_cancelled());
    assert!(!second.is_cancelled());
    assert_eq!(scope.pending(), 1);

    let start = Instant::now();
    scope.run_pending(start);
    scope.run_pending(start + Duration::from_millis(50));
    // Re-targeting mid-flight to the same value does not restart the ease.
    value.set_target(10.0);
    assert!((value.value() - 5.0).abs() < 1e-3);
    scope.run_pending(start + Duration::from_millis(100));
    assert_eq!(value.value(), 10.0);
    assert!(!value.is_running());
}

#[test]
fn test_new_target_replaces_ease_from_current_value() {
    let scope = AnimationScope::new();
    let value = Animatable::new(0.0f32, scope.clone(), linear(100));
    let start = Instant::now();

    value.set_target(100.0);
    let first = value.ease_task().expect("ease spawned");
    scope.run_pending(start);
    scope.run_pending(start + Duration::from_millis(50));
    assert!((value.value() - 50.0).abs() < 1e-3);

    value.set_target(0.0);
    assert!(first.is_cancelled());
    assert_eq!(scope.pending(), 1);

    let restart = start + Duration::from_millis(60);
    scope.run_pending(restart);
    scope.run_pending(restart + Duration::from_millis(50));
    assert!((value.value() - 25.0).abs() < 1e-3);
}

#[test]
fn test_snap_overrides_in_flight_ease() {
    let scope = AnimationScope::new();
    let value = Animatable::new(0.0f32, scope.clone(), linear(100));
    let start = Instant::now();

    value.set_target(100.0);
    let ease = value.ease_task().expect("ease spawned");
    scope.run_pending(start);
    scope.run_pending(start + Duration::from_millis(30));
    assert!(value.is_running());

    value.snap_to(42.0);
    assert_eq!(value.value(), 42.0);
    assert_eq!(value.target(), 42.0);
    assert!(!value.is_running());
    assert!(ease.is_cancelled());

    scope.run_pending(start + Duration::from_millis(200));
    assert_eq!(value.value(), 42.0);
}

#[test]
fn test_reset_masks_stale_reads() {
    let scope = AnimationScope::new();
    let value = Animatable::new(px(10.0), scope.clone(), linear(100));
    let start = Instant::now();

    value.set_target(px(20.0));
    scope.run_pending(start);
    scope.run_pending(start + Duration::from_millis(50));
    assert!((f32::from(value.value()) - 15.0).abs() < 1e-3);

    value.reset(px(30.0));
    assert!(value.is_resetting());
    assert_eq!(value.value(), px(30.0));
    assert_eq!(value.target(), px(30.0));

    scope.run_pending(start + Duration::from_millis(60));
    assert!(!value.is_resetting());
    assert_eq!(value.value(), px(30.0));
    assert_eq!(scope.pending(), 0);
}

#[test]
fn test_reset_to_same_initial_is_noop() {
    let scope = AnimationScope::new();
    let value = Animatable::new(3i32, scope.clone(), linear(100));
    value.reset(3);
    assert!(!value.is_resetting());
    assert_eq!(scope.pending(), 0);
}

#[test]
fn test_zero_duration_finishes_on_first_poll() {
    let scope = AnimationScope::new();
    let value = Animatable::new(0i32, scope.clone(), linear(0));
    value.set_target(9);
    assert_eq!(scope.run_pending(Instant::now()), 0);
    assert_eq!(value.value(), 9);
}

#[test]
fn test_closed_scope_leaves_value_in_place() {
    let scope = AnimationScope::new();
    let value = Animatable::new(1.0f32, scope.clone(), linear(100));
    scope.close();
    value.set_target(2.0);
    scope.run_pending(Instant::now() + Duration::from_secs(1));
    assert_eq!(value.value(), 1.0);
    assert!(value.ease_task().is_some_and(|t| t.is_cancelled()));
}

#[test]
fn test_dropped_value_ends_its_task() {
    let scope = AnimationScope::new();
    let value = Animatable::new(0.0f32, scope.clone(), linear(100));
    value.set_target(1.0);
    let ease = value.ease_task().expect("ease spawned");
    drop(value);
    assert_eq!(scope.run_pending(Instant::now()), 0);
    assert!(ease.is_finished());
}

#[test]
fn test_color_lerp_takes_short_hue_path() {
    let from = gpui::hsla(0.95, 0.5, 0.5, 1.0);
    let to = gpui::hsla(0.05, 0.5, 0.5, 1.0);
    let mid = <Hsla as Interpolate>::lerp(from, to, 0.5);
    assert!(mid.h < 0.01 || mid.h > 0.99, "hue {}", mid.h);
}

#[test]
fn test_slot_round_trip_by_kind() {
    let scope = AnimationScope::new();
    let slot = LengthPair::into_slot(Animatable::new(
        LengthPair::uniform(px(4.0)),
        scope,
        AnimationSpec::default(),
    ));
    assert_eq!(slot.kind(), ValueKind::LengthPair);
    assert!(f32::from_slot(&slot).is_none());
    assert_eq!(
        slot.expect_typed::<LengthPair>().value(),
        LengthPair::uniform(px(4.0))
    );
}

#[test]
#[should_panic(expected = "animation slot of kind")]
fn test_typed_access_with_wrong_kind_panics() {
    let slot = AnimatedValue::Int(Animatable::new(
        1,
        AnimationScope::new(),
        AnimationSpec::default(),
    ));
    let _ = slot.expect_typed::<f32>();
}

#[test]
fn test_easing_curves_reach_endpoints() {
    for easing in [
        Easing::Linear,
        Easing::FastOutSlowIn,
        Easing::LinearOutSlowIn,
        Easing::EaseInOut,
    ] {
        assert!(easing.transform(0.0).abs() < 1e-4, "{easing:?}");
        assert!((easing.transform(1.0) - 1.0).abs() < 1e-4, "{easing:?}");
    }
}
