use gpui_chart_canvas::animation::{AnimationSpec, Easing};
use gpui_chart_canvas::config::CanvasConfig;
use std::time::Duration;

#[test]
fn test_defaults() {
    let config = CanvasConfig::default();
    assert_eq!(config.animation.duration(), Duration::from_millis(300));
    assert_eq!(config.animation.easing, Easing::FastOutSlowIn);
    assert_eq!(config.event_capacity, 64);
    assert_eq!(config.long_press(), Duration::from_millis(500));

    let spec = AnimationSpec::from(&config.animation);
    assert_eq!(spec, AnimationSpec::default());
}

#[test]
fn test_partial_json_keeps_defaults() {
    let config =
        CanvasConfig::from_json_str(r#"{ "animation": { "easing": "ease_in_out" } }"#).unwrap();
    assert_eq!(config.animation.easing, Easing::EaseInOut);
    assert_eq!(config.animation.duration_ms, 300);
    assert_eq!(config.event_capacity, 64);
}

#[test]
fn test_json_round_trip() {
    let mut config = CanvasConfig::default();
    config.animation.duration_ms = 120;
    config.long_press_ms = 800;
    let json = config.to_json_string().unwrap();
    assert_eq!(CanvasConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = CanvasConfig::from_json_str(r#"{ "event_capacity": 0 }"#).unwrap_err();
    assert!(err.to_string().contains("event_capacity"));

    let err = CanvasConfig::from_json_str("{ not json").unwrap_err();
    assert!(err.to_string().contains("canvas configuration"));
}
