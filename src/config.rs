use crate::animation::Easing;
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Length of a single ease toward a new target.
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 300,
            easing: Easing::FastOutSlowIn,
        }
    }
}

impl AnimationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Per-chart settings for the interactive canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub animation: AnimationConfig,
    /// Interaction events buffered between two frames; extra events are dropped.
    pub event_capacity: usize,
    pub long_press_ms: u64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            animation: AnimationConfig::default(),
            event_capacity: 64,
            long_press_ms: 500,
        }
    }
}

impl CanvasConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).wrap_err("failed to parse canvas configuration")?;
        if config.event_capacity == 0 {
            eyre::bail!("event_capacity must be at least 1");
        }
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).wrap_err("failed to serialize canvas configuration")
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }
}
