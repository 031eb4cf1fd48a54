//! Interpolated values driven by a per-chart cooperative scheduler.

pub mod easing;
pub mod interpolate;
pub mod scheduler;
pub mod value;

pub use easing::Easing;
pub use interpolate::{Interpolate, LengthPair, ValueKind};
pub use scheduler::{AnimationScope, TaskHandle, TaskStatus};
pub use value::{Animatable, AnimatedValue, AnimationSpec};
