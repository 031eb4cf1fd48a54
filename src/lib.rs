//! gpui_chart_canvas: interactive draw-element tracking and animation for GPUI charts

pub mod animation;
pub mod canvas;
pub mod chart_view;
pub mod config;
pub mod draw_element;
pub mod draw_scope;
pub mod interaction;
pub mod slot_cache;
pub mod utils;
pub mod window_canvas;

pub use animation::{Animatable, AnimatedValue, AnimationScope, Easing, Interpolate, LengthPair};
pub use canvas::{Canvas, DrawCommand, Paint, PaintStyle, RecordingCanvas};
pub use chart_view::{InteractiveChartView, InteractivePlot};
pub use config::{AnimationConfig, CanvasConfig};
pub use draw_element::{DataRef, DrawElement, ElementHandle, ElementKind, Shape};
pub use draw_scope::{ActivatedElement, CanvasState, DrawPhase, FrameDrawScope};
pub use interaction::{InteractionEvent, InteractionSender, InteractionState};
pub use slot_cache::SlotCache;
