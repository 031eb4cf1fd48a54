use super::easing::Easing;
use super::interpolate::{Interpolate, LengthPair, ValueKind};
use super::scheduler::{AnimationScope, TaskHandle, TaskStatus};
use crate::config::AnimationConfig;
use gpui::{Hsla, Pixels, Point, Size};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        AnimationSpec::from(&AnimationConfig::default())
    }
}

impl From<&AnimationConfig> for AnimationSpec {
    fn from(config: &AnimationConfig) -> Self {
        Self {
            duration: config.duration(),
            easing: config.easing,
        }
    }
}

struct AnimState<V> {
    current: V,
    target: V,
    /// Last nominal value handed to `reset`; returned while a reset snap is in flight.
    initial: V,
    is_running: bool,
    is_resetting: bool,
    ease: Option<TaskHandle>,
    snap: Option<TaskHandle>,
}

/// A value easing toward a target on the chart's [`AnimationScope`].
///
/// Handles are cheap clones of shared state; the draw thread reads the latest interpolated
/// value without waiting on the scheduler.
pub struct Animatable<V: Interpolate> {
    state: Arc<Mutex<AnimState<V>>>,
    scope: AnimationScope,
    spec: AnimationSpec,
}

impl<V: Interpolate> Clone for Animatable<V> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            scope: self.scope.clone(),
            spec: self.spec,
        }
    }
}

impl<V: Interpolate> fmt::Debug for Animatable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Animatable")
            .field("current", &state.current)
            .field("target", &state.target)
            .field("is_running", &state.is_running)
            .field("is_resetting", &state.is_resetting)
            .finish()
    }
}

impl<V: Interpolate> Animatable<V> {
    pub fn new(initial: V, scope: AnimationScope, spec: AnimationSpec) -> Self {
        Self {
            state: Arc::new(Mutex::new(AnimState {
                current: initial,
                target: initial,
                initial,
                is_running: false,
                is_resetting: false,
                ease: None,
                snap: None,
            })),
            scope,
            spec,
        }
    }

    /// Value to draw this frame. While a reset is pending this is the new initial value.
    pub fn value(&self) -> V {
        let state = self.state.lock();
        if state.is_resetting {
            state.initial
        } else {
            state.current
        }
    }

    pub fn target(&self) -> V {
        self.state.lock().target
    }

    pub fn initial(&self) -> V {
        self.state.lock().initial
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().is_running
    }

    pub fn is_resetting(&self) -> bool {
        self.state.lock().is_resetting
    }

    pub fn spec(&self) -> AnimationSpec {
        self.spec
    }

    /// Starts easing toward `target` from wherever the value currently is.
    /// Re-targeting to the current target is a no-op; a different target replaces the
    /// in-flight ease.
    pub fn set_target(&self, target: V) {
        let mut state = self.state.lock();
        if state.target == target {
            return;
        }
        if let Some(ease) = state.ease.take() {
            ease.cancel();
        }
        state.target = target;
        state.is_running = true;

        let weak = Arc::downgrade(&self.state);
        let spec = self.spec;
        let mut origin: Option<(Instant, V)> = None;
        let handle = self.scope.spawn(move |now| {
            let Some(shared) = Weak::upgrade(&weak) else {
                return TaskStatus::Done;
            };
            let mut state = shared.lock();
            let (started, from) = *origin.get_or_insert((now, state.current));
            let fraction = if spec.duration.is_zero() {
                1.0
            } else {
                now.saturating_duration_since(started).as_secs_f32() / spec.duration.as_secs_f32()
            };

            if fraction >= 1.0 {
                state.current = target;
                state.is_running = false;
                state.ease = None;
                TaskStatus::Done
            } else {
                state.current = V::lerp(from, target, spec.easing.transform(fraction));
                TaskStatus::Pending
            }
        });
        state.ease = Some(handle);
    }

    /// Sets the value immediately, dropping any in-flight ease or pending reset.
    pub fn snap_to(&self, value: V) {
        let mut state = self.state.lock();
        if let Some(ease) = state.ease.take() {
            ease.cancel();
        }
        if let Some(snap) = state.snap.take() {
            snap.cancel();
        }
        state.current = value;
        state.target = value;
        state.is_running = false;
        state.is_resetting = false;
    }

    /// Moves the resting value to `initial` when the caller's nominal value changed.
    ///
    /// The snap itself runs on the scheduler; until then reads return `initial` instead of
    /// whatever the ease last produced.
    pub fn reset(&self, initial: V) {
        let mut state = self.state.lock();
        if state.initial == initial {
            return;
        }
        if let Some(ease) = state.ease.take() {
            ease.cancel();
        }
        if let Some(snap) = state.snap.take() {
            snap.cancel();
        }
        state.initial = initial;
        state.target = initial;
        state.is_running = false;
        state.is_resetting = true;

        let weak = Arc::downgrade(&self.state);
        let handle = self.scope.spawn(move |_| {
            if let Some(shared) = Weak::upgrade(&weak) {
                let mut state = shared.lock();
                state.current = state.initial;
                state.is_resetting = false;
                state.snap = None;
            }
            TaskStatus::Done
        });
        state.snap = Some(handle);
    }

    /// Cancels outstanding work for this value.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        if let Some(ease) = state.ease.take() {
            ease.cancel();
        }
        if let Some(snap) = state.snap.take() {
            snap.cancel();
        }
        state.is_running = false;
    }

    /// Handle of the in-flight ease, if any.
    pub fn ease_task(&self) -> Option<TaskHandle> {
        self.state.lock().ease.clone()
    }
}

/// One pooled animation slot. The variant is fixed by the [`ValueKind`] it was created for.
#[derive(Clone, Debug)]
pub enum AnimatedValue {
    Int(Animatable<i32>),
    Float(Animatable<f32>),
    Color(Animatable<Hsla>),
    Offset(Animatable<Point<Pixels>>),
    Size(Animatable<Size<Pixels>>),
    Length(Animatable<Pixels>),
    LengthPair(Animatable<LengthPair>),
}

impl AnimatedValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            AnimatedValue::Int(_) => ValueKind::Int,
            AnimatedValue::Float(_) => ValueKind::Float,
            AnimatedValue::Color(_) => ValueKind::Color,
            AnimatedValue::Offset(_) => ValueKind::Offset,
            AnimatedValue::Size(_) => ValueKind::Size,
            AnimatedValue::Length(_) => ValueKind::Length,
            AnimatedValue::LengthPair(_) => ValueKind::LengthPair,
        }
    }

    pub fn is_running(&self) -> bool {
        match self {
            AnimatedValue::Int(v) => v.is_running(),
            AnimatedValue::Float(v) => v.is_running(),
            AnimatedValue::Color(v) => v.is_running(),
            AnimatedValue::Offset(v) => v.is_running(),
            AnimatedValue::Size(v) => v.is_running(),
            AnimatedValue::Length(v) => v.is_running(),
            AnimatedValue::LengthPair(v) => v.is_running(),
        }
    }

    pub fn cancel(&self) {
        match self {
            AnimatedValue::Int(v) => v.cancel(),
            AnimatedValue::Float(v) => v.cancel(),
            AnimatedValue::Color(v) => v.cancel(),
            AnimatedValue::Offset(v) => v.cancel(),
            AnimatedValue::Size(v) => v.cancel(),
            AnimatedValue::Length(v) => v.cancel(),
            AnimatedValue::LengthPair(v) => v.cancel(),
        }
    }

    /// Typed view of the slot.
    ///
    /// # Panics
    /// When the slot holds another value type. The cache is keyed by [`ValueKind`], so this
    /// only happens if the cache itself is misused.
    pub fn expect_typed<V: Interpolate>(&self) -> &Animatable<V> {
        match V::from_slot(self) {
            Some(value) => value,
            None => panic!(
                "animation slot of kind {:?} requested as {:?}",
                self.kind(),
                V::KIND
            ),
        }
    }
}
