//! Pointer interaction state consumed by the draw scope.
//!
//! Input handlers emit [`InteractionEvent`]s through an [`InteractionSender`] without blocking;
//! the chart drains them in order at the start of each frame. A full queue parks later events
//! instead of dropping them.

use crate::draw_element::DrawElement;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use gpui::{Pixels, Point};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionEvent {
    HoverEnter(Point<Pixels>),
    HoverMove(Point<Pixels>),
    HoverExit(Point<Pixels>),
    Press(Point<Pixels>),
    PressRelease,
    PressCancel,
    Tap(Point<Pixels>),
    DoubleTap(Point<Pixels>),
    LongPress(Point<Pixels>),
    ExitTap,
    ExitDoubleTap,
    ExitLongPress,
    ScrollStarted,
    ScrollStopped,
}

/// Whether a pointer gesture is active and where it last was.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerTrack {
    pub active: bool,
    pub location: Point<Pixels>,
}

impl PointerTrack {
    fn set(&mut self, location: Point<Pixels>) {
        self.active = true;
        self.location = location;
    }

    /// Location if the gesture is active.
    pub fn active_at(&self) -> Option<Point<Pixels>> {
        self.active.then_some(self.location)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub hover: PointerTrack,
    pub press: PointerTrack,
    /// One-shot: cleared by [`settle_one_shots`](Self::settle_one_shots) after the frame that saw it.
    pub tap: PointerTrack,
    pub double_tap: PointerTrack,
    pub long_press: PointerTrack,
    pub scroll_in_progress: bool,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: InteractionEvent) {
        match event {
            InteractionEvent::HoverEnter(location) | InteractionEvent::HoverMove(location) => {
                self.hover.set(location)
            }
            InteractionEvent::HoverExit(location) => {
                self.hover.active = false;
                self.hover.location = location;
            }
            InteractionEvent::Press(location) => self.press.set(location),
            InteractionEvent::PressRelease | InteractionEvent::PressCancel => {
                self.press.active = false
            }
            InteractionEvent::Tap(location) => self.tap.set(location),
            InteractionEvent::DoubleTap(location) => self.double_tap.set(location),
            InteractionEvent::LongPress(location) => self.long_press.set(location),
            InteractionEvent::ExitTap => self.tap.active = false,
            InteractionEvent::ExitDoubleTap => self.double_tap.active = false,
            InteractionEvent::ExitLongPress => self.long_press.active = false,
            InteractionEvent::ScrollStarted => self.scroll_in_progress = true,
            InteractionEvent::ScrollStopped => self.scroll_in_progress = false,
        }
    }

    pub fn is_hovered(&self, element: &DrawElement) -> bool {
        self.hover.active && element.contains(self.hover.location)
    }

    pub fn is_pressed(&self, element: &DrawElement) -> bool {
        self.press.active && element.contains(self.press.location)
    }

    pub fn is_hovered_or_pressed(&self, element: &DrawElement) -> bool {
        self.is_hovered(element) || self.is_pressed(element)
    }

    pub fn is_tap(&self, element: &DrawElement) -> bool {
        self.tap.active && element.contains(self.tap.location)
    }

    pub fn is_double_tap(&self, element: &DrawElement) -> bool {
        self.double_tap.active && element.contains(self.double_tap.location)
    }

    pub fn is_long_press(&self, element: &DrawElement) -> bool {
        self.long_press.active && element.contains(self.long_press.location)
    }

    pub fn has_pointer(&self) -> bool {
        self.hover.active || self.press.active
    }

    pub fn has_gesture(&self) -> bool {
        self.tap.active || self.double_tap.active || self.long_press.active
    }

    /// Clears tap, double-tap and long-press once a frame has observed them.
    pub fn settle_one_shots(&mut self) {
        self.tap.active = false;
        self.double_tap.active = false;
        self.long_press.active = false;
    }
}

pub fn interaction_channel(capacity: usize) -> (InteractionSender, InteractionReceiver) {
    let (tx, rx) = bounded(capacity.max(1));
    let parked = Arc::new(Mutex::new(Parked::default()));
    (
        InteractionSender {
            tx,
            parked: parked.clone(),
        },
        InteractionReceiver { rx, parked },
    )
}

/// Events that arrived while the queue was full, in arrival order.
#[derive(Debug, Default)]
struct Parked {
    events: Vec<InteractionEvent>,
    closed: bool,
}

/// Producer side of the interaction stream. Never blocks.
#[derive(Clone, Debug)]
pub struct InteractionSender {
    tx: Sender<InteractionEvent>,
    parked: Arc<Mutex<Parked>>,
}

impl InteractionSender {
    /// Delivers `event` without blocking. Returns false only once the chart is gone.
    ///
    /// When the queue is full the event is parked behind it, and so is everything after it
    /// until the chart drains. Consecutive parked `HoverMove`s collapse into the latest one;
    /// no other event is lost, so releases and exits always reach the chart.
    pub fn try_emit(&self, event: InteractionEvent) -> bool {
        let mut parked = self.parked.lock();
        if parked.closed {
            debug!(?event, "interaction event dropped, chart gone");
            return false;
        }
        if parked.events.is_empty() {
            match self.tx.try_send(event) {
                Ok(()) => return true,
                Err(TrySendError::Disconnected(event)) => {
                    debug!(?event, "interaction event dropped, chart gone");
                    return false;
                }
                Err(TrySendError::Full(_)) => {}
            }
        }

        let supersedes_last = matches!(
            (parked.events.last(), &event),
            (Some(InteractionEvent::HoverMove(_)), InteractionEvent::HoverMove(_))
        );
        if supersedes_last {
            if let Some(last) = parked.events.last_mut() {
                *last = event;
            }
        } else {
            parked.events.push(event);
        }
        debug!(?event, parked = parked.events.len(), "interaction queue full, event parked");
        true
    }
}

/// Consumer side, owned by exactly one chart.
#[derive(Debug)]
pub struct InteractionReceiver {
    rx: Receiver<InteractionEvent>,
    parked: Arc<Mutex<Parked>>,
}

impl InteractionReceiver {
    /// Applies every queued event to `state` in arrival order, parked ones last. Returns how
    /// many were applied.
    pub fn drain_into(&self, state: &mut InteractionState) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            state.apply(event);
            applied += 1;
        }
        let parked = std::mem::take(&mut self.parked.lock().events);
        for event in parked {
            state.apply(event);
            applied += 1;
        }
        applied
    }
}

impl Drop for InteractionReceiver {
    fn drop(&mut self) {
        let mut parked = self.parked.lock();
        parked.closed = true;
        parked.events.clear();
    }
}
