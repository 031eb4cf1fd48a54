use crate::config::CanvasConfig;
use crate::draw_scope::{CanvasState, FrameDrawScope};
use crate::interaction::{InteractionEvent, InteractionSender};
use crate::window_canvas::WindowCanvas;
use gpui::prelude::*;
use gpui::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Quiet time after the last wheel event before a scroll counts as stopped.
const SCROLL_SETTLE: Duration = Duration::from_millis(150);

/// A chart routine drawn through the two-pass frame scope.
///
/// `draw` runs twice per frame and must issue the same primitives in the same order both times.
pub trait InteractivePlot {
    fn draw(&self, scope: &mut FrameDrawScope<'_>, bounds: Bounds<Pixels>);
}

impl<F> InteractivePlot for F
where
    F: Fn(&mut FrameDrawScope<'_>, Bounds<Pixels>),
{
    fn draw(&self, scope: &mut FrameDrawScope<'_>, bounds: Bounds<Pixels>) {
        self(scope, bounds)
    }
}

/// GPUI view hosting interactive plots on a single canvas.
///
/// Input handlers only enqueue [`InteractionEvent`]s; the paint callback drains them, advances
/// animations and runs the two-pass frame.
pub struct InteractiveChartView {
    state: Rc<RefCell<CanvasState>>,
    plots: Rc<RefCell<Vec<Box<dyn InteractivePlot>>>>,
    sender: InteractionSender,
    long_press: Duration,

    bounds: Rc<RefCell<Bounds<Pixels>>>,
    hovering: bool,
    last_position: Point<Pixels>,
    press_started: Option<Instant>,
    last_scroll: Rc<Cell<Option<Instant>>>,

    focus_handle: FocusHandle,
}

impl Focusable for InteractiveChartView {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl InteractiveChartView {
    pub fn new(config: CanvasConfig, cx: &mut Context<Self>) -> Self {
        let long_press = config.long_press();
        let state = CanvasState::new(config);
        let sender = state.sender();
        Self {
            state: Rc::new(RefCell::new(state)),
            plots: Rc::new(RefCell::new(Vec::new())),
            sender,
            long_press,
            bounds: Rc::new(RefCell::new(Bounds::default())),
            hovering: false,
            last_position: Point::default(),
            press_started: None,
            last_scroll: Rc::new(Cell::new(None)),
            focus_handle: cx.focus_handle(),
        }
    }

    pub fn add_plot(&mut self, plot: impl InteractivePlot + 'static, cx: &mut Context<Self>) {
        self.plots.borrow_mut().push(Box::new(plot));
        cx.notify();
    }

    pub fn clear_plots(&mut self, cx: &mut Context<Self>) {
        self.plots.borrow_mut().clear();
        cx.notify();
    }

    /// Shared canvas state, e.g. for tooltip overlays reading the activated element.
    pub fn state(&self) -> Rc<RefCell<CanvasState>> {
        self.state.clone()
    }

    pub fn bounds(&self) -> Bounds<Pixels> {
        *self.bounds.borrow()
    }

    pub fn press_at(&mut self, position: Point<Pixels>, now: Instant) {
        self.press_started = Some(now);
        self.sender.try_emit(InteractionEvent::Press(position));
    }

    /// Ends a press, emitting the gesture it completed.
    pub fn release_at(&mut self, position: Point<Pixels>, click_count: usize, now: Instant) {
        let Some(started) = self.press_started.take() else {
            return;
        };
        self.sender.try_emit(InteractionEvent::PressRelease);

        let gesture = if click_count >= 2 {
            InteractionEvent::DoubleTap(position)
        } else if now.saturating_duration_since(started) >= self.long_press {
            InteractionEvent::LongPress(position)
        } else {
            InteractionEvent::Tap(position)
        };
        self.sender.try_emit(gesture);
    }

    pub fn hover_at(&mut self, position: Point<Pixels>) {
        let inside = self.bounds.borrow().contains(&position);
        match (inside, self.hovering) {
            (true, false) => {
                self.sender.try_emit(InteractionEvent::HoverEnter(position));
            }
            (true, true) => {
                self.sender.try_emit(InteractionEvent::HoverMove(position));
            }
            (false, true) => {
                self.last_position = position;
                self.leave();
                return;
            }
            (false, false) => return,
        }
        self.last_position = position;
        self.hovering = inside;
    }

    /// The pointer left the chart. Ends hover and cancels a press in progress.
    pub fn leave(&mut self) {
        self.hovering = false;
        self.sender
            .try_emit(InteractionEvent::HoverExit(self.last_position));
        self.release_outside();
    }

    /// A press that started on the chart was released somewhere else.
    pub fn release_outside(&mut self) {
        if self.press_started.take().is_some() {
            self.sender.try_emit(InteractionEvent::PressCancel);
        }
    }

    pub fn scroll(&mut self, now: Instant) {
        if self.last_scroll.replace(Some(now)).is_none() {
            self.sender.try_emit(InteractionEvent::ScrollStarted);
        }
    }

    fn handle_mouse_down(&mut self, event: &MouseDownEvent, window: &mut Window, cx: &mut Context<Self>) {
        window.focus(&self.focus_handle);
        self.press_at(event.position, Instant::now());
        cx.notify();
    }

    fn handle_mouse_up(&mut self, event: &MouseUpEvent, _window: &mut Window, cx: &mut Context<Self>) {
        self.release_at(event.position, event.click_count, Instant::now());
        cx.notify();
    }

    fn handle_mouse_up_out(&mut self, _event: &MouseUpEvent, _window: &mut Window, cx: &mut Context<Self>) {
        self.release_outside();
        cx.notify();
    }

    fn handle_hover(&mut self, hovered: &bool, _window: &mut Window, cx: &mut Context<Self>) {
        if !*hovered {
            self.leave();
            cx.notify();
        }
    }

    fn handle_mouse_move(&mut self, event: &MouseMoveEvent, _window: &mut Window, cx: &mut Context<Self>) {
        if self.bounds.borrow().is_empty() {
            return;
        }
        self.hover_at(event.position);
        cx.notify();
    }

    fn handle_scroll_wheel(&mut self, _event: &ScrollWheelEvent, _window: &mut Window, cx: &mut Context<Self>) {
        self.scroll(Instant::now());
        cx.notify();
    }
}

impl Render for InteractiveChartView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let state = self.state.clone();
        let plots = self.plots.clone();
        let bounds_rc = self.bounds.clone();
        let last_scroll = self.last_scroll.clone();

        div()
            .id(("interactive-chart", cx.entity_id()))
            .track_focus(&self.focus_handle)
            .size_full()
            .on_mouse_down(MouseButton::Left, cx.listener(Self::handle_mouse_down))
            .on_mouse_up(MouseButton::Left, cx.listener(Self::handle_mouse_up))
            .on_mouse_up_out(MouseButton::Left, cx.listener(Self::handle_mouse_up_out))
            .on_hover(cx.listener(Self::handle_hover))
            .on_mouse_move(cx.listener(Self::handle_mouse_move))
            .on_scroll_wheel(cx.listener(Self::handle_scroll_wheel))
            .child(
                canvas(|_, _, _| {}, move |bounds, (), window, cx| {
                    *bounds_rc.borrow_mut() = bounds;
                    let now = Instant::now();
                    let mut state = state.borrow_mut();

                    let mut scrolling = false;
                    if let Some(at) = last_scroll.get() {
                        if now.saturating_duration_since(at) >= SCROLL_SETTLE {
                            last_scroll.set(None);
                            state.emit(InteractionEvent::ScrollStopped);
                        }
                        scrolling = true;
                    }

                    state.tick(now);
                    let plots = plots.borrow();
                    let mut canvas = WindowCanvas::new(window, cx);
                    state.draw_frame(&mut canvas, |scope| {
                        for plot in plots.iter() {
                            plot.draw(scope, bounds);
                        }
                    });

                    if scrolling || state.has_pending_animations() {
                        window.request_animation_frame();
                    }
                })
                .size_full(),
            )
    }
}
