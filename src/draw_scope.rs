//! Two-pass frame protocol tying draw calls to stable elements and animations.
//!
//! Every frame the caller's draw routine runs twice:
//!
//! 1. **Pre-layout**: each primitive call takes the next pooled [`DrawElement`] of its kind,
//!    records geometry, and marks it activated if an interaction-dependent value was evaluated
//!    since the previous primitive. Nothing is drawn.
//! 2. Between the passes the interaction state is resolved against the recorded elements:
//!    the first activated element (declaration order) containing a pointer location is marked.
//! 3. **Layout**: the same calls pop the recorded elements in order, resolve conditional and
//!    animated values against them, and issue the real draw calls.
//!
//! Identity is positional. Both passes must issue the same primitive calls in the same order;
//! a routine that branches differently between them silently swaps hover and animation
//! targets between elements.

use crate::animation::{
    Animatable, AnimatedValue, AnimationScope, AnimationSpec, Interpolate, LengthPair, ValueKind,
};
use crate::canvas::{Canvas, Paint};
use crate::config::CanvasConfig;
use crate::draw_element::{DataRef, DrawElement, ElementHandle, ElementKind, Shape};
use crate::interaction::{
    InteractionEvent, InteractionReceiver, InteractionSender, InteractionState, interaction_channel,
};
use crate::slot_cache::SlotCache;
use gpui::{Bounds, Hsla, Pixels, Point, Size};
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, trace, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawPhase {
    #[default]
    Idle,
    PreLayout,
    Layout,
}

/// The element the pointer is interacting with this frame, frozen so that slot reuse on the
/// next frame does not alter it. Consumed by tooltip and marker overlays.
#[derive(Clone, Debug)]
pub struct ActivatedElement {
    pub element: DrawElement,
    pub item: Option<DataRef>,
    /// Every item drawn this frame in the same group as `item`, in draw order.
    pub siblings: Vec<DataRef>,
}

/// Per-chart owner of the element and animation caches, the interaction state and the
/// animation scheduler. Not shared between charts.
pub struct CanvasState {
    config: CanvasConfig,
    spec: AnimationSpec,
    element_cache: SlotCache<ElementKind, ElementHandle>,
    value_cache: SlotCache<ValueKind, AnimatedValue>,
    interaction: InteractionState,
    sender: InteractionSender,
    receiver: InteractionReceiver,
    animations: AnimationScope,
    elements: Vec<ElementHandle>,
    activated: Option<ActivatedElement>,
    phase: DrawPhase,
    frame: u64,
    torn_down: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl CanvasState {
    pub fn new(config: CanvasConfig) -> Self {
        let (sender, receiver) = interaction_channel(config.event_capacity);
        Self {
            spec: AnimationSpec::from(&config.animation),
            config,
            element_cache: SlotCache::new(),
            value_cache: SlotCache::new(),
            interaction: InteractionState::new(),
            sender,
            receiver,
            animations: AnimationScope::new(),
            elements: Vec::new(),
            activated: None,
            phase: DrawPhase::Idle,
            frame: 0,
            torn_down: false,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Producer handle for input handlers.
    pub fn sender(&self) -> InteractionSender {
        self.sender.clone()
    }

    /// Shorthand for `sender().try_emit(event)`.
    pub fn emit(&self, event: InteractionEvent) -> bool {
        self.sender.try_emit(event)
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn animations(&self) -> &AnimationScope {
        &self.animations
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Top-level elements recorded by the last pre-layout pass.
    pub fn elements(&self) -> &[ElementHandle] {
        &self.elements
    }

    /// Animation slots allocated for `kind`, in slot order.
    pub fn animated_values(&self, kind: ValueKind) -> Vec<AnimatedValue> {
        self.value_cache.pool(kind).to_vec()
    }

    pub fn activated(&self) -> Option<&ActivatedElement> {
        self.activated.as_ref()
    }

    /// Advances in-flight animations to `now`. Returns whether more frames are needed.
    pub fn tick(&self, now: Instant) -> bool {
        self.animations.run_pending(now) > 0
    }

    pub fn has_pending_animations(&self) -> bool {
        self.animations.has_pending()
    }

    /// Runs `routine` through the pre-layout and layout passes against `canvas`.
    pub fn draw_frame<F>(&mut self, canvas: &mut dyn Canvas, mut routine: F)
    where
        F: FnMut(&mut FrameDrawScope<'_>),
    {
        if self.torn_down {
            warn!("draw_frame called on a torn down canvas; ignored");
            return;
        }

        let drained = self.receiver.drain_into(&mut self.interaction);
        self.frame += 1;
        trace!(frame = self.frame, drained, "canvas frame start");

        self.element_cache.reset_cursors();
        self.value_cache.reset_cursors();
        self.elements.clear();

        self.phase = DrawPhase::PreLayout;
        {
            let mut scope = FrameDrawScope {
                phase: DrawPhase::PreLayout,
                canvas: &mut *canvas,
                element_cache: &mut self.element_cache,
                value_cache: &mut self.value_cache,
                interaction: &self.interaction,
                animations: &self.animations,
                spec: self.spec,
                elements: &mut self.elements,
                open_groups: Vec::new(),
                pending_activations: 0,
                pending_focus: None,
                current_item: None,
                queue: VecDeque::new(),
            };
            routine(&mut scope);
        }

        self.update_current_activated_draw_element();

        self.phase = DrawPhase::Layout;
        let mut queue = VecDeque::new();
        flatten_into(&self.elements, &mut queue);
        let recorded = queue.len();
        let remaining = {
            let mut scope = FrameDrawScope {
                phase: DrawPhase::Layout,
                canvas: &mut *canvas,
                element_cache: &mut self.element_cache,
                value_cache: &mut self.value_cache,
                interaction: &self.interaction,
                animations: &self.animations,
                spec: self.spec,
                elements: &mut self.elements,
                open_groups: Vec::new(),
                pending_activations: 0,
                pending_focus: None,
                current_item: None,
                queue,
            };
            routine(&mut scope);
            scope.queue.len()
        };
        if remaining > 0 {
            debug!(recorded, remaining, "layout pass issued fewer primitives than pre-layout");
        }

        self.phase = DrawPhase::Idle;
        self.interaction.settle_one_shots();
    }

    /// Resolves the pointer state against the elements recorded by pre-layout.
    ///
    /// Only activated elements are candidates and the first match in declaration order wins,
    /// so at most one element is hovered, one pressed, and so on per frame.
    fn update_current_activated_draw_element(&mut self) {
        let state = &self.interaction;
        if state.scroll_in_progress || (!state.has_pointer() && !state.has_gesture()) {
            self.activated = None;
            return;
        }

        let targets: [(Option<Point<Pixels>>, fn(&mut DrawElement)); 5] = [
            (state.press.active_at(), |e| e.is_pressed = true),
            (state.hover.active_at(), |e| e.is_hovered = true),
            (state.tap.active_at(), |e| e.is_tapped = true),
            (state.double_tap.active_at(), |e| e.is_double_tapped = true),
            (state.long_press.active_at(), |e| e.is_long_pressed = true),
        ];

        let mut interacted: Option<ElementHandle> = None;
        for (location, mark) in targets {
            let Some(location) = location else {
                continue;
            };
            let Some(hit) = self
                .elements
                .iter()
                .find(|h| {
                    let element = h.borrow();
                    element.is_activated && element.contains(location)
                })
                .cloned()
            else {
                continue;
            };
            mark_recursive(&hit, mark);
            interacted.get_or_insert(hit);
        }

        let Some(hit) = interacted else {
            self.activated = None;
            return;
        };

        let hit = hit.borrow();
        let item = hit
            .item
            .or_else(|| hit.children().iter().find_map(|c| c.borrow().item));
        let siblings = match item {
            Some(item) => {
                let mut siblings = Vec::new();
                collect_items(&self.elements, item.group, &mut siblings);
                siblings
            }
            None => Vec::new(),
        };

        let reusable = self
            .activated
            .as_mut()
            .filter(|activated| activated.element.kind() == hit.kind());
        if let Some(activated) = reusable {
            activated.element.copy_from(&hit);
            activated.item = item;
            activated.siblings = siblings;
        } else {
            self.activated = Some(ActivatedElement {
                element: hit.detached(),
                item,
                siblings,
            });
        }
        trace!(kind = ?hit.kind(), ?item, "activated element updated");
    }

    /// Cancels all animation work and releases pooled state. Later frames are ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        for value in self.value_cache.iter() {
            value.cancel();
        }
        self.animations.close();
        self.value_cache.clear();
        self.element_cache.clear();
        self.elements.clear();
        self.activated = None;
        self.torn_down = true;
        debug!(frames = self.frame, "canvas torn down");
    }
}

impl Drop for CanvasState {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn flatten_into(elements: &[ElementHandle], queue: &mut VecDeque<ElementHandle>) {
    for handle in elements {
        let element = handle.borrow();
        if element.kind() == ElementKind::Group {
            flatten_into(element.children(), queue);
        } else {
            queue.push_back(handle.clone());
        }
    }
}

fn mark_recursive(handle: &ElementHandle, mark: fn(&mut DrawElement)) {
    let mut element = handle.borrow_mut();
    mark(&mut element);
    for child in element.children() {
        mark_recursive(child, mark);
    }
}

fn collect_items(elements: &[ElementHandle], group: usize, out: &mut Vec<DataRef>) {
    for handle in elements {
        let element = handle.borrow();
        if let Some(item) = element.item {
            if item.group == group && !out.contains(&item) {
                out.push(item);
            }
        }
        collect_items(element.children(), group, out);
    }
}

/// Drawing API handed to chart routines. Only obtainable inside [`CanvasState::draw_frame`].
pub struct FrameDrawScope<'a> {
    phase: DrawPhase,
    canvas: &'a mut dyn Canvas,
    element_cache: &'a mut SlotCache<ElementKind, ElementHandle>,
    value_cache: &'a mut SlotCache<ValueKind, AnimatedValue>,
    interaction: &'a InteractionState,
    animations: &'a AnimationScope,
    spec: AnimationSpec,
    elements: &'a mut Vec<ElementHandle>,
    open_groups: Vec<ElementHandle>,
    pending_activations: usize,
    pending_focus: Option<Point<Pixels>>,
    current_item: Option<DataRef>,
    queue: VecDeque<ElementHandle>,
}

impl FrameDrawScope<'_> {
    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn is_pre_layout(&self) -> bool {
        self.phase == DrawPhase::PreLayout
    }

    pub fn is_scrolling(&self) -> bool {
        self.interaction.scroll_in_progress
    }

    /// During layout, the element the next primitive call will draw.
    pub fn current_element(&self) -> Option<ElementHandle> {
        match self.phase {
            DrawPhase::Layout => self.queue.front().cloned(),
            _ => None,
        }
    }

    /// Tags the following primitives with the data item they render.
    pub fn bind_item(&mut self, item: DataRef) {
        self.current_item = Some(item);
    }

    pub fn clear_item(&mut self) {
        self.current_item = None;
    }

    /// Overrides the focus point of the next primitive.
    pub fn focus_next(&mut self, point: Point<Pixels>) {
        if self.is_pre_layout() {
            self.pending_focus = Some(point);
        }
    }

    fn current_is(&mut self, predicate: impl FnOnce(&DrawElement) -> bool) -> bool {
        match self.phase {
            DrawPhase::PreLayout => {
                self.pending_activations += 1;
                false
            }
            DrawPhase::Layout => self
                .queue
                .front()
                .is_some_and(|handle| predicate(&handle.borrow())),
            DrawPhase::Idle => false,
        }
    }

    pub fn is_hovered(&mut self) -> bool {
        self.current_is(|e| e.is_hovered)
    }

    pub fn is_pressed(&mut self) -> bool {
        self.current_is(|e| e.is_pressed)
    }

    pub fn is_hovered_or_pressed(&mut self) -> bool {
        self.current_is(DrawElement::is_hovered_or_pressed)
    }

    pub fn is_tapped(&mut self) -> bool {
        self.current_is(|e| e.is_tapped)
    }

    pub fn is_double_tapped(&mut self) -> bool {
        self.current_is(|e| e.is_double_tapped)
    }

    pub fn is_long_pressed(&mut self) -> bool {
        self.current_is(|e| e.is_long_pressed)
    }

    /// `target` when `condition` holds, `value` otherwise. No animation.
    pub fn value_if<V>(&mut self, value: V, target: V, condition: bool) -> V {
        if self.is_pre_layout() {
            self.pending_activations += 1;
            return value;
        }
        if condition { target } else { value }
    }

    pub fn value_if_hovered<V>(&mut self, value: V, target: V) -> V {
        let condition = self.is_hovered();
        self.value_if(value, target, condition)
    }

    pub fn value_if_pressed<V>(&mut self, value: V, target: V) -> V {
        let condition = self.is_pressed();
        self.value_if(value, target, condition)
    }

    pub fn value_if_hovered_or_pressed<V>(&mut self, value: V, target: V) -> V {
        let condition = self.is_hovered_or_pressed();
        self.value_if(value, target, condition)
    }

    /// Eases toward `target` while `condition` holds and back to `value` otherwise.
    ///
    /// Animation state lives in the value cache at this call's ordinal among calls of the same
    /// value type. A changed `value` snaps the resting state instead of animating.
    pub fn animate_to<V: Interpolate>(&mut self, value: V, target: V, condition: bool) -> V {
        if self.is_pre_layout() {
            self.pending_activations += 1;
            return value;
        }
        let scope = self.animations;
        let spec = self.spec;
        let slot = self.value_cache.next(
            V::KIND,
            |_| V::into_slot(Animatable::new(value, scope.clone(), spec)),
            |_| {},
        );
        let animatable = slot.expect_typed::<V>();
        animatable.reset(value);
        animatable.set_target(if condition { target } else { value });
        animatable.value()
    }

    pub fn animate_if_hovered<V: Interpolate>(&mut self, value: V, target: V) -> V {
        let condition = self.is_hovered();
        self.animate_to(value, target, condition)
    }

    pub fn animate_if_pressed<V: Interpolate>(&mut self, value: V, target: V) -> V {
        let condition = self.is_pressed();
        self.animate_to(value, target, condition)
    }

    pub fn animate_if_hovered_or_pressed<V: Interpolate>(&mut self, value: V, target: V) -> V {
        let condition = self.is_hovered_or_pressed();
        self.animate_to(value, target, condition)
    }

    /// Groups the primitives drawn by `body` so that a pointer over any of them, or over the
    /// declared box, interacts with all of them.
    pub fn clickable_group(
        &mut self,
        top_left: Point<Pixels>,
        size: Size<Pixels>,
        body: impl FnOnce(&mut Self),
    ) {
        if !self.is_pre_layout() {
            body(self);
            return;
        }

        let handle = self.element_cache.next(
            ElementKind::Group,
            |kind| DrawElement::empty(kind).into_handle(),
            |h| h.borrow_mut().recycle(),
        );
        {
            let mut group = handle.borrow_mut();
            group.set_shape(Shape::Group {
                children: Vec::new(),
                top_left,
                size,
            });
            group.item = self.current_item;
            group.set_focus_point(self.pending_focus.take());
            group.is_activated = true;
        }
        self.attach(handle.clone());

        self.open_groups.push(handle);
        body(self);
        self.open_groups.pop();
    }

    fn attach(&mut self, handle: ElementHandle) {
        match self.open_groups.last() {
            Some(group) => {
                if let Shape::Group { children, .. } = group.borrow_mut().shape_mut() {
                    children.push(handle);
                }
            }
            None => self.elements.push(handle),
        }
    }

    fn record(&mut self, shape: Shape, color: Hsla) {
        let handle = self.element_cache.next(
            shape.kind(),
            |kind| DrawElement::empty(kind).into_handle(),
            |h| h.borrow_mut().recycle(),
        );
        {
            let mut element = handle.borrow_mut();
            element.set_shape(shape);
            element.color = color;
            element.item = self.current_item;
            element.set_focus_point(self.pending_focus.take());
            element.is_activated = self.pending_activations > 0;
        }
        self.pending_activations = 0;
        self.attach(handle);
    }

    /// Pre-layout records `shape`; layout consumes the matching element and runs `draw`.
    fn primitive(
        &mut self,
        kind: ElementKind,
        color: Hsla,
        shape: impl FnOnce() -> Shape,
        draw: impl FnOnce(&mut dyn Canvas),
    ) {
        match self.phase {
            DrawPhase::PreLayout => self.record(shape(), color),
            DrawPhase::Layout => {
                if let Some(element) = self.queue.pop_front() {
                    let recorded = element.borrow().kind();
                    if recorded != kind {
                        trace!(?recorded, ?kind, "primitive order diverged between passes");
                    }
                }
                draw(&mut *self.canvas);
            }
            DrawPhase::Idle => {}
        }
    }

    pub fn draw_rect(&mut self, top_left: Point<Pixels>, size: Size<Pixels>, paint: impl Into<Paint>) {
        let paint = paint.into();
        self.primitive(
            ElementKind::Rect,
            paint.color,
            || Shape::Rect { top_left, size },
            |canvas| canvas.draw_rect(Bounds::new(top_left, size), &paint),
        );
    }

    pub fn draw_round_rect(
        &mut self,
        top_left: Point<Pixels>,
        size: Size<Pixels>,
        corner_radius: LengthPair,
        paint: impl Into<Paint>,
    ) {
        let paint = paint.into();
        self.primitive(
            ElementKind::RoundRect,
            paint.color,
            || Shape::RoundRect {
                top_left,
                size,
                corner_radius,
            },
            |canvas| canvas.draw_round_rect(Bounds::new(top_left, size), corner_radius, &paint),
        );
    }

    pub fn draw_circle(&mut self, center: Point<Pixels>, radius: Pixels, paint: impl Into<Paint>) {
        let paint = paint.into();
        self.primitive(
            ElementKind::Circle,
            paint.color,
            || Shape::Circle { center, radius },
            |canvas| canvas.draw_circle(center, radius, &paint),
        );
    }

    pub fn draw_oval(&mut self, top_left: Point<Pixels>, size: Size<Pixels>, paint: impl Into<Paint>) {
        let paint = paint.into();
        self.primitive(
            ElementKind::Oval,
            paint.color,
            || Shape::Oval { top_left, size },
            |canvas| canvas.draw_oval(Bounds::new(top_left, size), &paint),
        );
    }

    /// Angles in degrees, clockwise from 3 o'clock. A stroke paint makes the hit area the
    /// stroked band; a fill makes it the whole sector.
    pub fn draw_arc(
        &mut self,
        top_left: Point<Pixels>,
        size: Size<Pixels>,
        start_angle: f32,
        sweep_angle: f32,
        paint: impl Into<Paint>,
    ) {
        let paint = paint.into();
        self.primitive(
            ElementKind::Arc,
            paint.color,
            || Shape::Arc {
                top_left,
                size,
                start_angle,
                sweep_angle,
                stroke_width: paint.stroke_width(),
            },
            |canvas| canvas.draw_arc(Bounds::new(top_left, size), start_angle, sweep_angle, &paint),
        );
    }

    pub fn draw_line(
        &mut self,
        start: Point<Pixels>,
        end: Point<Pixels>,
        stroke_width: Pixels,
        color: Hsla,
    ) {
        self.primitive(
            ElementKind::Line,
            color,
            || Shape::Line {
                start,
                end,
                stroke_width,
            },
            |canvas| canvas.draw_line(start, end, stroke_width, color),
        );
    }

    pub fn draw_points(&mut self, points: &[Point<Pixels>], stroke_width: Pixels, color: Hsla) {
        self.primitive(
            ElementKind::Points,
            color,
            || Shape::Points {
                points: points.to_vec(),
                stroke_width,
            },
            |canvas| canvas.draw_points(points, stroke_width, color),
        );
    }

    pub fn draw_path(&mut self, points: &[Point<Pixels>], closed: bool, paint: impl Into<Paint>) {
        let paint = paint.into();
        self.primitive(
            ElementKind::Path,
            paint.color,
            || Shape::Path {
                points: points.to_vec(),
                closed,
                stroke_width: paint.stroke_width(),
            },
            |canvas| canvas.draw_path(points, closed, &paint),
        );
    }

    /// Text keeps its place in the element sequence but is never hit.
    pub fn draw_text(&mut self, text: &str, origin: Point<Pixels>, font_size: Pixels, color: Hsla) {
        self.primitive(
            ElementKind::None,
            color,
            || Shape::None,
            |canvas| canvas.draw_text(text, origin, font_size, color),
        );
    }
}
