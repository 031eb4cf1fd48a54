//! Recorded primitives of a frame, used for identity tracking and hit-testing.

use crate::animation::LengthPair;
use crate::utils::{PixelsExt, PointExt, bounds_of_points, center_of, distance_to_segment, from_vec2};
use glam::Vec2;
use gpui::{Hsla, Pixels, Point, Size, px};
use std::cell::{Cell, RefCell};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Shared handle to a pooled element. Handles are reused frame after frame by the slot cache.
pub type ElementHandle = Rc<RefCell<DrawElement>>;

/// Minimum hit radius for thin strokes, so hairlines stay targetable.
const MIN_HIT_RADIUS: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    None,
    Rect,
    Circle,
    Oval,
    Arc,
    Line,
    Points,
    RoundRect,
    Path,
    Group,
}

/// Data item a primitive renders. `group` identifies the siblings drawn together
/// (e.g. the bars of one category), `index` the item inside its series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DataRef {
    pub group: usize,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    None,
    Rect {
        top_left: Point<Pixels>,
        size: Size<Pixels>,
    },
    Circle {
        center: Point<Pixels>,
        radius: Pixels,
    },
    Oval {
        top_left: Point<Pixels>,
        size: Size<Pixels>,
    },
    /// Angles are in degrees, clockwise from 3 o'clock.
    Arc {
        top_left: Point<Pixels>,
        size: Size<Pixels>,
        start_angle: f32,
        sweep_angle: f32,
        stroke_width: Pixels,
    },
    Line {
        start: Point<Pixels>,
        end: Point<Pixels>,
        stroke_width: Pixels,
    },
    Points {
        points: Vec<Point<Pixels>>,
        stroke_width: Pixels,
    },
    RoundRect {
        top_left: Point<Pixels>,
        size: Size<Pixels>,
        corner_radius: LengthPair,
    },
    Path {
        points: Vec<Point<Pixels>>,
        closed: bool,
        stroke_width: Pixels,
    },
    Group {
        children: Vec<ElementHandle>,
        top_left: Point<Pixels>,
        size: Size<Pixels>,
    },
}

impl Shape {
    pub fn empty(kind: ElementKind) -> Self {
        let origin = Point::default();
        let size = Size::default();
        match kind {
            ElementKind::None => Shape::None,
            ElementKind::Rect => Shape::Rect { top_left: origin, size },
            ElementKind::Circle => Shape::Circle {
                center: origin,
                radius: px(0.0),
            },
            ElementKind::Oval => Shape::Oval { top_left: origin, size },
            ElementKind::Arc => Shape::Arc {
                top_left: origin,
                size,
                start_angle: 0.0,
                sweep_angle: 0.0,
                stroke_width: px(0.0),
            },
            ElementKind::Line => Shape::Line {
                start: origin,
                end: origin,
                stroke_width: px(0.0),
            },
            ElementKind::Points => Shape::Points {
                points: Vec::new(),
                stroke_width: px(0.0),
            },
            ElementKind::RoundRect => Shape::RoundRect {
                top_left: origin,
                size,
                corner_radius: LengthPair::default(),
            },
            ElementKind::Path => Shape::Path {
                points: Vec::new(),
                closed: false,
                stroke_width: px(0.0),
            },
            ElementKind::Group => Shape::Group {
                children: Vec::new(),
                top_left: origin,
                size,
            },
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Shape::None => ElementKind::None,
            Shape::Rect { .. } => ElementKind::Rect,
            Shape::Circle { .. } => ElementKind::Circle,
            Shape::Oval { .. } => ElementKind::Oval,
            Shape::Arc { .. } => ElementKind::Arc,
            Shape::Line { .. } => ElementKind::Line,
            Shape::Points { .. } => ElementKind::Points,
            Shape::RoundRect { .. } => ElementKind::RoundRect,
            Shape::Path { .. } => ElementKind::Path,
            Shape::Group { .. } => ElementKind::Group,
        }
    }

    /// Geometric hit test against the exact shape.
    pub fn contains(&self, point: Point<Pixels>) -> bool {
        let p = point.to_vec2();
        match self {
            Shape::None => false,
            Shape::Rect { top_left, size } => rect_contains(*top_left, *size, p),
            Shape::Circle { center, radius } => {
                let r = radius.as_f32();
                p.distance_squared(center.to_vec2()) <= r * r
            }
            Shape::Oval { top_left, size } => oval_contains(*top_left, *size, p),
            Shape::Arc {
                top_left,
                size,
                start_angle,
                sweep_angle,
                stroke_width,
            } => arc_contains(*top_left, *size, *start_angle, *sweep_angle, *stroke_width, p),
            Shape::Line {
                start,
                end,
                stroke_width,
            } => {
                let reach = (stroke_width.as_f32() / 2.0).max(MIN_HIT_RADIUS);
                distance_to_segment(p, start.to_vec2(), end.to_vec2()) <= reach
            }
            Shape::Points {
                points,
                stroke_width,
            } => {
                let reach = (stroke_width.as_f32() / 2.0).max(MIN_HIT_RADIUS);
                points.iter().any(|c| c.to_vec2().distance(p) <= reach)
            }
            Shape::RoundRect {
                top_left,
                size,
                corner_radius,
            } => round_rect_contains(*top_left, *size, *corner_radius, p),
            Shape::Path {
                points,
                closed,
                stroke_width,
            } => {
                if *closed {
                    polygon_contains(points, p)
                } else {
                    let reach = (stroke_width.as_f32() / 2.0).max(MIN_HIT_RADIUS);
                    points
                        .windows(2)
                        .any(|w| distance_to_segment(p, w[0].to_vec2(), w[1].to_vec2()) <= reach)
                }
            }
            Shape::Group {
                children,
                top_left,
                size,
            } => {
                rect_contains(*top_left, *size, p)
                    || children.iter().any(|child| child.borrow().contains(point))
            }
        }
    }

    fn focus_point(&self) -> Point<Pixels> {
        match self {
            Shape::None => Point::default(),
            Shape::Rect { top_left, size }
            | Shape::Oval { top_left, size }
            | Shape::RoundRect { top_left, size, .. }
            | Shape::Group { top_left, size, .. } => center_of(*top_left, *size),
            Shape::Circle { center, .. } => *center,
            Shape::Arc {
                top_left,
                size,
                start_angle,
                sweep_angle,
                stroke_width,
            } => {
                let center = center_of(*top_left, *size).to_vec2();
                let outer = size.width.as_f32().min(size.height.as_f32()) / 2.0;
                let radius = if stroke_width.as_f32() > 0.0 {
                    outer
                } else {
                    outer / 2.0
                };
                let mid = (start_angle + sweep_angle / 2.0).to_radians();
                from_vec2(center + Vec2::new(mid.cos(), mid.sin()) * radius)
            }
            Shape::Line { start, end, .. } => {
                from_vec2((start.to_vec2() + end.to_vec2()) / 2.0)
            }
            Shape::Points { points, .. } => {
                if points.is_empty() {
                    return Point::default();
                }
                let sum = points.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
                from_vec2(sum / points.len() as f32)
            }
            Shape::Path { points, .. } => bounds_of_points(points)
                .map(|b| center_of(b.origin, b.size))
                .unwrap_or_default(),
        }
    }

    /// Copy with group children duplicated into fresh handles.
    fn detached(&self) -> Shape {
        match self {
            Shape::Group {
                children,
                top_left,
                size,
            } => Shape::Group {
                children: children
                    .iter()
                    .map(|c| Rc::new(RefCell::new(c.borrow().detached())))
                    .collect(),
                top_left: *top_left,
                size: *size,
            },
            other => other.clone(),
        }
    }
}

fn rect_contains(top_left: Point<Pixels>, size: Size<Pixels>, p: Vec2) -> bool {
    let min = top_left.to_vec2();
    let max = min + Vec2::new(size.width.as_f32(), size.height.as_f32());
    p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y
}

fn oval_contains(top_left: Point<Pixels>, size: Size<Pixels>, p: Vec2) -> bool {
    let rx = size.width.as_f32() / 2.0;
    let ry = size.height.as_f32() / 2.0;
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let c = center_of(top_left, size).to_vec2();
    let dx = (p.x - c.x) / rx;
    let dy = (p.y - c.y) / ry;
    dx * dx + dy * dy < 1.0
}

fn arc_contains(
    top_left: Point<Pixels>,
    size: Size<Pixels>,
    start_angle: f32,
    sweep_angle: f32,
    stroke_width: Pixels,
    p: Vec2,
) -> bool {
    let center = center_of(top_left, size).to_vec2();
    let outer = size.width.as_f32().min(size.height.as_f32()) / 2.0;
    let distance = p.distance(center);
    let stroke = stroke_width.as_f32();

    let in_band = if stroke <= 0.0 {
        distance <= outer
    } else {
        distance >= outer - stroke / 2.0 && distance <= outer + stroke / 2.0
    };
    in_band && angle_in_sweep(p - center, start_angle, sweep_angle)
}

/// Whether the direction of `v` lies within the sweep, handling the 0°/360° wrap.
fn angle_in_sweep(v: Vec2, start_angle: f32, sweep_angle: f32) -> bool {
    let (start, sweep) = if sweep_angle < 0.0 {
        (start_angle + sweep_angle, -sweep_angle)
    } else {
        (start_angle, sweep_angle)
    };
    if sweep >= 360.0 {
        return true;
    }
    let start = start.rem_euclid(360.0);
    let end = start + sweep;
    let angle = v.y.atan2(v.x).to_degrees().rem_euclid(360.0);

    (angle >= start && angle <= end) || (end > 360.0 && angle <= end - 360.0)
}

fn round_rect_contains(
    top_left: Point<Pixels>,
    size: Size<Pixels>,
    corner_radius: LengthPair,
    p: Vec2,
) -> bool {
    if !rect_contains(top_left, size, p) {
        return false;
    }
    let w = size.width.as_f32();
    let h = size.height.as_f32();
    let rx = corner_radius.x.as_f32().clamp(0.0, w / 2.0);
    let ry = corner_radius.y.as_f32().clamp(0.0, h / 2.0);
    if rx <= 0.0 || ry <= 0.0 {
        return true;
    }

    let min = top_left.to_vec2();
    let local = p - min;
    let cx = if local.x < rx {
        rx
    } else if local.x > w - rx {
        w - rx
    } else {
        return true;
    };
    let cy = if local.y < ry {
        ry
    } else if local.y > h - ry {
        h - ry
    } else {
        return true;
    };
    let dx = (local.x - cx) / rx;
    let dy = (local.y - cy) / ry;
    dx * dx + dy * dy <= 1.0
}

/// Even-odd ray casting.
fn polygon_contains(points: &[Point<Pixels>], p: Vec2) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let a = points[i].to_vec2();
        let b = points[j].to_vec2();
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// One recorded primitive. Equality and hashing are structural over geometry and color;
/// the focus-point override, data binding and interaction flags are ignored.
#[derive(Clone, Debug)]
pub struct DrawElement {
    shape: Shape,
    pub color: Hsla,
    pub item: Option<DataRef>,
    pub is_activated: bool,
    pub is_hovered: bool,
    pub is_pressed: bool,
    pub is_tapped: bool,
    pub is_double_tapped: bool,
    pub is_long_pressed: bool,
    focus_override: Option<Point<Pixels>>,
    derived_focus: Cell<Option<Point<Pixels>>>,
}

impl DrawElement {
    pub fn new(shape: Shape, color: Hsla) -> Self {
        Self {
            shape,
            color,
            item: None,
            is_activated: false,
            is_hovered: false,
            is_pressed: false,
            is_tapped: false,
            is_double_tapped: false,
            is_long_pressed: false,
            focus_override: None,
            derived_focus: Cell::new(None),
        }
    }

    pub fn empty(kind: ElementKind) -> Self {
        Self::new(Shape::empty(kind), gpui::transparent_black())
    }

    pub fn into_handle(self) -> ElementHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn kind(&self) -> ElementKind {
        self.shape.kind()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
        self.derived_focus.set(None);
    }

    pub fn shape_mut(&mut self) -> &mut Shape {
        self.derived_focus.set(None);
        &mut self.shape
    }

    pub fn contains(&self, point: Point<Pixels>) -> bool {
        self.shape.contains(point)
    }

    /// Anchor for tooltips and markers. Derived from the geometry on first use unless overridden.
    pub fn focus_point(&self) -> Point<Pixels> {
        if let Some(point) = self.focus_override {
            return point;
        }
        if let Some(point) = self.derived_focus.get() {
            return point;
        }
        let point = self.shape.focus_point();
        self.derived_focus.set(Some(point));
        point
    }

    pub fn set_focus_point(&mut self, point: Option<Point<Pixels>>) {
        self.focus_override = point;
    }

    pub fn children(&self) -> &[ElementHandle] {
        match &self.shape {
            Shape::Group { children, .. } => children,
            _ => &[],
        }
    }

    pub fn is_hovered_or_pressed(&self) -> bool {
        self.is_hovered || self.is_pressed
    }

    pub fn is_interacted(&self) -> bool {
        self.is_hovered_or_pressed() || self.is_tapped || self.is_double_tapped || self.is_long_pressed
    }

    /// Clears per-frame state before a pooled element is reused.
    pub fn recycle(&mut self) {
        self.item = None;
        self.is_activated = false;
        self.clear_interaction();
        self.focus_override = None;
        if let Shape::Group { children, .. } = &mut self.shape {
            children.clear();
        }
    }

    pub fn clear_interaction(&mut self) {
        self.is_hovered = false;
        self.is_pressed = false;
        self.is_tapped = false;
        self.is_double_tapped = false;
        self.is_long_pressed = false;
    }

    /// Field-wise copy from an element of the same variant; a no-op otherwise.
    ///
    /// Used to freeze the currently interacted element into a snapshot that the slot cache
    /// will not overwrite on the next frame.
    pub fn copy_from(&mut self, other: &DrawElement) {
        if self.kind() != other.kind() {
            return;
        }
        self.set_shape(other.shape.detached());
        self.color = other.color;
        self.item = other.item;
        self.is_activated = other.is_activated;
        self.is_hovered = other.is_hovered;
        self.is_pressed = other.is_pressed;
        self.is_tapped = other.is_tapped;
        self.is_double_tapped = other.is_double_tapped;
        self.is_long_pressed = other.is_long_pressed;
        self.focus_override = other.focus_override;
    }

    /// Deep copy, detached from any pooled group children.
    pub fn detached(&self) -> DrawElement {
        let mut copy = DrawElement::empty(self.kind());
        copy.copy_from(self);
        copy
    }
}

impl PartialEq for DrawElement {
    fn eq(&self, other: &Self) -> bool {
        self.color == other.color && self.shape == other.shape
    }
}

impl Eq for DrawElement {}

fn hash_f32<H: Hasher>(value: f32, state: &mut H) {
    // Folds -0.0 onto 0.0 so equal values hash equally.
    (value + 0.0).to_bits().hash(state);
}

fn hash_px<H: Hasher>(value: Pixels, state: &mut H) {
    hash_f32(value.as_f32(), state);
}

fn hash_point<H: Hasher>(point: &Point<Pixels>, state: &mut H) {
    hash_px(point.x, state);
    hash_px(point.y, state);
}

fn hash_size<H: Hasher>(size: &Size<Pixels>, state: &mut H) {
    hash_px(size.width, state);
    hash_px(size.height, state);
}

impl Hash for Shape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Shape::None => {}
            Shape::Rect { top_left, size } | Shape::Oval { top_left, size } => {
                hash_point(top_left, state);
                hash_size(size, state);
            }
            Shape::Circle { center, radius } => {
                hash_point(center, state);
                hash_px(*radius, state);
            }
            Shape::Arc {
                top_left,
                size,
                start_angle,
                sweep_angle,
                stroke_width,
            } => {
                hash_point(top_left, state);
                hash_size(size, state);
                hash_f32(*start_angle, state);
                hash_f32(*sweep_angle, state);
                hash_px(*stroke_width, state);
            }
            Shape::Line {
                start,
                end,
                stroke_width,
            } => {
                hash_point(start, state);
                hash_point(end, state);
                hash_px(*stroke_width, state);
            }
            Shape::Points {
                points,
                stroke_width,
            } => {
                points.len().hash(state);
                points.iter().for_each(|p| hash_point(p, state));
                hash_px(*stroke_width, state);
            }
            Shape::RoundRect {
                top_left,
                size,
                corner_radius,
            } => {
                hash_point(top_left, state);
                hash_size(size, state);
                hash_px(corner_radius.x, state);
                hash_px(corner_radius.y, state);
            }
            Shape::Path {
                points,
                closed,
                stroke_width,
            } => {
                points.len().hash(state);
                points.iter().for_each(|p| hash_point(p, state));
                closed.hash(state);
                hash_px(*stroke_width, state);
            }
            Shape::Group {
                children,
                top_left,
                size,
            } => {
                hash_point(top_left, state);
                hash_size(size, state);
                children.len().hash(state);
                for child in children {
                    child.borrow().hash(state);
                }
            }
        }
    }
}

impl Hash for DrawElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.shape.hash(state);
        hash_f32(self.color.h, state);
        hash_f32(self.color.s, state);
        hash_f32(self.color.l, state);
        hash_f32(self.color.a, state);
    }
}
