use gpui::{Bounds, Pixels, Point, Size, px};
use glam::Vec2;

pub trait PixelsExt {
    fn as_f32(&self) -> f32;
}

impl PixelsExt for Pixels {
    fn as_f32(&self) -> f32 {
        f32::from(*self)
    }
}

/// Conversions between GPUI pixel geometry and `glam` vectors used by the hit tests.
pub trait PointExt {
    fn to_vec2(&self) -> Vec2;
}

impl PointExt for Point<Pixels> {
    fn to_vec2(&self) -> Vec2 {
        Vec2::new(self.x.as_f32(), self.y.as_f32())
    }
}

pub fn from_vec2(v: Vec2) -> Point<Pixels> {
    Point::new(px(v.x), px(v.y))
}

pub fn center_of(top_left: Point<Pixels>, size: Size<Pixels>) -> Point<Pixels> {
    Point::new(
        px(top_left.x.as_f32() + size.width.as_f32() / 2.0),
        px(top_left.y.as_f32() + size.height.as_f32() / 2.0),
    )
}

/// Bounding box of a point list, `None` when empty.
pub fn bounds_of_points(points: &[Point<Pixels>]) -> Option<Bounds<Pixels>> {
    let first = points.first()?.to_vec2();
    let (min, max) = points
        .iter()
        .skip(1)
        .fold((first, first), |(min, max), p| {
            let v = p.to_vec2();
            (min.min(v), max.max(v))
        });
    let size = max - min;
    Some(Bounds::new(
        from_vec2(min),
        Size::new(px(size.x), px(size.y)),
    ))
}

/// Distance from `p` to the segment `a..b`.
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
