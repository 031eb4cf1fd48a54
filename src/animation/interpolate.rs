use super::value::{Animatable, AnimatedValue};
use crate::utils::PixelsExt;
use gpui::{Hsla, Pixels, Point, Size, hsla, px};
use std::fmt::Debug;

/// Closed set of value types the canvas knows how to animate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Float,
    Color,
    Offset,
    Size,
    Length,
    LengthPair,
}

/// A pair of lengths, e.g. the x/y corner radii of a rounded rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LengthPair {
    pub x: Pixels,
    pub y: Pixels,
}

impl LengthPair {
    pub fn new(x: Pixels, y: Pixels) -> Self {
        Self { x, y }
    }

    pub fn uniform(value: Pixels) -> Self {
        Self { x: value, y: value }
    }
}

/// A value type that can be eased and stored in the animation slot cache.
pub trait Interpolate: Copy + PartialEq + Debug + Send + Sync + 'static {
    const KIND: ValueKind;

    fn lerp(from: Self, to: Self, t: f32) -> Self;

    fn into_slot(value: Animatable<Self>) -> AnimatedValue;

    fn from_slot(slot: &AnimatedValue) -> Option<&Animatable<Self>>;
}

fn lerp_f32(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

fn lerp_px(from: Pixels, to: Pixels, t: f32) -> Pixels {
    px(lerp_f32(from.as_f32(), to.as_f32(), t))
}

/// Hue travels the short way around the wheel.
fn lerp_hsla(from: Hsla, to: Hsla, t: f32) -> Hsla {
    let mut dh = to.h - from.h;
    if dh > 0.5 {
        dh -= 1.0;
    } else if dh < -0.5 {
        dh += 1.0;
    }
    hsla(
        (from.h + dh * t).rem_euclid(1.0),
        lerp_f32(from.s, to.s, t),
        lerp_f32(from.l, to.l, t),
        lerp_f32(from.a, to.a, t),
    )
}

macro_rules! animated_slot {
    ($ty:ty, $variant:ident, |$from:ident, $to:ident, $t:ident| $body:expr) => {
        impl Interpolate for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn lerp($from: Self, $to: Self, $t: f32) -> Self {
                $body
            }

            fn into_slot(value: Animatable<Self>) -> AnimatedValue {
                AnimatedValue::$variant(value)
            }

            fn from_slot(slot: &AnimatedValue) -> Option<&Animatable<Self>> {
                match slot {
                    AnimatedValue::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

animated_slot!(i32, Int, |from, to, t| {
    lerp_f32(from as f32, to as f32, t).round() as i32
});
animated_slot!(f32, Float, |from, to, t| lerp_f32(from, to, t));
animated_slot!(Hsla, Color, |from, to, t| lerp_hsla(from, to, t));
animated_slot!(Point<Pixels>, Offset, |from, to, t| {
    Point::new(lerp_px(from.x, to.x, t), lerp_px(from.y, to.y, t))
});
animated_slot!(Size<Pixels>, Size, |from, to, t| {
    Size::new(
        lerp_px(from.width, to.width, t),
        lerp_px(from.height, to.height, t),
    )
});
animated_slot!(Pixels, Length, |from, to, t| lerp_px(from, to, t));
animated_slot!(LengthPair, LengthPair, |from, to, t| {
    LengthPair::new(lerp_px(from.x, to.x, t), lerp_px(from.y, to.y, t))
});
