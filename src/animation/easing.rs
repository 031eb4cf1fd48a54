use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Material standard curve, cubic-bezier(0.4, 0.0, 0.2, 1.0).
    #[default]
    FastOutSlowIn,
    /// cubic-bezier(0.0, 0.0, 0.2, 1.0)
    LinearOutSlowIn,
    /// cubic-bezier(0.42, 0.0, 0.58, 1.0)
    EaseInOut,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress.
    pub fn transform(self, fraction: f32) -> f32 {
        let t = fraction.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::FastOutSlowIn => CubicBezier::new(0.4, 0.0, 0.2, 1.0).solve(t),
            Easing::LinearOutSlowIn => CubicBezier::new(0.0, 0.0, 0.2, 1.0).solve(t),
            Easing::EaseInOut => CubicBezier::new(0.42, 0.0, 0.58, 1.0).solve(t),
        }
    }
}

/// Cubic bezier from (0, 0) to (1, 1) with two control points.
#[derive(Clone, Copy, Debug)]
struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn eval(a1: f32, a2: f32, t: f32) -> f32 {
        let inv = 1.0 - t;
        3.0 * a1 * inv * inv * t + 3.0 * a2 * inv * t * t + t * t * t
    }

    fn eval_derivative(a1: f32, a2: f32, t: f32) -> f32 {
        let inv = 1.0 - t;
        3.0 * a1 * inv * inv + 6.0 * (a2 - a1) * inv * t + 3.0 * (1.0 - a2) * t * t
    }

    /// Finds y for a given x: Newton steps first, bisection as fallback.
    fn solve(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }

        let mut t = x;
        for _ in 0..8 {
            let err = Self::eval(self.x1, self.x2, t) - x;
            if err.abs() < 1e-5 {
                return Self::eval(self.y1, self.y2, t);
            }
            let d = Self::eval_derivative(self.x1, self.x2, t);
            if d.abs() < 1e-6 {
                break;
            }
            t -= err / d;
        }

        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        t = x;
        for _ in 0..32 {
            let value = Self::eval(self.x1, self.x2, t);
            if (value - x).abs() < 1e-5 {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        Self::eval(self.y1, self.y2, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in [
            Easing::Linear,
            Easing::FastOutSlowIn,
            Easing::LinearOutSlowIn,
            Easing::EaseInOut,
        ] {
            assert_eq!(easing.transform(0.0), 0.0);
            assert_eq!(easing.transform(1.0), 1.0);
            assert_eq!(easing.transform(-1.0), 0.0);
            assert_eq!(easing.transform(2.0), 1.0);
        }
    }

    #[test]
    fn test_fast_out_slow_in_is_monotonic_and_front_loaded() {
        let mut last = 0.0;
        for i in 1..=100 {
            let v = Easing::FastOutSlowIn.transform(i as f32 / 100.0);
            assert!(v + 1e-4 >= last, "not monotonic at step {i}");
            last = v;
        }
        // Past the midpoint of time the curve is well past the midpoint of progress.
        assert!(Easing::FastOutSlowIn.transform(0.5) > 0.7);
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let a = Easing::EaseInOut.transform(0.25);
        let b = Easing::EaseInOut.transform(0.75);
        assert!((a + b - 1.0).abs() < 1e-3);
    }
}
