//! Easing curves for property transitions.
//!
//! Toast geometry uses [`TimingFunction::EXPO_OUT`], a steep deceleration that makes the
//! pill/card morph feel springy without overshooting. Opacity fades use CSS `ease`.

use std::rc::Rc;

/// Maps linear progress in `[0, 1]` to eased progress
#[derive(Clone)]
pub enum TimingFunction {
    Linear,
    /// CSS `ease`, i.e. `cubic-bezier(0.25, 0.1, 0.25, 1)`
    Ease,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`; x control points must lie in `[0, 1]`
    CubicBezier(f32, f32, f32, f32),
    Custom(Rc<dyn Fn(f32) -> f32>),
}

impl TimingFunction {
    /// `cubic-bezier(0.16, 1, 0.3, 1)`
    pub const EXPO_OUT: TimingFunction = TimingFunction::CubicBezier(0.16, 1.0, 0.3, 1.0);

    pub fn evaluate(&self, progress: f32) -> f32 {
        let progress = progress.clamp(0.0, 1.0);
        match self {
            TimingFunction::Linear => progress,
            TimingFunction::Ease => Bezier::new(0.25, 0.1, 0.25, 1.0).solve(progress),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => {
                Bezier::new(*x1, *y1, *x2, *y2).solve(progress)
            }
            TimingFunction::Custom(f) => f(progress),
        }
    }

    pub fn custom(f: impl Fn(f32) -> f32 + 'static) -> Self {
        TimingFunction::Custom(Rc::new(f))
    }
}

impl std::fmt::Debug for TimingFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingFunction::Linear => f.write_str("linear"),
            TimingFunction::Ease => f.write_str("ease"),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
            TimingFunction::Custom(_) => f.write_str("custom"),
        }
    }
}

/// Unit cubic bezier anchored at (0,0) and (1,1), stored in polynomial form.
struct Bezier {
    ax: f32,
    bx: f32,
    cx: f32,
    ay: f32,
    by: f32,
    cy: f32,
}

impl Bezier {
    fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let cx = 3.0 * x1;
        let bx = 3.0 * (x2 - x1) - cx;
        let cy = 3.0 * y1;
        let by = 3.0 * (y2 - y1) - cy;
        Self {
            ax: 1.0 - cx - bx,
            bx,
            cx,
            ay: 1.0 - cy - by,
            by,
            cy,
        }
    }

    fn x(&self, s: f32) -> f32 {
        ((self.ax * s + self.bx) * s + self.cx) * s
    }

    fn y(&self, s: f32) -> f32 {
        ((self.ay * s + self.by) * s + self.cy) * s
    }

    fn dx(&self, s: f32) -> f32 {
        (3.0 * self.ax * s + 2.0 * self.bx) * s + self.cx
    }

    /// Find the curve parameter whose x is `x`, then return its y.
    fn solve(&self, x: f32) -> f32 {
        const EPSILON: f32 = 1e-5;

        let mut s = x;
        for _ in 0..8 {
            let error = self.x(s) - x;
            if error.abs() < EPSILON {
                return self.y(s);
            }
            let slope = self.dx(s);
            if slope.abs() < 1e-6 {
                break;
            }
            s -= error / slope;
        }

        // Newton stalled on a flat stretch; bisect instead
        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        s = x;
        for _ in 0..32 {
            let current = self.x(s);
            if (current - x).abs() < EPSILON {
                break;
            }
            if current < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) * 0.5;
        }
        self.y(s)
    }
}
