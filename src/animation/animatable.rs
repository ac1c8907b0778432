use crate::style::Color;

/// Values a transition can interpolate. `t` is eased progress and may leave `[0, 1]`.
pub trait Animatable: Clone + PartialEq + 'static {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self;
}

impl Animatable for f32 {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Animatable for Color {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Color {
            r: f32::lerp(&from.r, &to.r, t),
            g: f32::lerp(&from.g, &to.g, t),
            b: f32::lerp(&from.b, &to.b, t),
            a: f32::lerp(&from.a, &to.a, t),
        }
    }
}
