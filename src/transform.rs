use crate::animation::Animatable;

/// Paint-time transform of a toast: a vertical translation followed by a uniform scale
/// around the node's center.
///
/// Transforms never affect layout; `offset_height` and friends ignore them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Vertical translation in logical pixels (negative = up)
    pub translate_y: f32,
    /// Uniform scale (1.0 = no scale)
    pub scale: f32,
}

impl Transform {
    /// Identity transform (no transformation)
    pub const IDENTITY: Self = Self {
        translate_y: 0.0,
        scale: 1.0,
    };

    /// Create a vertical translation
    pub fn translate_y(y: f32) -> Self {
        Self {
            translate_y: y,
            ..Self::IDENTITY
        }
    }

    /// Replace the scale, keeping the translation
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Animatable for Transform {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Self {
            translate_y: f32::lerp(&from.translate_y, &to.translate_y, t),
            scale: f32::lerp(&from.scale, &to.scale, t),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_scale_keeps_translation() {
        let t = Transform::translate_y(-30.0).with_scale(0.5);
        assert_eq!(t.translate_y, -30.0);
        assert_eq!(t.scale, 0.5);
        assert!(!t.is_identity());
        assert!(Transform::default().is_identity());
    }

    #[test]
    fn test_transform_lerp() {
        let from = Transform::translate_y(-80.0).with_scale(0.92);
        let mid = Transform::lerp(&from, &Transform::IDENTITY, 0.5);
        assert_eq!(mid.translate_y, -40.0);
        assert!((mid.scale - 0.96).abs() < 1e-6);
    }
}
