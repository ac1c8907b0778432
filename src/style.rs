//! Inline style of document nodes.
//!
//! Styles are deliberately small: just what the toast layout and its transitions need.
//! Animatable properties are addressed through [`Property`] so that the document can
//! interpolate them while a [`Transition`] is running.

use std::str::FromStr;

use bitflags::bitflags;

use crate::animation::{Animatable, Transition};
use crate::transform::Transform;
use crate::ParseError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// Parses `#rgb` and `#rrggbb` (the leading `#` is optional).
impl FromStr for Color {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        let invalid = || ParseError::Color(s.to_string());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let hex = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        match digits.len() {
            6 => Ok(Color::from_hex(hex)),
            3 => {
                let r = (hex >> 8) & 0xF;
                let g = (hex >> 4) & 0xF;
                let b = hex & 0xF;
                Ok(Color::from_hex((r * 0x11) << 16 | (g * 0x11) << 8 | (b * 0x11)))
            }
            _ => Err(invalid()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// How a node lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    /// Children stack vertically; the node fills its parent's width
    #[default]
    Block,
    /// Children sit side by side; the node fills its parent's width
    Row,
    /// Children sit side by side; the node shrinks to fit them
    InlineRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// Participates in its parent's flow
    #[default]
    Static,
    /// Painted behind siblings, ignored by the parent's height
    Absolute,
    /// Fixed far outside the visible area
    Offscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Clip,
}

bitflags! {
    /// Set of animatable properties, used to declare which properties a transition covers
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PropertyMask: u8 {
        const WIDTH = 1 << 0;
        const HEIGHT = 1 << 1;
        const MAX_HEIGHT = 1 << 2;
        const BORDER_RADIUS = 1 << 3;
        const OPACITY = 1 << 4;
        const TRANSFORM = 1 << 5;
    }
}

/// An animatable style property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Width,
    Height,
    MaxHeight,
    BorderRadius,
    Opacity,
    Transform,
}

impl Property {
    pub fn mask(self) -> PropertyMask {
        match self {
            Property::Width => PropertyMask::WIDTH,
            Property::Height => PropertyMask::HEIGHT,
            Property::MaxHeight => PropertyMask::MAX_HEIGHT,
            Property::BorderRadius => PropertyMask::BORDER_RADIUS,
            Property::Opacity => PropertyMask::OPACITY,
            Property::Transform => PropertyMask::TRANSFORM,
        }
    }
}

/// Value of an animatable property.
///
/// `Auto` stands for both `auto` sizes and an absent max-height; it cannot be interpolated,
/// so switching to or from it always happens instantly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Auto,
    Scalar(f32),
    Transform(Transform),
}

impl PropertyValue {
    pub fn from_length(length: Option<f32>) -> Self {
        length.map_or(PropertyValue::Auto, PropertyValue::Scalar)
    }

    pub fn as_length(&self) -> Option<f32> {
        match self {
            PropertyValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_transform(&self) -> Transform {
        match self {
            PropertyValue::Transform(t) => *t,
            _ => Transform::IDENTITY,
        }
    }

    /// Interpolate between two values of the same kind; `None` if they can't be
    pub fn interpolate(from: &Self, to: &Self, t: f32) -> Option<Self> {
        match (from, to) {
            (PropertyValue::Scalar(a), PropertyValue::Scalar(b)) => {
                Some(PropertyValue::Scalar(f32::lerp(a, b, t)))
            }
            (PropertyValue::Transform(a), PropertyValue::Transform(b)) => {
                Some(PropertyValue::Transform(Transform::lerp(a, b, t)))
            }
            _ => None,
        }
    }
}

/// Inline style of a node
#[derive(Debug, Clone)]
pub struct Style {
    pub display: Display,
    pub position: Position,
    pub overflow: Overflow,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub max_height: Option<f32>,
    pub padding: Padding,
    pub gap: f32,
    pub font_size: f32,
    pub border_radius: f32,
    pub opacity: f32,
    pub transform: Transform,
    pub color: Option<Color>,
    pub background: Option<Color>,
    pub visible: bool,
    pub pointer_events: bool,
    /// Whether the host should leave touch panning to the page (`touch-action: none` when false)
    pub touch_panning: bool,
    /// Transitions declared on this node, first match wins
    pub transitions: Vec<(PropertyMask, Transition)>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            display: Display::Block,
            position: Position::Static,
            overflow: Overflow::Visible,
            width: None,
            height: None,
            max_height: None,
            padding: Padding::default(),
            gap: 0.0,
            font_size: 14.0,
            border_radius: 0.0,
            opacity: 1.0,
            transform: Transform::IDENTITY,
            color: None,
            background: None,
            visible: true,
            pointer_events: true,
            touch_panning: true,
            transitions: Vec::new(),
        }
    }
}

impl Style {
    pub fn get(&self, property: Property) -> PropertyValue {
        match property {
            Property::Width => PropertyValue::from_length(self.width),
            Property::Height => PropertyValue::from_length(self.height),
            Property::MaxHeight => PropertyValue::from_length(self.max_height),
            Property::BorderRadius => PropertyValue::Scalar(self.border_radius),
            Property::Opacity => PropertyValue::Scalar(self.opacity),
            Property::Transform => PropertyValue::Transform(self.transform),
        }
    }

    pub fn set(&mut self, property: Property, value: PropertyValue) {
        match property {
            Property::Width => self.width = value.as_length(),
            Property::Height => self.height = value.as_length(),
            Property::MaxHeight => self.max_height = value.as_length(),
            Property::BorderRadius => self.border_radius = value.as_length().unwrap_or(0.0),
            Property::Opacity => self.opacity = value.as_length().unwrap_or(1.0),
            Property::Transform => self.transform = value.as_transform(),
        }
    }

    /// Transition declared for `property`, if any
    pub fn transition_for(&self, property: Property) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|(mask, _)| mask.contains(property.mask()))
            .map(|(_, transition)| transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_str() {
        assert_eq!("#ffffff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("000".parse::<Color>().unwrap(), Color::BLACK);
        assert_eq!(
            "#DC2626".parse::<Color>().unwrap(),
            Color::from_hex(0xDC2626)
        );
        assert!("#12345".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
    }

    #[test]
    fn test_style_property_round_trip() {
        let mut style = Style::default();
        style.set(Property::Height, PropertyValue::Scalar(48.0));
        assert_eq!(style.height, Some(48.0));
        style.set(Property::Height, PropertyValue::Auto);
        assert_eq!(style.height, None);
        style.set(
            Property::Transform,
            PropertyValue::Transform(Transform::translate_y(-10.0)),
        );
        assert_eq!(style.transform.translate_y, -10.0);
    }

    #[test]
    fn test_transition_lookup_first_match() {
        let mut style = Style::default();
        style.transitions.push((
            PropertyMask::WIDTH | PropertyMask::HEIGHT,
            Transition::expo_out(600),
        ));
        style
            .transitions
            .push((PropertyMask::HEIGHT, Transition::expo_out(100)));
        assert_eq!(
            style.transition_for(Property::Height).map(|t| t.duration_ms),
            Some(600)
        );
        assert!(style.transition_for(Property::Opacity).is_none());
    }

    #[test]
    fn test_auto_does_not_interpolate() {
        let from = PropertyValue::Auto;
        let to = PropertyValue::Scalar(10.0);
        assert!(PropertyValue::interpolate(&from, &to, 0.5).is_none());
    }
}
