use crate::style::Property;
use crate::tree::NodeId;

/// A pointer sample delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Identifies the pointer (mouse, finger, pen) across a down/move/up sequence
    pub pointer_id: u32,
    /// Horizontal position in surface coordinates
    pub x: f32,
    /// Vertical position in surface coordinates
    pub y: f32,
    /// Node the host hit-tested the pointer on
    pub target: NodeId,
}

impl PointerEvent {
    pub fn new(pointer_id: u32, x: f32, y: f32, target: NodeId) -> Self {
        Self {
            pointer_id,
            x,
            y,
            target,
        }
    }

    pub fn retarget(mut self, target: NodeId) -> Self {
        self.target = target;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Pointer pressed
    PointerDown(PointerEvent),
    /// Pointer moved
    PointerMove(PointerEvent),
    /// Pointer released
    PointerUp(PointerEvent),
    /// The host took the pointer away (scroll takeover, lost capture)
    PointerCancel(PointerEvent),
    /// Primary activation of a node
    Click { target: NodeId },
    /// A property transition on `target` ran to completion
    TransitionEnd { target: NodeId, property: Property },
}

/// Discriminant of [`Event`], used to register listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    Click,
    TransitionEnd,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::PointerDown(_) => EventKind::PointerDown,
            Event::PointerMove(_) => EventKind::PointerMove,
            Event::PointerUp(_) => EventKind::PointerUp,
            Event::PointerCancel(_) => EventKind::PointerCancel,
            Event::Click { .. } => EventKind::Click,
            Event::TransitionEnd { .. } => EventKind::TransitionEnd,
        }
    }

    pub fn target(&self) -> NodeId {
        match self {
            Event::PointerDown(p)
            | Event::PointerMove(p)
            | Event::PointerUp(p)
            | Event::PointerCancel(p) => p.target,
            Event::Click { target } | Event::TransitionEnd { target, .. } => *target,
        }
    }

    /// Get the pointer sample of this event, if any
    pub fn pointer(&self) -> Option<&PointerEvent> {
        match self {
            Event::PointerDown(p)
            | Event::PointerMove(p)
            | Event::PointerUp(p)
            | Event::PointerCancel(p) => Some(p),
            _ => None,
        }
    }

    /// Same event delivered to another target
    pub fn with_target(&self, target: NodeId) -> Event {
        match self {
            Event::PointerDown(p) => Event::PointerDown(p.retarget(target)),
            Event::PointerMove(p) => Event::PointerMove(p.retarget(target)),
            Event::PointerUp(p) => Event::PointerUp(p.retarget(target)),
            Event::PointerCancel(p) => Event::PointerCancel(p.retarget(target)),
            Event::Click { .. } => Event::Click { target },
            Event::TransitionEnd { property, .. } => Event::TransitionEnd {
                target,
                property: *property,
            },
        }
    }

    /// Whether this event routes through pointer hit-testing (and so honours
    /// `pointer-events: none` and pointer capture)
    pub fn is_pointer_routed(&self) -> bool {
        !matches!(self, Event::TransitionEnd { .. })
    }
}
