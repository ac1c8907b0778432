//! Lifecycle state machine of a single toast.
//!
//! ```text
//! Entering ──show──▶ Shown ──dismiss──▶ Dismissing ──remove──▶ Removed
//!                      │
//!   Collapsed ─expand─▶ Expanding ─settle─▶ Expanded
//!       ▲                   │                  │
//!       └──settle── Collapsing ◀──collapse─────┘
//! ```
//!
//! The stage and the shape are tracked separately so that an expand requested before the
//! entrance finishes is not lost. Every continuation scheduled here belongs to the toast's
//! timer group and re-checks the state when it runs.

use std::rc::Rc;

use crate::animation::Transition;
use crate::constants::{
    CARD_RADIUS, COLLAPSE_SETTLE_MS, DISMISS_REMOVE_MS, EXIT_COLLAPSE_MS, EXPAND_TRANSITION_MS,
    HEADER_HEIGHT, PILL_RADIUS, SWIPE_REMOVE_MS,
};
use crate::measure;
use crate::style::{Overflow, PropertyMask};
use crate::tree::Classes;

use super::ToastInner;

/// Observable state of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastState {
    /// Waiting for the two-frame entrance to show it
    Entering,
    /// Shown as a pill
    Collapsed,
    /// Morphing into a card
    Expanding,
    /// Shown as a card
    Expanded,
    /// Morphing back into a pill
    Collapsing,
    /// Leaving; no further mutation is accepted
    Dismissing,
    /// Detached from the viewport
    Removed,
}

impl ToastState {
    /// Whether the toast no longer accepts mutation
    pub fn is_dead(self) -> bool {
        matches!(self, ToastState::Dismissing | ToastState::Removed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Stage {
    Entering,
    Shown,
    Dismissing,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Shape {
    Collapsed,
    Expanding,
    Expanded,
    Collapsing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Lifecycle {
    pub stage: Stage,
    pub shape: Shape,
}

impl Lifecycle {
    pub const fn new() -> Self {
        Self {
            stage: Stage::Entering,
            shape: Shape::Collapsed,
        }
    }

    pub fn state(self) -> ToastState {
        match (self.stage, self.shape) {
            (Stage::Entering, _) => ToastState::Entering,
            (Stage::Dismissing, _) => ToastState::Dismissing,
            (Stage::Removed, _) => ToastState::Removed,
            (Stage::Shown, Shape::Collapsed) => ToastState::Collapsed,
            (Stage::Shown, Shape::Expanding) => ToastState::Expanding,
            (Stage::Shown, Shape::Expanded) => ToastState::Expanded,
            (Stage::Shown, Shape::Collapsing) => ToastState::Collapsing,
        }
    }

    pub fn is_dead(self) -> bool {
        matches!(self.stage, Stage::Dismissing | Stage::Removed)
    }

    pub fn is_expanded(self) -> bool {
        matches!(self.shape, Shape::Expanding | Shape::Expanded)
    }
}

/// What started a dismissal. All reasons share one code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DismissReason {
    /// `ToastHandle::dismiss`
    Requested,
    /// The auto-dismiss timer
    Timeout,
    /// A committed swipe; the toast has already flown out
    Swipe,
}

impl ToastInner {
    fn set_stage(&self, stage: Stage) {
        let mut lifecycle = self.lifecycle.get();
        lifecycle.stage = stage;
        self.lifecycle.set(lifecycle);
    }

    fn set_shape(&self, shape: Shape) {
        let mut lifecycle = self.lifecycle.get();
        lifecycle.shape = shape;
        self.lifecycle.set(lifecycle);
    }

    fn cancel_morph(&self) {
        for task in self.morph_tasks.borrow_mut().drain(..) {
            self.timers.cancel(task);
        }
    }

    /// Second phase of the entrance: show the toast and arm its timers.
    pub(super) fn show(self: &Rc<Self>) {
        if self.is_dead() {
            return;
        }
        let toast = self.nodes.toast;
        self.with_doc(|doc| doc.add_class(toast, Classes::SHOW));
        self.set_stage(Stage::Shown);
        log::debug!("Toast {} shown", self.id);

        let auto_dismiss = self.auto_dismiss_after_ms;
        if self.has_body.get() {
            let inner = self.clone();
            self.timers
                .set_timeout(self.expand_delay_ms, move || inner.expand());
            if auto_dismiss > 0 {
                let inner = self.clone();
                self.timers.set_timeout(
                    self.expand_delay_ms
                        .saturating_add(EXPAND_TRANSITION_MS)
                        .saturating_add(auto_dismiss),
                    move || inner.dismiss(DismissReason::Timeout),
                );
            }
        } else if auto_dismiss > 0 {
            let inner = self.clone();
            self.timers
                .set_timeout(auto_dismiss, move || inner.dismiss(DismissReason::Timeout));
        }
    }

    /// Morph the pill into a card sized to the body.
    pub(super) fn expand(self: &Rc<Self>) {
        let lifecycle = self.lifecycle.get();
        if lifecycle.is_dead() {
            log::debug!("Ignoring expand of dismissed toast {}", self.id);
            return;
        }
        if !self.has_body.get() || lifecycle.is_expanded() {
            return;
        }
        self.cancel_morph();

        let nodes = self.nodes;
        let measured = self.with_doc(|doc| {
            let content_width = doc.offset_width(nodes.content);
            let body_height = measure::natural_height(doc, nodes.body_wrap, content_width);

            doc.set_width(nodes.background, Some(content_width));
            doc.set_height(nodes.background, Some(HEADER_HEIGHT + body_height));
            doc.set_border_radius(nodes.background, CARD_RADIUS);
            doc.set_height(nodes.body_wrap, Some(body_height));
            doc.remove_class(nodes.toast, Classes::COLLAPSING);
            doc.add_class(nodes.toast, Classes::EXPANDED);
            body_height
        });
        let Some(body_height) = measured else {
            return;
        };
        self.set_shape(Shape::Expanding);
        log::debug!("Toast {} expanding to body height {}", self.id, body_height);

        let inner = self.clone();
        let settle = self
            .timers
            .set_timeout(EXPAND_TRANSITION_MS, move || inner.settle_expand());
        self.morph_tasks.borrow_mut().extend(settle);
    }

    fn settle_expand(&self) {
        let lifecycle = self.lifecycle.get();
        if lifecycle.is_dead() || lifecycle.shape != Shape::Expanding {
            return;
        }
        // Let the body follow content changes from now on
        let body_wrap = self.nodes.body_wrap;
        self.with_doc(|doc| doc.set_height(body_wrap, None));
        self.set_shape(Shape::Expanded);
    }

    /// Morph the card back into a pill.
    pub(super) fn collapse(self: &Rc<Self>) {
        let lifecycle = self.lifecycle.get();
        if lifecycle.is_dead() {
            log::debug!("Ignoring collapse of dismissed toast {}", self.id);
            return;
        }
        if !lifecycle.is_expanded() {
            return;
        }
        self.cancel_morph();

        let nodes = self.nodes;
        self.with_doc(|doc| {
            // Freeze the current height so the shrink has a numeric starting point
            let current = doc.offset_height(nodes.body_wrap);
            doc.set_height(nodes.body_wrap, Some(current));
            doc.remove_class(nodes.toast, Classes::EXPANDED);
            doc.add_class(nodes.toast, Classes::COLLAPSING);
        });
        self.set_shape(Shape::Collapsing);
        log::debug!("Toast {} collapsing", self.id);

        let inner = self.clone();
        let shrink = self
            .timers
            .set_timeout(self.collapse_transition_ms, move || inner.shrink_body());
        self.morph_tasks.borrow_mut().extend(shrink);
    }

    fn shrink_body(self: &Rc<Self>) {
        let lifecycle = self.lifecycle.get();
        if lifecycle.is_dead() || lifecycle.shape != Shape::Collapsing {
            return;
        }
        let body_wrap = self.nodes.body_wrap;
        self.with_doc(|doc| doc.set_height(body_wrap, Some(0.0)));

        let inner = self.clone();
        let resync = self.timers.request_frame(move || inner.restore_pill());
        let inner = self.clone();
        let settle = self
            .timers
            .set_timeout(COLLAPSE_SETTLE_MS, move || inner.settle_collapse());
        self.morph_tasks
            .borrow_mut()
            .extend(resync.into_iter().chain(settle));
    }

    fn restore_pill(&self) {
        let lifecycle = self.lifecycle.get();
        if lifecycle.is_dead() || lifecycle.shape != Shape::Collapsing {
            return;
        }
        let nodes = self.nodes;
        self.with_doc(|doc| {
            let width = doc.offset_width(nodes.header);
            doc.set_width(nodes.background, Some(width));
            doc.set_height(nodes.background, Some(HEADER_HEIGHT));
            doc.set_border_radius(nodes.background, PILL_RADIUS);
        });
    }

    fn settle_collapse(&self) {
        let lifecycle = self.lifecycle.get();
        if lifecycle.is_dead() || lifecycle.shape != Shape::Collapsing {
            return;
        }
        let toast = self.nodes.toast;
        self.with_doc(|doc| doc.remove_class(toast, Classes::COLLAPSING));
        self.set_shape(Shape::Collapsed);
    }

    /// Start leaving. The first call wins; later calls, from any source, do nothing.
    pub(super) fn dismiss(self: &Rc<Self>, reason: DismissReason) {
        if self.is_dead() {
            log::debug!("Toast {} already dismissed, ignoring {:?}", self.id, reason);
            return;
        }
        self.set_stage(Stage::Dismissing);
        log::debug!("Dismissing toast {} ({:?})", self.id, reason);

        self.morph_tasks.borrow_mut().clear();
        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            log::trace!("Toast {} dropped {} pending tasks", self.id, cancelled);
        }

        let nodes = self.nodes;
        self.with_doc(|doc| {
            self.cleanup_swipe(doc);

            let height = doc.offset_height(nodes.wrapper);
            doc.set_max_height(nodes.wrapper, Some(height));
            doc.update_style(nodes.wrapper, |s| s.overflow = Overflow::Clip);
            if reason != DismissReason::Swipe {
                doc.remove_class(nodes.toast, Classes::SHOW);
                doc.add_class(nodes.toast, Classes::EXIT);
            }
        });

        let inner = self.clone();
        self.timers.request_frame(move || {
            let wrapper = inner.nodes.wrapper;
            inner.with_doc(|doc| {
                doc.set_transitions(
                    wrapper,
                    vec![(
                        PropertyMask::MAX_HEIGHT,
                        Transition::expo_out(EXIT_COLLAPSE_MS),
                    )],
                );
                doc.set_max_height(wrapper, Some(0.0));
            });
        });

        let remove_after = match reason {
            DismissReason::Swipe => SWIPE_REMOVE_MS,
            DismissReason::Requested | DismissReason::Timeout => DISMISS_REMOVE_MS,
        };
        let inner = self.clone();
        self.timers
            .set_timeout(remove_after, move || inner.remove());
    }

    fn remove(&self) {
        let wrapper = self.nodes.wrapper;
        self.with_doc(|doc| doc.remove(wrapper));
        self.set_stage(Stage::Removed);
        log::debug!("Toast {} removed", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_projection() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), ToastState::Entering);

        // Shape changes made while entering stay hidden until shown
        lifecycle.shape = Shape::Expanding;
        assert_eq!(lifecycle.state(), ToastState::Entering);
        assert!(lifecycle.is_expanded());

        lifecycle.stage = Stage::Shown;
        assert_eq!(lifecycle.state(), ToastState::Expanding);

        lifecycle.stage = Stage::Dismissing;
        assert_eq!(lifecycle.state(), ToastState::Dismissing);
        assert!(lifecycle.is_dead());
        assert!(lifecycle.state().is_dead());
    }
}
