//! Swipe-to-dismiss.
//!
//! [`SwipeTracker`] holds the pure drag math: elastic resistance, visual feedback and the
//! commit decision. The binding half attaches pointer listeners to the toast node, applies
//! the feedback inline and either hands a committed swipe to the dismissal path or snaps the
//! toast back into place.

use std::rc::Rc;

use crate::animation::{TimingFunction, Transition};
use crate::constants::{
    SNAP_BACK_CLEANUP_MS, SNAP_BACK_MS, SWIPE_COMMIT_DELAY_MS, SWIPE_DISMISS_VELOCITY,
    SWIPE_DOWNWARD_DAMPING, SWIPE_EXIT_OPACITY_MS, SWIPE_EXIT_OVERSHOOT, SWIPE_EXIT_SCALE,
    SWIPE_EXIT_TRANSFORM_MS, SWIPE_FLICK_MIN_DISTANCE, SWIPE_OPACITY_FALLOFF,
    SWIPE_PROGRESS_DISTANCE, SWIPE_SCALE_FALLOFF, SWIPE_THRESHOLD,
};
use crate::event::{Event, EventKind};
use crate::scheduler::TaskId;
use crate::style::PropertyMask;
use crate::transform::Transform;
use crate::tree::{Classes, Document, ListenerId, Tag};

use super::lifecycle::DismissReason;
use super::ToastInner;

/// Displacement applied to the toast for a raw vertical pointer delta.
///
/// Upward movement follows the pointer; downward movement is damped.
pub fn resisted_offset(delta: f32) -> f32 {
    if delta < 0.0 {
        delta
    } else {
        delta * SWIPE_DOWNWARD_DAMPING
    }
}

/// Visual feedback for a drag offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeFeedback {
    pub offset: f32,
    /// 0 at rest, 1 once the toast is dragged far enough up
    pub progress: f32,
    pub opacity: f32,
    pub scale: f32,
}

impl SwipeFeedback {
    pub fn for_offset(offset: f32) -> Self {
        let progress = (offset.min(0.0).abs() / SWIPE_PROGRESS_DISTANCE).min(1.0);
        Self {
            offset,
            progress,
            opacity: 1.0 - progress * SWIPE_OPACITY_FALLOFF,
            scale: 1.0 - progress * SWIPE_SCALE_FALLOFF,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::translate_y(self.offset).with_scale(self.scale)
    }
}

/// Whether a drag that ended at `offset` after `elapsed_ms` dismisses the toast.
///
/// Far enough up always commits; a shorter upward flick commits when fast enough. A zero
/// duration counts as infinitely fast.
pub fn should_commit(offset: f32, elapsed_ms: u64) -> bool {
    let velocity = offset.abs() / elapsed_ms as f32;
    offset < -SWIPE_THRESHOLD
        || (offset < -SWIPE_FLICK_MIN_DISTANCE && velocity > SWIPE_DISMISS_VELOCITY)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeOutcome {
    /// Fly out and dismiss, starting from `offset`
    Commit { offset: f32 },
    /// Return to rest
    SnapBack,
}

/// State of one drag session. Reset on every pointer-down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SwipeTracker {
    dragging: bool,
    start_y: f32,
    start_time: u64,
    offset: f32,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, y: f32, now: u64) {
        *self = Self {
            dragging: true,
            start_y: y,
            start_time: now,
            offset: 0.0,
        };
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Follow the pointer to `y`. Returns `None` when no drag is in progress.
    pub fn update(&mut self, y: f32) -> Option<SwipeFeedback> {
        if !self.dragging {
            return None;
        }
        self.offset = resisted_offset(y - self.start_y);
        Some(SwipeFeedback::for_offset(self.offset))
    }

    /// End the drag at `now`. Returns `None` when no drag is in progress.
    pub fn finish(&mut self, now: u64) -> Option<SwipeOutcome> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        let elapsed = now.saturating_sub(self.start_time);
        Some(if should_commit(self.offset, elapsed) {
            SwipeOutcome::Commit {
                offset: self.offset,
            }
        } else {
            SwipeOutcome::SnapBack
        })
    }

    /// Abort the drag. Returns whether one was in progress.
    pub fn cancel(&mut self) -> bool {
        std::mem::replace(&mut self.dragging, false)
    }
}

/// Listeners and pending snap-back of a toast with swipe enabled
pub(super) struct SwipeBinding {
    tracker: SwipeTracker,
    listeners: Vec<ListenerId>,
    snap_back: Option<PendingSnapBack>,
}

struct PendingSnapBack {
    fallback: Option<TaskId>,
    listener: Option<ListenerId>,
}

impl ToastInner {
    /// Attach the pointer listeners that make the toast swipeable.
    pub(super) fn attach_swipe(self: &Rc<Self>, doc: &mut Document) {
        let toast = self.nodes.toast;
        doc.add_class(toast, Classes::SWIPE_ENABLED);
        doc.update_style(toast, |s| s.touch_panning = false);

        let handlers: [(EventKind, fn(&Rc<ToastInner>, &Event)); 4] = [
            (EventKind::PointerDown, ToastInner::on_pointer_down),
            (EventKind::PointerMove, ToastInner::on_pointer_move),
            (EventKind::PointerUp, ToastInner::on_pointer_up),
            (EventKind::PointerCancel, ToastInner::on_pointer_cancel),
        ];
        let listeners = handlers
            .into_iter()
            .filter_map(|(kind, handler)| {
                let inner = self.clone();
                let callback = Rc::new(move |e: &Event| handler(&inner, e));
                doc.add_listener(toast, kind, false, callback)
            })
            .collect();

        *self.swipe.borrow_mut() = Some(SwipeBinding {
            tracker: SwipeTracker::new(),
            listeners,
            snap_back: None,
        });
    }

    /// Remove every gesture listener. Runs when dismissal begins.
    pub(super) fn cleanup_swipe(&self, doc: &mut Document) {
        let Some(binding) = self.swipe.borrow_mut().take() else {
            return;
        };
        let toast = self.nodes.toast;
        for listener in binding.listeners {
            doc.remove_listener(toast, listener);
        }
        if let Some(pending) = binding.snap_back {
            if let Some(fallback) = pending.fallback {
                self.timers.cancel(fallback);
            }
            if let Some(listener) = pending.listener {
                doc.remove_listener(toast, listener);
            }
        }
        doc.remove_class(toast, Classes::SWIPING);
    }

    fn with_tracker<R>(&self, f: impl FnOnce(&mut SwipeTracker) -> R) -> Option<R> {
        self.swipe
            .borrow_mut()
            .as_mut()
            .map(|binding| f(&mut binding.tracker))
    }

    fn on_pointer_down(self: &Rc<Self>, event: &Event) {
        if self.is_dead() {
            return;
        }
        let Some(pointer) = event.pointer().copied() else {
            return;
        };
        let toast = self.nodes.toast;
        let on_button = self
            .with_doc(|doc| {
                doc.closest(pointer.target, |tag, classes| {
                    tag == Tag::Button || classes.contains(Classes::ACTION)
                })
                .is_some()
            })
            .unwrap_or(true);
        if on_button {
            return;
        }

        let now = self.now();
        if self
            .with_tracker(|tracker| tracker.begin(pointer.y, now))
            .is_none()
        {
            return;
        }
        let pending = self
            .swipe
            .borrow_mut()
            .as_mut()
            .and_then(|binding| binding.snap_back.take());

        self.with_doc(|doc| {
            if let Some(pending) = pending {
                if let Some(fallback) = pending.fallback {
                    self.timers.cancel(fallback);
                }
                if let Some(listener) = pending.listener {
                    doc.remove_listener(toast, listener);
                }
            }
            doc.add_class(toast, Classes::SWIPING);
            doc.remove_class(toast, Classes::SNAP_BACK);
            doc.set_pointer_capture(pointer.pointer_id, toast);
        });
        log::trace!("Toast {} swipe started at y={}", self.id, pointer.y);
    }

    fn on_pointer_move(self: &Rc<Self>, event: &Event) {
        let Some(pointer) = event.pointer() else {
            return;
        };
        let Some(feedback) = self.with_tracker(|tracker| tracker.update(pointer.y)).flatten()
        else {
            return;
        };
        log::trace!(
            "Toast {} swipe offset {} (progress {})",
            self.id,
            feedback.offset,
            feedback.progress
        );

        let toast = self.nodes.toast;
        self.with_doc(|doc| {
            doc.set_transitions(toast, Vec::new());
            doc.set_transform(toast, feedback.transform());
            doc.set_opacity(toast, feedback.opacity);
        });
    }

    fn on_pointer_up(self: &Rc<Self>, _event: &Event) {
        let now = self.now();
        let Some(outcome) = self.with_tracker(|tracker| tracker.finish(now)).flatten() else {
            return;
        };
        let toast = self.nodes.toast;
        self.with_doc(|doc| doc.remove_class(toast, Classes::SWIPING));

        match outcome {
            SwipeOutcome::Commit { offset } => self.commit_swipe(offset),
            SwipeOutcome::SnapBack => self.snap_back(),
        }
    }

    fn on_pointer_cancel(self: &Rc<Self>, _event: &Event) {
        if !self
            .with_tracker(|tracker| tracker.cancel())
            .unwrap_or(false)
        {
            return;
        }
        let toast = self.nodes.toast;
        self.with_doc(|doc| doc.remove_class(toast, Classes::SWIPING));
        self.snap_back();
    }

    fn commit_swipe(self: &Rc<Self>, offset: f32) {
        log::debug!("Toast {} swiped away at offset {}", self.id, offset);
        let toast = self.nodes.toast;
        self.with_doc(|doc| {
            doc.set_transitions(
                toast,
                vec![
                    (
                        PropertyMask::TRANSFORM,
                        Transition::expo_out(SWIPE_EXIT_TRANSFORM_MS),
                    ),
                    (
                        PropertyMask::OPACITY,
                        Transition::new(SWIPE_EXIT_OPACITY_MS, TimingFunction::Ease),
                    ),
                ],
            );
            doc.set_transform(
                toast,
                Transform::translate_y(offset - SWIPE_EXIT_OVERSHOOT).with_scale(SWIPE_EXIT_SCALE),
            );
            doc.set_opacity(toast, 0.0);
            doc.update_style(toast, |s| s.pointer_events = false);
        });

        // The toast stays alive until this fires; a pending expand may still morph it meanwhile.
        let inner = self.clone();
        self.timers.set_timeout(SWIPE_COMMIT_DELAY_MS, move || {
            inner.dismiss(DismissReason::Swipe)
        });
    }

    fn snap_back(self: &Rc<Self>) {
        let toast = self.nodes.toast;
        let listener = self
            .with_doc(|doc| {
                doc.add_class(toast, Classes::SNAP_BACK);
                doc.set_transitions(
                    toast,
                    vec![(
                        PropertyMask::TRANSFORM | PropertyMask::OPACITY,
                        Transition::expo_out(SNAP_BACK_MS),
                    )],
                );
                doc.set_transform(toast, Transform::IDENTITY);
                doc.set_opacity(toast, 1.0);

                let inner = self.clone();
                doc.add_listener(
                    toast,
                    EventKind::TransitionEnd,
                    false,
                    Rc::new(move |event: &Event| {
                        // transitionend bubbles up from the background and body
                        if event.target() == inner.nodes.toast {
                            inner.finish_snap_back();
                        }
                    }),
                )
            })
            .flatten();

        let inner = self.clone();
        let fallback = self
            .timers
            .set_timeout(SNAP_BACK_CLEANUP_MS, move || inner.finish_snap_back());

        if let Some(binding) = self.swipe.borrow_mut().as_mut() {
            binding.snap_back = Some(PendingSnapBack { fallback, listener });
        }
    }

    /// Clear the snap-back overrides; runs once, on whichever of transitionend and the
    /// fallback timer comes first.
    fn finish_snap_back(&self) {
        let Some(pending) = self
            .swipe
            .borrow_mut()
            .as_mut()
            .and_then(|binding| binding.snap_back.take())
        else {
            return;
        };
        if let Some(fallback) = pending.fallback {
            self.timers.cancel(fallback);
        }

        let toast = self.nodes.toast;
        self.with_doc(|doc| {
            if let Some(listener) = pending.listener {
                doc.remove_listener(toast, listener);
            }
            doc.remove_class(toast, Classes::SNAP_BACK);
            doc.set_transitions(toast, Vec::new());
            doc.set_transform(toast, Transform::IDENTITY);
            doc.set_opacity(toast, 1.0);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downward_drag_is_damped() {
        assert_eq!(resisted_offset(-40.0), -40.0);
        assert_eq!(resisted_offset(50.0), 10.0);
    }

    #[test]
    fn test_feedback_saturates() {
        let rest = SwipeFeedback::for_offset(10.0);
        assert_eq!(rest.progress, 0.0);
        assert_eq!(rest.opacity, 1.0);
        assert_eq!(rest.scale, 1.0);

        let half = SwipeFeedback::for_offset(-75.0);
        assert!((half.progress - 0.5).abs() < 1e-6);
        assert!((half.opacity - 0.7).abs() < 1e-6);
        assert!((half.scale - 0.96).abs() < 1e-6);

        let far = SwipeFeedback::for_offset(-400.0);
        assert_eq!(far.progress, 1.0);
        assert!((far.opacity - 0.4).abs() < 1e-6);
        assert!((far.scale - 0.92).abs() < 1e-6);
    }

    #[test]
    fn test_commit_thresholds() {
        assert!(should_commit(-61.0, 10_000));
        assert!(!should_commit(-59.0, 200));
        assert!(!should_commit(-60.0, 10_000));
    }

    #[test]
    fn test_flick_thresholds() {
        assert!(should_commit(-25.0, 40));
        assert!(!should_commit(-25.0, 60));
        assert!(!should_commit(-19.0, 1));
        // Only upward flicks count
        assert!(!should_commit(25.0, 1));
    }

    #[test]
    fn test_zero_duration_counts_as_fast() {
        assert!(should_commit(-21.0, 0));
        assert!(!should_commit(0.0, 0));
    }

    #[test]
    fn test_tracker_session() {
        let mut tracker = SwipeTracker::new();
        assert!(tracker.update(10.0).is_none());
        assert!(tracker.finish(5).is_none());

        tracker.begin(100.0, 1_000);
        let feedback = tracker.update(40.0).unwrap();
        assert_eq!(feedback.offset, -60.0);
        tracker.update(39.0);
        assert_eq!(
            tracker.finish(2_000),
            Some(SwipeOutcome::Commit { offset: -61.0 })
        );
        assert!(!tracker.is_dragging());

        tracker.begin(100.0, 0);
        tracker.update(160.0);
        assert_eq!(tracker.offset(), 12.0);
        assert!(tracker.cancel());
        assert!(!tracker.cancel());
    }
}
