//! The rendering surface toasts live on.
//!
//! A [`Surface`] bundles the retained [`Document`], the [`Scheduler`] and the clock that
//! drives both. The embedder owns the surface and is responsible for three things:
//!
//! - advancing time with [`Surface::advance`] / [`Surface::advance_to`], which runs due
//!   timers, frame callbacks and `transitionend` notifications in time order;
//! - delivering input with [`Surface::dispatch`] (or the pointer helpers);
//! - painting, by reading computed styles out of the document each frame.
//!
//! ```ignore
//! let surface = Surface::new(SurfaceConfig::new().viewport_width(390.0));
//! let toaster = Toaster::new(surface.clone());
//! toaster.create(ToastOptions::new().title("Saved"));
//! surface.advance(1_000);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::constants::{DEFAULT_FRAME_INTERVAL_MS, DEFAULT_VIEWPORT_WIDTH};
use crate::event::{Event, PointerEvent};
use crate::scheduler::Scheduler;
use crate::text_measurer::{FixedAdvanceMeasurer, TextMeasurer};
use crate::tree::{Document, NodeId};

/// Configuration for a [`Surface`].
///
/// ```ignore
/// SurfaceConfig::new()
///     .viewport_width(390.0)
///     .frame_interval_ms(8)
///     .text_measurer(FixedAdvanceMeasurer::new(0.6))
/// ```
pub struct SurfaceConfig {
    /// Width of the document body in logical pixels.
    pub viewport_width: f32,
    /// Time between two frames in milliseconds.
    pub frame_interval_ms: u64,
    /// Measures text for layout queries.
    pub text_measurer: Box<dyn TextMeasurer>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            text_measurer: Box::new(FixedAdvanceMeasurer::default()),
        }
    }
}

impl SurfaceConfig {
    /// Create a new surface configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the width of the document body.
    pub fn viewport_width(mut self, width: f32) -> Self {
        self.viewport_width = width;
        self
    }

    /// Set the frame interval.
    pub fn frame_interval_ms(mut self, interval: u64) -> Self {
        self.frame_interval_ms = interval;
        self
    }

    /// Set the text measurer used by layout.
    pub fn text_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.text_measurer = Box::new(measurer);
        self
    }
}

pub struct Surface {
    document: RefCell<Document>,
    scheduler: Rc<Scheduler>,
}

impl Surface {
    pub fn new(config: SurfaceConfig) -> Rc<Self> {
        log::debug!(
            "Creating surface: viewport {}px, frame interval {}ms",
            config.viewport_width,
            config.frame_interval_ms
        );
        Rc::new(Self {
            document: RefCell::new(Document::new(
                config.viewport_width,
                config.text_measurer,
            )),
            scheduler: Rc::new(Scheduler::new(config.frame_interval_ms)),
        })
    }

    pub fn scheduler(&self) -> &Rc<Scheduler> {
        &self.scheduler
    }

    /// Current time in milliseconds since the surface was created.
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    /// Read the document. Must not be called re-entrantly from inside `f`.
    pub fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.document.borrow())
    }

    /// Mutate the document. Must not be called re-entrantly from inside `f`.
    pub fn with_document_mut<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut self.document.borrow_mut())
    }

    fn set_clock(&self, at: u64) {
        self.scheduler.set_now(at);
        self.document.borrow_mut().set_now(self.scheduler.now());
    }

    /// Advance the clock by `ms`, running everything that falls due on the way.
    pub fn advance(&self, ms: u64) {
        self.advance_to(self.now().saturating_add(ms));
    }

    /// Advance the clock to `target`, running everything that falls due on the way.
    ///
    /// Work is processed in time order. At equal times, transition ends come first, then
    /// timers, then frame callbacks.
    pub fn advance_to(&self, target: u64) {
        loop {
            let timer = self.scheduler.next_timer_at();
            let frame = self.scheduler.next_frame_at();
            let transition = self.document.borrow().next_transition_end();

            let Some(at) = [transition, timer, frame]
                .into_iter()
                .flatten()
                .min()
                .filter(|at| *at <= target)
            else {
                break;
            };

            if transition == Some(at) {
                self.set_clock(at);
                self.flush_transitions();
            } else if timer == Some(at) {
                if let Some((id, task)) = self.scheduler.pop_due_timer(at) {
                    self.set_clock(at);
                    log::trace!("{}ms: timer {:?}", at, id);
                    task();
                }
            } else {
                let tasks = self.scheduler.take_frame(at);
                self.set_clock(at);
                log::trace!("{}ms: frame with {} callbacks", at, tasks.len());
                for task in tasks {
                    task();
                }
            }
        }
        self.set_clock(target);
        self.flush_transitions();
    }

    /// Advance until no timer, frame callback or transition is pending, or until
    /// `limit_ms` have passed. Returns true if the surface went idle.
    pub fn run_until_idle(&self, limit_ms: u64) -> bool {
        let deadline = self.now().saturating_add(limit_ms);
        loop {
            let next = [
                self.scheduler.next_timer_at(),
                self.scheduler.next_frame_at(),
                self.document.borrow().next_transition_end(),
            ]
            .into_iter()
            .flatten()
            .min();
            match next {
                None => return true,
                Some(at) if at > deadline => {
                    self.advance_to(deadline);
                    return false;
                }
                Some(at) => self.advance_to(at.max(self.now())),
            }
        }
    }

    fn flush_transitions(&self) {
        let finished = self.document.borrow_mut().take_finished_transitions();
        for (target, property) in finished {
            self.dispatch(Event::TransitionEnd { target, property });
        }
    }

    /// Deliver an event and bubble it from its target up to the body.
    ///
    /// Pointer events honour pointer capture and fall through nodes whose
    /// `pointer_events` is off. Returns true if any listener ran.
    pub fn dispatch(&self, event: Event) -> bool {
        let (event, path) = {
            let mut doc = self.document.borrow_mut();
            let routed = if event.is_pointer_routed() {
                let captured = event
                    .pointer()
                    .and_then(|p| doc.pointer_capture(p.pointer_id));
                captured
                    .or_else(|| doc.pointer_target(event.target()))
                    .map(|target| event.with_target(target))
            } else {
                doc.contains(event.target()).then(|| event.clone())
            };

            if let Event::PointerUp(p) | Event::PointerCancel(p) = &event {
                doc.release_pointer_capture(p.pointer_id);
            }

            let Some(routed) = routed else {
                return false;
            };
            let mut path = Vec::new();
            let mut cursor = Some(routed.target());
            while let Some(node) = cursor {
                path.push(node);
                cursor = doc.parent(node);
            }
            (routed, path)
        };

        let mut handled = false;
        for node in path {
            let listeners = self.document.borrow().listeners_for(node, event.kind());
            for (id, once, callback) in listeners {
                // A listener removed by an earlier one in this dispatch does not run
                if !self.document.borrow().has_listener(node, id) {
                    continue;
                }
                if once {
                    self.document.borrow_mut().remove_listener(node, id);
                }
                callback(&event);
                handled = true;
            }
        }
        handled
    }

    pub fn pointer_down(&self, pointer_id: u32, x: f32, y: f32, target: NodeId) -> bool {
        self.dispatch(Event::PointerDown(PointerEvent::new(pointer_id, x, y, target)))
    }

    pub fn pointer_move(&self, pointer_id: u32, x: f32, y: f32, target: NodeId) -> bool {
        self.dispatch(Event::PointerMove(PointerEvent::new(pointer_id, x, y, target)))
    }

    pub fn pointer_up(&self, pointer_id: u32, x: f32, y: f32, target: NodeId) -> bool {
        self.dispatch(Event::PointerUp(PointerEvent::new(pointer_id, x, y, target)))
    }

    pub fn pointer_cancel(&self, pointer_id: u32, x: f32, y: f32, target: NodeId) -> bool {
        self.dispatch(Event::PointerCancel(PointerEvent::new(
            pointer_id, x, y, target,
        )))
    }

    pub fn click(&self, target: NodeId) -> bool {
        self.dispatch(Event::Click { target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::tree::Tag;
    use std::cell::Cell;

    #[test]
    fn test_frames_follow_the_interval() {
        let surface = Surface::new(SurfaceConfig::new().frame_interval_ms(10));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = surface.clone();
        let log = seen.clone();
        surface.scheduler().request_frame(
            None,
            Box::new(move || {
                log.borrow_mut().push(s.now());
                let s2 = s.clone();
                let log2 = log.clone();
                s.scheduler()
                    .request_frame(None, Box::new(move || log2.borrow_mut().push(s2.now())));
            }),
        );

        surface.advance(35);
        assert_eq!(*seen.borrow(), vec![10, 20]);
        assert_eq!(surface.now(), 35);
    }

    #[test]
    fn test_dispatch_bubbles_and_honours_once() {
        let surface = Surface::new(SurfaceConfig::new());
        let hits = Rc::new(Cell::new(0));
        let (outer, inner) = surface.with_document_mut(|doc| {
            let outer = doc.create_element(Tag::Div);
            let inner = doc.create_element(Tag::Button);
            doc.append_child(doc.body(), outer);
            doc.append_child(outer, inner);
            let h = hits.clone();
            doc.add_listener(
                outer,
                EventKind::Click,
                true,
                Rc::new(move |_: &Event| h.set(h.get() + 1)),
            );
            (outer, inner)
        });

        assert!(surface.click(inner));
        assert!(!surface.click(inner));
        assert_eq!(hits.get(), 1);
        assert_eq!(surface.with_document(|doc| doc.listener_count(outer)), 0);
    }

    #[test]
    fn test_pointer_capture_redirects_until_release() {
        let surface = Surface::new(SurfaceConfig::new());
        let moves = Rc::new(Cell::new(0));
        let (owner, elsewhere) = surface.with_document_mut(|doc| {
            let owner = doc.create_element(Tag::Div);
            let elsewhere = doc.create_element(Tag::Div);
            doc.append_child(doc.body(), owner);
            doc.append_child(doc.body(), elsewhere);
            let m = moves.clone();
            doc.add_listener(
                owner,
                EventKind::PointerMove,
                false,
                Rc::new(move |_: &Event| m.set(m.get() + 1)),
            );
            doc.set_pointer_capture(1, owner);
            (owner, elsewhere)
        });

        surface.pointer_move(1, 0.0, 0.0, elsewhere);
        surface.pointer_up(1, 0.0, 0.0, elsewhere);
        surface.pointer_move(1, 0.0, 0.0, elsewhere);
        assert_eq!(moves.get(), 1);
        assert!(surface.with_document(|doc| doc.pointer_capture(1)).is_none());
        let _ = owner;
    }

    #[test]
    fn test_run_until_idle_drains_work() {
        let surface = Surface::new(SurfaceConfig::new());
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        surface
            .scheduler()
            .set_timeout(250, None, Box::new(move || f.set(true)));
        assert!(surface.run_until_idle(1_000));
        assert!(fired.get());
        assert_eq!(surface.now(), 250);
    }
}
