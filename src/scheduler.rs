//! Timers and frame callbacks on a virtual clock.
//!
//! The scheduler is the only source of asynchrony in the crate. It keeps two queues:
//!
//! - **Timers** fire once the clock reaches their due time, in due order (ties in
//!   scheduling order).
//! - **Frame callbacks** run on the next frame boundary, a multiple of the frame interval.
//!   A callback requested while a frame is running lands on the following frame, which is
//!   what makes [`TimerGroup::two_phase`] observe two distinct frames.
//!
//! Every task may belong to a [`GroupId`]; cancelling the group drops all of its pending
//! tasks at once. Toasts keep one group each so that dismissal invalidates every pending
//! continuation deterministically.
//!
//! The scheduler never advances on its own: [`Surface`](crate::Surface) pulls due work out
//! of it while driving the clock.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

pub type Task = Box<dyn FnOnce()>;

/// Handle to a pending timer or frame callback
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Identifies a set of tasks that can be cancelled together
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GroupId(u64);

struct Pending {
    id: TaskId,
    group: Option<GroupId>,
    task: Task,
}

struct SchedulerInner {
    now: u64,
    frame_interval: u64,
    next_id: u64,
    next_group: u64,
    timers: BTreeMap<(u64, TaskId), Pending>,
    frames: Vec<Pending>,
}

pub struct Scheduler {
    inner: RefCell<SchedulerInner>,
}

impl Scheduler {
    /// Create a scheduler whose frames fall every `frame_interval` milliseconds.
    pub fn new(frame_interval: u64) -> Self {
        Self {
            inner: RefCell::new(SchedulerInner {
                now: 0,
                frame_interval: frame_interval.max(1),
                next_id: 1,
                next_group: 1,
                timers: BTreeMap::new(),
                frames: Vec::new(),
            }),
        }
    }

    pub fn now(&self) -> u64 {
        self.inner.borrow().now
    }

    pub fn frame_interval(&self) -> u64 {
        self.inner.borrow().frame_interval
    }

    /// Move the clock forward; never backwards.
    pub(crate) fn set_now(&self, now: u64) {
        let mut inner = self.inner.borrow_mut();
        inner.now = inner.now.max(now);
    }

    pub fn new_group(&self) -> GroupId {
        let mut inner = self.inner.borrow_mut();
        let group = GroupId(inner.next_group);
        inner.next_group += 1;
        group
    }

    fn allocate(inner: &mut SchedulerInner) -> TaskId {
        let id = TaskId(inner.next_id);
        inner.next_id += 1;
        id
    }

    /// Run `task` once `delay_ms` have elapsed.
    pub fn set_timeout(&self, delay_ms: u64, group: Option<GroupId>, task: Task) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        let id = Self::allocate(&mut inner);
        let due = inner.now.saturating_add(delay_ms);
        inner.timers.insert((due, id), Pending { id, group, task });
        log::trace!("timer {:?} due at {}ms", id, due);
        id
    }

    /// Run `task` before the next repaint.
    pub fn request_frame(&self, group: Option<GroupId>, task: Task) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        let id = Self::allocate(&mut inner);
        inner.frames.push(Pending { id, group, task });
        id
    }

    /// Cancel a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&self, id: TaskId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.timers.len() + inner.frames.len();
        inner.timers.retain(|(_, task_id), _| *task_id != id);
        inner.frames.retain(|p| p.id != id);
        inner.timers.len() + inner.frames.len() != before
    }

    /// Cancel every pending task of `group`. Returns how many were dropped.
    pub fn cancel_group(&self, group: GroupId) -> usize {
        // Dropped closures may own handles whose drop re-enters the scheduler, so they are
        // released only after the borrow ends.
        let dropped: Vec<Pending> = {
            let mut inner = self.inner.borrow_mut();
            let mut dropped = Vec::new();
            let timers = std::mem::take(&mut inner.timers);
            for (key, pending) in timers {
                if pending.group == Some(group) {
                    dropped.push(pending);
                } else {
                    inner.timers.insert(key, pending);
                }
            }
            let (cancelled, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut inner.frames)
                .into_iter()
                .partition(|p| p.group == Some(group));
            inner.frames = kept;
            dropped.extend(cancelled);
            dropped
        };
        dropped.len()
    }

    pub fn pending_in_group(&self, group: GroupId) -> usize {
        let inner = self.inner.borrow();
        inner
            .timers
            .values()
            .chain(inner.frames.iter())
            .filter(|p| p.group == Some(group))
            .count()
    }

    pub fn has_pending(&self) -> bool {
        let inner = self.inner.borrow();
        !inner.timers.is_empty() || !inner.frames.is_empty()
    }

    /// Due time of the earliest timer
    pub fn next_timer_at(&self) -> Option<u64> {
        self.inner.borrow().timers.keys().next().map(|(due, _)| *due)
    }

    /// Time of the next frame, if any frame callback is waiting
    pub fn next_frame_at(&self) -> Option<u64> {
        let inner = self.inner.borrow();
        if inner.frames.is_empty() {
            return None;
        }
        Some(
            (inner.now / inner.frame_interval)
                .saturating_add(1)
                .saturating_mul(inner.frame_interval),
        )
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to its due time.
    pub(crate) fn pop_due_timer(&self, until: u64) -> Option<(TaskId, Task)> {
        let mut inner = self.inner.borrow_mut();
        let (&(due, id), _) = inner.timers.iter().next()?;
        if due > until {
            return None;
        }
        let pending = inner.timers.remove(&(due, id))?;
        inner.now = inner.now.max(due);
        Some((pending.id, pending.task))
    }

    /// Take every frame callback queued so far, moving the clock to the frame time.
    /// Callbacks requested while these run are queued for the following frame.
    pub(crate) fn take_frame(&self, at: u64) -> Vec<Task> {
        let mut inner = self.inner.borrow_mut();
        inner.now = inner.now.max(at);
        std::mem::take(&mut inner.frames)
            .into_iter()
            .map(|p| p.task)
            .collect()
    }
}

/// Timers and frame callbacks belonging to one owner, cancellable as a unit.
///
/// The group only holds a weak reference to its scheduler: tasks usually capture their
/// owner, and the owner holds its group. Once the scheduler is gone every method is a no-op.
#[derive(Clone)]
pub struct TimerGroup {
    scheduler: Weak<Scheduler>,
    id: GroupId,
}

impl TimerGroup {
    pub fn new(scheduler: &Rc<Scheduler>) -> Self {
        let id = scheduler.new_group();
        Self {
            scheduler: Rc::downgrade(scheduler),
            id,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Current scheduler time, or 0 once the scheduler has been dropped.
    pub fn now(&self) -> u64 {
        self.scheduler.upgrade().map_or(0, |s| s.now())
    }

    pub fn set_timeout(&self, delay_ms: u64, f: impl FnOnce() + 'static) -> Option<TaskId> {
        let scheduler = self.scheduler.upgrade()?;
        Some(scheduler.set_timeout(delay_ms, Some(self.id), Box::new(f)))
    }

    pub fn request_frame(&self, f: impl FnOnce() + 'static) -> Option<TaskId> {
        let scheduler = self.scheduler.upgrade()?;
        Some(scheduler.request_frame(Some(self.id), Box::new(f)))
    }

    /// Commit an initial state on the next frame, then a final state on the frame after.
    ///
    /// Applying a start state and an end state in the same frame lets the host skip the
    /// transition between them; the frame in between forces the start state to be laid
    /// out first.
    pub fn two_phase(
        &self,
        initial: impl FnOnce() + 'static,
        commit: impl FnOnce() + 'static,
    ) -> Option<TaskId> {
        let group = self.clone();
        self.request_frame(move || {
            initial();
            group.request_frame(commit);
        })
    }

    pub fn cancel(&self, id: TaskId) -> bool {
        self.scheduler.upgrade().is_some_and(|s| s.cancel(id))
    }

    /// Drop every pending task of this group
    pub fn cancel_all(&self) -> usize {
        self.scheduler
            .upgrade()
            .map_or(0, |s| s.cancel_group(self.id))
    }

    pub fn pending(&self) -> usize {
        self.scheduler
            .upgrade()
            .map_or(0, |s| s.pending_in_group(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn run_until(scheduler: &Scheduler, until: u64) {
        loop {
            let next_timer = scheduler.next_timer_at().filter(|t| *t <= until);
            let next_frame = scheduler.next_frame_at().filter(|t| *t <= until);
            match (next_timer, next_frame) {
                (Some(t), Some(f)) if f < t => {
                    for task in scheduler.take_frame(f) {
                        task();
                    }
                }
                (Some(_), _) => {
                    if let Some((_, task)) = scheduler.pop_due_timer(until) {
                        task();
                    }
                }
                (None, Some(f)) => {
                    for task in scheduler.take_frame(f) {
                        task();
                    }
                }
                (None, None) => break,
            }
        }
        scheduler.set_now(until);
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        let scheduler = Scheduler::new(16);
        let log = Rc::new(RefCell::new(Vec::new()));
        for (delay, tag) in [(30, "b"), (10, "a"), (30, "c")] {
            let log = log.clone();
            scheduler.set_timeout(delay, None, Box::new(move || log.borrow_mut().push(tag)));
        }
        run_until(&scheduler, 29);
        assert_eq!(*log.borrow(), vec!["a"]);
        run_until(&scheduler, 30);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cancel_group_drops_only_its_tasks() {
        let scheduler = Rc::new(Scheduler::new(16));
        let group = TimerGroup::new(&scheduler);
        let fired = Rc::new(Cell::new(0));

        let f = fired.clone();
        group.set_timeout(10, move || f.set(f.get() + 1));
        let f = fired.clone();
        group.request_frame(move || f.set(f.get() + 1));
        let f = fired.clone();
        scheduler.set_timeout(10, None, Box::new(move || f.set(f.get() + 10)));

        assert_eq!(group.pending(), 2);
        assert_eq!(group.cancel_all(), 2);
        run_until(&scheduler, 100);
        assert_eq!(fired.get(), 10);
    }

    #[test]
    fn test_two_phase_spans_two_frames() {
        let scheduler = Rc::new(Scheduler::new(16));
        let group = TimerGroup::new(&scheduler);
        let log = Rc::new(RefCell::new(Vec::new()));

        let (l1, l2) = (log.clone(), log.clone());
        let s1 = scheduler.clone();
        let s2 = scheduler.clone();
        group.two_phase(
            move || l1.borrow_mut().push(("initial", s1.now())),
            move || l2.borrow_mut().push(("commit", s2.now())),
        );

        run_until(&scheduler, 16);
        assert_eq!(*log.borrow(), vec![("initial", 16)]);
        run_until(&scheduler, 32);
        assert_eq!(*log.borrow(), vec![("initial", 16), ("commit", 32)]);
    }

    #[test]
    fn test_cancel_single_task() {
        let scheduler = Scheduler::new(16);
        let id = scheduler.set_timeout(5, None, Box::new(|| panic!("cancelled task ran")));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        run_until(&scheduler, 10);
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn test_far_timeout_saturates() {
        let scheduler = Scheduler::new(16);
        scheduler.set_now(100);
        scheduler.set_timeout(u64::MAX - 10, None, Box::new(|| {}));
        assert_eq!(scheduler.next_timer_at(), Some(u64::MAX));
    }

    #[test]
    fn test_group_does_not_keep_scheduler_alive() {
        let scheduler = Rc::new(Scheduler::new(16));
        let group = TimerGroup::new(&scheduler);
        let owner = Rc::new(());
        let captured = owner.clone();
        assert!(group.set_timeout(10, move || drop(captured)).is_some());
        assert_eq!(Rc::strong_count(&owner), 2);

        drop(scheduler);
        // The pending closure went with the scheduler
        assert_eq!(Rc::strong_count(&owner), 1);
        assert!(group.set_timeout(10, || {}).is_none());
        assert!(group.request_frame(|| {}).is_none());
        assert_eq!(group.cancel_all(), 0);
        assert_eq!(group.now(), 0);
    }
}
