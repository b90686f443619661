#![forbid(unsafe_code)]

//! Tick-driven repeating tasks.
//!
//! The host drives time by calling [`TickLoop::tick`]; views register a
//! repeating task through the [`TickScheduler`] capability and cancel it
//! when they close.
//!
//! # Firing rules
//!
//! - A task registered at tick `t` with period `p` fires at `t + p`,
//!   `t + 2p`, and so on. A period of 0 is treated as 1.
//! - A task never overlaps itself. If it is still running when it comes due
//!   again (the task drove the loop re-entrantly), that firing is skipped and
//!   counted rather than queued.
//! - Cancelling is immediate: a cancelled task never fires again, even later
//!   in the same tick. A task cancelled while running finishes its current
//!   call and is then dropped.
//! - No borrow of the loop is held while a task runs, so tasks may schedule,
//!   cancel, or tick.

use std::cell::RefCell;
use std::fmt;

/// Opaque handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    /// Raw numeric id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Capability to run a callback every `period` ticks.
pub trait TickScheduler {
    /// Register `task` to run every `period` ticks, starting `period` ticks
    /// from now.
    fn schedule_repeating(&self, period: u32, task: Box<dyn FnMut()>) -> TaskHandle;

    /// Cancel a task. Returns `true` if it was still active.
    fn cancel(&self, handle: TaskHandle) -> bool;
}

/// Firing counters for one task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Completed-or-started firings.
    pub fired: u64,
    /// Firings skipped because the task was still running.
    pub skipped: u64,
    /// Effective period in ticks.
    pub period: u32,
}

struct TaskEntry {
    handle: TaskHandle,
    period: u64,
    next_due: u64,
    /// `None` while the task is running.
    task: Option<Box<dyn FnMut()>>,
    cancelled: bool,
    fired: u64,
    skipped: u64,
}

#[derive(Default)]
struct LoopState {
    tick: u64,
    next_handle: u64,
    tasks: Vec<TaskEntry>,
}

impl LoopState {
    fn position(&self, handle: TaskHandle) -> Option<usize> {
        self.tasks.iter().position(|entry| entry.handle == handle)
    }
}

/// Single-threaded reference scheduler.
#[derive(Default)]
pub struct TickLoop {
    state: RefCell<LoopState>,
}

impl fmt::Debug for TickLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("TickLoop")
            .field("tick", &state.tick)
            .field("tasks", &state.tasks.len())
            .finish()
    }
}

impl TickLoop {
    /// An empty loop at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of ticks driven so far.
    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.state.borrow().tick
    }

    /// Tasks that have not been cancelled.
    #[must_use]
    pub fn active_tasks(&self) -> usize {
        self.state
            .borrow()
            .tasks
            .iter()
            .filter(|entry| !entry.cancelled)
            .count()
    }

    /// Returns `true` if `handle` is registered and not cancelled.
    #[must_use]
    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        let state = self.state.borrow();
        state
            .position(handle)
            .is_some_and(|at| !state.tasks[at].cancelled)
    }

    /// Counters for an active task.
    #[must_use]
    pub fn task_stats(&self, handle: TaskHandle) -> Option<TaskStats> {
        let state = self.state.borrow();
        let entry = &state.tasks[state.position(handle)?];
        Some(TaskStats {
            fired: entry.fired,
            skipped: entry.skipped,
            period: u32::try_from(entry.period).unwrap_or(u32::MAX),
        })
    }

    /// Advance one tick and run every task that is due. Returns the number
    /// of tasks that ran.
    pub fn tick(&self) -> usize {
        let (now, due) = {
            let mut state = self.state.borrow_mut();
            state.tick += 1;
            let now = state.tick;
            let due: Vec<TaskHandle> = state
                .tasks
                .iter()
                .filter(|entry| !entry.cancelled && entry.next_due <= now)
                .map(|entry| entry.handle)
                .collect();
            (now, due)
        };

        let mut ran = 0;
        for handle in due {
            let taken = {
                let mut state = self.state.borrow_mut();
                let Some(at) = state.position(handle) else {
                    continue;
                };
                let entry = &mut state.tasks[at];
                // A nested tick may already have fired it.
                if entry.cancelled || entry.next_due > now {
                    continue;
                }
                entry.next_due = now + entry.period;
                match entry.task.take() {
                    Some(task) => {
                        entry.fired += 1;
                        task
                    }
                    None => {
                        entry.skipped += 1;
                        tracing::debug!(
                            target: "pane.scheduler",
                            task = %handle,
                            tick = now,
                            "task still running; firing skipped"
                        );
                        continue;
                    }
                }
            };

            let mut task = taken;
            task();
            ran += 1;

            let dropped = {
                let mut state = self.state.borrow_mut();
                match state.position(handle) {
                    Some(at) if state.tasks[at].cancelled => {
                        state.tasks.remove(at);
                        Some(task)
                    }
                    Some(at) => {
                        state.tasks[at].task = Some(task);
                        None
                    }
                    None => Some(task),
                }
            };
            // The task may own views; drop it with no borrow held.
            drop(dropped);
        }
        ran
    }

    /// Drive `ticks` ticks. Returns the total number of task runs.
    pub fn advance(&self, ticks: u32) -> usize {
        (0..ticks).map(|_| self.tick()).sum()
    }
}

impl TickScheduler for TickLoop {
    fn schedule_repeating(&self, period: u32, task: Box<dyn FnMut()>) -> TaskHandle {
        let mut state = self.state.borrow_mut();
        let period = u64::from(period.max(1));
        state.next_handle += 1;
        let handle = TaskHandle(state.next_handle);
        let next_due = state.tick + period;
        state.tasks.push(TaskEntry {
            handle,
            period,
            next_due,
            task: Some(task),
            cancelled: false,
            fired: 0,
            skipped: 0,
        });
        tracing::debug!(
            target: "pane.scheduler",
            task = %handle,
            period,
            next_due,
            "task scheduled"
        );
        handle
    }

    fn cancel(&self, handle: TaskHandle) -> bool {
        let removed = {
            let mut state = self.state.borrow_mut();
            let Some(at) = state.position(handle) else {
                return false;
            };
            if state.tasks[at].cancelled {
                return false;
            }
            if state.tasks[at].task.is_some() {
                Some(state.tasks.remove(at))
            } else {
                // Running: `tick` drops it once the current call returns.
                state.tasks[at].cancelled = true;
                None
            }
        };
        drop(removed);
        tracing::debug!(target: "pane.scheduler", task = %handle, "task cancelled");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, Box<dyn FnMut()>) {
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        (count, Box::new(move || inner.set(inner.get() + 1)))
    }

    #[test]
    fn fires_every_period() {
        let ticks = TickLoop::new();
        let (count, task) = counter();
        let handle = ticks.schedule_repeating(5, task);

        ticks.advance(4);
        assert_eq!(count.get(), 0);
        ticks.tick();
        assert_eq!(count.get(), 1);
        ticks.advance(10);
        assert_eq!(count.get(), 3);
        assert_eq!(ticks.task_stats(handle).unwrap().fired, 3);
    }

    #[test]
    fn nested_tick_does_not_refire_later_tasks() {
        let ticks = Rc::new(TickLoop::new());
        let driver = Rc::downgrade(&ticks);
        let nested = Cell::new(false);
        ticks.schedule_repeating(
            1,
            Box::new(move || {
                if !nested.replace(true) {
                    if let Some(ticks) = driver.upgrade() {
                        ticks.tick();
                    }
                }
            }),
        );
        let (count, task) = counter();
        let later = ticks.schedule_repeating(1, task);

        ticks.tick();
        assert_eq!(count.get(), 1);
        ticks.tick();
        assert_eq!(count.get(), 2);
        assert_eq!(ticks.task_stats(later).unwrap().fired, 2);
    }

    #[test]
    fn first_firing_is_relative_to_registration() {
        let ticks = TickLoop::new();
        ticks.advance(3);
        let (count, task) = counter();
        ticks.schedule_repeating(2, task);
        ticks.tick();
        assert_eq!(count.get(), 0);
        ticks.tick();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn zero_period_is_clamped() {
        let ticks = TickLoop::new();
        let (count, task) = counter();
        let handle = ticks.schedule_repeating(0, task);
        ticks.advance(3);
        assert_eq!(count.get(), 3);
        assert_eq!(ticks.task_stats(handle).unwrap().period, 1);
    }

    #[test]
    fn cancel_stops_future_firings() {
        let ticks = TickLoop::new();
        let (count, task) = counter();
        let handle = ticks.schedule_repeating(1, task);
        ticks.tick();
        assert!(ticks.cancel(handle));
        assert!(!ticks.cancel(handle));
        ticks.advance(5);
        assert_eq!(count.get(), 1);
        assert!(!ticks.is_scheduled(handle));
        assert_eq!(ticks.active_tasks(), 0);
    }

    #[test]
    fn cancel_unknown_handle_is_false() {
        let ticks = TickLoop::new();
        assert!(!ticks.cancel(TaskHandle(42)));
    }

    #[test]
    fn task_cancelled_by_earlier_task_in_same_tick_does_not_fire() {
        let ticks = Rc::new(TickLoop::new());
        let victim_handle = Rc::new(Cell::new(None::<TaskHandle>));
        let (count, victim) = counter();

        let killer_ticks = Rc::clone(&ticks);
        let killer_target = Rc::clone(&victim_handle);
        ticks.schedule_repeating(
            1,
            Box::new(move || {
                if let Some(handle) = killer_target.get() {
                    killer_ticks.cancel(handle);
                }
            }),
        );
        victim_handle.set(Some(ticks.schedule_repeating(1, victim)));

        ticks.tick();
        assert_eq!(count.get(), 0);
        assert_eq!(ticks.active_tasks(), 1);
    }

    #[test]
    fn task_may_cancel_itself() {
        let ticks = Rc::new(TickLoop::new());
        let own = Rc::new(Cell::new(None::<TaskHandle>));
        let runs = Rc::new(Cell::new(0));

        let inner_ticks = Rc::clone(&ticks);
        let inner_own = Rc::clone(&own);
        let inner_runs = Rc::clone(&runs);
        let handle = ticks.schedule_repeating(
            1,
            Box::new(move || {
                inner_runs.set(inner_runs.get() + 1);
                if let Some(handle) = inner_own.get() {
                    assert!(inner_ticks.cancel(handle));
                }
            }),
        );
        own.set(Some(handle));

        ticks.advance(3);
        assert_eq!(runs.get(), 1);
        assert!(!ticks.is_scheduled(handle));
        assert_eq!(ticks.task_stats(handle), None);
    }

    #[test]
    fn reentrant_tick_skips_running_task() {
        let ticks = Rc::new(TickLoop::new());
        let runs = Rc::new(Cell::new(0));

        let inner_ticks = Rc::clone(&ticks);
        let inner_runs = Rc::clone(&runs);
        let handle = ticks.schedule_repeating(
            1,
            Box::new(move || {
                inner_runs.set(inner_runs.get() + 1);
                if inner_runs.get() == 1 {
                    inner_ticks.tick();
                }
            }),
        );

        ticks.tick();
        assert_eq!(runs.get(), 1);
        let stats = ticks.task_stats(handle).unwrap();
        assert_eq!(stats.fired, 1);
        assert_eq!(stats.skipped, 1);

        ticks.tick();
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn tasks_may_schedule_new_tasks() {
        let ticks = Rc::new(TickLoop::new());
        let (count, child) = counter();
        let child = RefCell::new(Some(child));

        let inner_ticks = Rc::clone(&ticks);
        ticks.schedule_repeating(
            1,
            Box::new(move || {
                if let Some(child) = child.borrow_mut().take() {
                    inner_ticks.schedule_repeating(1, child);
                }
            }),
        );

        ticks.tick();
        assert_eq!(count.get(), 0);
        assert_eq!(ticks.active_tasks(), 2);
        ticks.tick();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn tick_reports_runs() {
        let ticks = TickLoop::new();
        let (_a, task_a) = counter();
        let (_b, task_b) = counter();
        ticks.schedule_repeating(1, task_a);
        ticks.schedule_repeating(2, task_b);
        assert_eq!(ticks.tick(), 1);
        assert_eq!(ticks.tick(), 2);
        assert_eq!(ticks.advance(2), 3);
        assert_eq!(ticks.current_tick(), 4);
    }
}
