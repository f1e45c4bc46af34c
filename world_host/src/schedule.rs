//! Host task scheduling: "run this every N ticks" and "run this once".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Handle for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

/// A unit of work handed to the scheduler.
pub type Task = Box<dyn FnMut() + Send>;

/// Scheduling primitives a host offers.
pub trait TaskScheduler {
    /// Run `task` after `delay` ticks, then every `period` ticks (period 0 is treated as 1).
    fn run_timer(&mut self, delay: u64, period: u64, task: Task) -> TaskId;

    /// Run `task` once, on the next tick.
    fn run_once(&mut self, task: Task);

    /// Cancel a timer. Returns false if it was not scheduled.
    fn cancel(&mut self, id: TaskId) -> bool;
}

struct Timer {
    next_run: u64,
    period: u64,
    task: Task,
}

/// A manually advanced scheduler. Each `advance` is one host tick.
#[derive(Default)]
pub struct TickLoop {
    current_tick: u64,
    next_id: u64,
    timers: BTreeMap<TaskId, Timer>,
    pending: Vec<Task>,
}

impl TickLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks elapsed so far.
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Number of live timers.
    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Advance one tick: one-shot tasks first, then every timer that is due, in id order.
    pub fn advance(&mut self) {
        self.current_tick += 1;

        for mut task in std::mem::take(&mut self.pending) {
            task();
        }

        let now = self.current_tick;
        for timer in self.timers.values_mut() {
            if timer.next_run <= now {
                (timer.task)();
                timer.next_run = now + timer.period;
            }
        }
    }

    /// Advance several ticks.
    pub fn advance_by(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.advance();
        }
    }
}

impl TaskScheduler for TickLoop {
    fn run_timer(&mut self, delay: u64, period: u64, task: Task) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.timers.insert(
            id,
            Timer {
                next_run: self.current_tick + delay.max(1),
                period: period.max(1),
                task,
            },
        );
        id
    }

    fn run_once(&mut self, task: Task) {
        self.pending.push(task);
    }

    fn cancel(&mut self, id: TaskId) -> bool {
        self.timers.remove(&id).is_some()
    }
}

impl std::fmt::Debug for TickLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickLoop")
            .field("current_tick", &self.current_tick)
            .field("timers", &self.timers.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_timer_runs_every_period() {
        let counter = Arc::new(AtomicU64::new(0));
        let seen = counter.clone();

        let mut tick_loop = TickLoop::new();
        tick_loop.run_timer(
            0,
            5,
            Box::new(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tick_loop.advance_by(20);
        // ticks 1, 6, 11, 16
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_run_once_fires_a_single_time() {
        let counter = Arc::new(AtomicU64::new(0));
        let seen = counter.clone();

        let mut tick_loop = TickLoop::new();
        tick_loop.run_once(Box::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        tick_loop.advance_by(3);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_timer() {
        let counter = Arc::new(AtomicU64::new(0));
        let seen = counter.clone();

        let mut tick_loop = TickLoop::new();
        let id = tick_loop.run_timer(
            0,
            1,
            Box::new(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tick_loop.advance_by(2);
        assert!(tick_loop.cancel(id));
        assert!(!tick_loop.cancel(id));
        tick_loop.advance_by(2);

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(tick_loop.timer_count(), 0);
    }
}
