//! Fixed-delay deferrals driven by the host's clock.
//!
//! The field never sleeps or spawns. Work that must happen "after the current
//! turn and a short delay" is queued here, and the host advances the clock
//! with [`crate::field::EmailField::advance`]. Due tasks run in order of their
//! due time, then in the order they were scheduled. There is no cancellation;
//! a task that is no longer relevant checks the field's state and does
//! nothing.

use std::time::Duration;

use crate::domain::EmailEntry;

/// Delay before re-checking whether `maxEmails` has arrived.
pub const INITIAL_RECHECK_DELAY: Duration = Duration::from_millis(250);

/// Delay before the help popover starts listening for dismissal.
pub const DISMISS_ATTACH_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Apply stashed initial values if they are still pending.
    RecheckInitial,
    /// Put back the collection captured before a failed `validate()`.
    RestoreSnapshot(Vec<EmailEntry>),
    /// Start listening for outside clicks and Escape.
    AttachDismissListeners,
}

#[derive(Debug)]
struct Scheduled {
    due: Duration,
    sequence: u64,
    task: Task,
}

#[derive(Debug, Default)]
pub struct Timers {
    now: Duration,
    next_sequence: u64,
    pending: Vec<Scheduled>,
}

impl Timers {
    pub fn schedule(&mut self, delay: Duration, task: Task) {
        tracing::trace!(?task, ?delay, "scheduling deferred task");
        self.pending.push(Scheduled {
            due: self.now.saturating_add(delay),
            sequence: self.next_sequence,
            task,
        });
        self.next_sequence += 1;
    }

    /// Moves the clock forward by `elapsed`.
    pub fn advance(&mut self, elapsed: Duration) {
        self.now = self.now.saturating_add(elapsed);
    }

    /// Removes and returns the earliest task that is due, if any.
    pub fn pop_due(&mut self) -> Option<Task> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, scheduled)| scheduled.due <= self.now)
            .min_by_key(|(_, scheduled)| (scheduled.due, scheduled.sequence))
            .map(|(index, _)| index)?;
        Some(self.pending.swap_remove(index).task)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn contains(&self, task: &Task) -> bool {
        self.pending.iter().any(|scheduled| &scheduled.task == task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_wait_for_their_delay() {
        let mut timers = Timers::default();
        timers.schedule(INITIAL_RECHECK_DELAY, Task::RecheckInitial);

        timers.advance(Duration::from_millis(249));
        assert_eq!(timers.pop_due(), None);

        timers.advance(Duration::from_millis(1));
        assert_eq!(timers.pop_due(), Some(Task::RecheckInitial));
        assert!(timers.is_empty());
    }

    #[test]
    fn due_tasks_run_by_due_time_then_schedule_order() {
        let mut timers = Timers::default();
        timers.schedule(Duration::from_millis(20), Task::RecheckInitial);
        timers.schedule(Duration::ZERO, Task::AttachDismissListeners);
        timers.schedule(Duration::ZERO, Task::RestoreSnapshot(Vec::new()));

        timers.advance(Duration::from_millis(50));
        assert_eq!(timers.pop_due(), Some(Task::AttachDismissListeners));
        assert_eq!(timers.pop_due(), Some(Task::RestoreSnapshot(Vec::new())));
        assert_eq!(timers.pop_due(), Some(Task::RecheckInitial));
        assert_eq!(timers.pop_due(), None);
    }

    #[test]
    fn contains_reports_pending_tasks() {
        let mut timers = Timers::default();
        assert!(!timers.contains(&Task::RecheckInitial));
        timers.schedule(INITIAL_RECHECK_DELAY, Task::RecheckInitial);
        assert!(timers.contains(&Task::RecheckInitial));
    }

    #[test]
    fn huge_clock_jumps_saturate() {
        let mut timers = Timers::default();
        timers.advance(Duration::MAX);
        timers.advance(Duration::from_secs(1));
        timers.schedule(DISMISS_ATTACH_DELAY, Task::AttachDismissListeners);

        assert_eq!(timers.pop_due(), Some(Task::AttachDismissListeners));
    }
}
