//! Scheduled Task Queue
//!
//! Non-blocking timers for the single-threaded update loop. A task is
//! stored with the tick it becomes due; the session fires due tasks once
//! per tick instead of ever sleeping. Entries are stamped with the level
//! epoch current at schedule time, so a task aimed at a level that has
//! since been replaced is retired instead of fired.

use serde::{Serialize, Deserialize};

/// Handle to a scheduled task, usable for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

/// Whether a task survives a level change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerScope {
    /// Retired when the level epoch advances. Image reverts and deal
    /// follow-ups target the level that scheduled them.
    Level,
    /// Fires regardless of level changes. Warning text is session-wide.
    Session,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Entry<T> {
    id: TimerId,
    due_tick: u32,
    scope: TimerScope,
    epoch: u64,
    task: T,
}

/// Due-tick ordered task queue with level-epoch stamping.
///
/// Epoch stamping is the whole invalidation mechanism: `bump_epoch`
/// never touches stored entries, it only moves the live epoch forward.
/// A level-scoped entry whose stamp no longer matches is dead weight
/// that `fire_due` discards when its deadline passes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimerQueue<T> {
    next_id: u64,
    epoch: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue at epoch zero.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            epoch: 0,
            entries: Vec::new(),
        }
    }

    /// Schedule `task` to fire `delay_ticks` after `now`.
    ///
    /// A zero delay fires on the same tick's timer pass.
    pub fn schedule(&mut self, now: u32, delay_ticks: u32, scope: TimerScope, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due_tick: now.saturating_add(delay_ticks),
            scope,
            epoch: self.epoch,
            task,
        });
        id
    }

    /// Remove a pending task. Returns false if it already fired,
    /// was retired, or was never scheduled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() < before
    }

    /// Advance the level epoch, retiring every pending level-scoped task.
    pub fn bump_epoch(&mut self) {
        self.epoch += 1;
    }

    /// Current level epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Remove and return every task due at or before `now`.
    ///
    /// Tasks fire ordered by due tick, then by schedule order. Due
    /// entries carrying a stale level epoch are dropped, not returned.
    pub fn fire_due(&mut self, now: u32) -> Vec<T> {
        let mut due = Vec::new();
        let mut remaining = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.due_tick <= now {
                due.push(entry);
            } else {
                remaining.push(entry);
            }
        }
        self.entries = remaining;

        due.sort_by_key(|entry| (entry.due_tick, entry.id));
        let epoch = self.epoch;
        due.into_iter()
            .filter(|entry| entry.scope == TimerScope::Session || entry.epoch == epoch)
            .map(|entry| entry.task)
            .collect()
    }

    /// Number of pending tasks that can still fire.
    pub fn pending(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.scope == TimerScope::Session || entry.epoch == self.epoch)
            .count()
    }

    /// Earliest deadline among tasks that can still fire.
    ///
    /// Hosts use this to keep ticking while a delay is outstanding even
    /// when no player input arrives.
    pub fn next_due(&self) -> Option<u32> {
        self.entries
            .iter()
            .filter(|entry| entry.scope == TimerScope::Session || entry.epoch == self.epoch)
            .map(|entry| entry.due_tick)
            .min()
    }

    /// True when no live task remains.
    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_at_deadline_not_before() {
        let mut queue = TimerQueue::new();
        queue.schedule(10, 5, TimerScope::Session, "clear");

        assert!(queue.fire_due(14).is_empty());
        assert_eq!(queue.fire_due(15), vec!["clear"]);
        assert!(queue.fire_due(15).is_empty());
    }

    #[test]
    fn test_zero_delay_fires_same_tick() {
        let mut queue = TimerQueue::new();
        queue.schedule(7, 0, TimerScope::Session, 1u32);
        assert_eq!(queue.fire_due(7), vec![1]);
    }

    #[test]
    fn test_fire_order_by_deadline_then_schedule() {
        let mut queue = TimerQueue::new();
        queue.schedule(0, 20, TimerScope::Session, "late");
        queue.schedule(0, 10, TimerScope::Session, "early-a");
        queue.schedule(0, 10, TimerScope::Session, "early-b");

        assert_eq!(queue.fire_due(30), vec!["early-a", "early-b", "late"]);
    }

    #[test]
    fn test_cancel() {
        let mut queue = TimerQueue::new();
        let keep = queue.schedule(0, 5, TimerScope::Session, "keep");
        let drop = queue.schedule(0, 5, TimerScope::Session, "drop");

        assert!(queue.cancel(drop));
        assert!(!queue.cancel(drop));
        let _ = keep;

        assert_eq!(queue.fire_due(5), vec!["keep"]);
    }

    #[test]
    fn test_epoch_bump_retires_level_scoped() {
        let mut queue = TimerQueue::new();
        queue.schedule(0, 5, TimerScope::Level, "revert-image");
        queue.schedule(0, 5, TimerScope::Session, "clear-warning");
        assert_eq!(queue.pending(), 2);

        queue.bump_epoch();

        // The stale revert never fires; the warning clear still does.
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.fire_due(10), vec!["clear-warning"]);
    }

    #[test]
    fn test_task_scheduled_after_bump_is_live() {
        let mut queue = TimerQueue::new();
        queue.bump_epoch();
        queue.schedule(0, 3, TimerScope::Level, "fresh");

        assert_eq!(queue.fire_due(3), vec!["fresh"]);
    }

    #[test]
    fn test_next_due_skips_retired_entries() {
        let mut queue = TimerQueue::new();
        queue.schedule(0, 2, TimerScope::Level, "stale");
        queue.schedule(0, 9, TimerScope::Session, "live");

        queue.bump_epoch();

        assert_eq!(queue.next_due(), Some(9));
        assert!(!queue.is_idle());
    }

    #[test]
    fn test_idle_when_empty_or_all_stale() {
        let mut queue: TimerQueue<u8> = TimerQueue::new();
        assert!(queue.is_idle());

        queue.schedule(0, 4, TimerScope::Level, 9);
        assert!(!queue.is_idle());

        queue.bump_epoch();
        assert!(queue.is_idle());
    }
}
