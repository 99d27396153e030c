//! Level Progression
//!
//! A monotonic cursor over the level sequence with a completion latch.
//! The index only ever moves forward; restarting a quiz means building a
//! new session, not rewinding this.

use serde::{Serialize, Deserialize};

/// Where an `advance` call landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvanceOutcome {
    /// Moved onto the level at this index.
    NextLevel(usize),
    /// The just-solved level was the last one.
    Completed,
}

/// Solved/total counter pair for display layers.
///
/// Stored as exact counts; the fraction is derived on demand so no float
/// ever enters session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Levels answered correctly so far.
    pub solved: usize,
    /// Levels in the run.
    pub total: usize,
}

impl Progress {
    /// Completion in [0.0, 1.0] for progress bars.
    pub fn fraction(&self) -> f32 {
        self.solved as f32 / self.total.max(1) as f32
    }
}

/// Monotonic level cursor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelProgression {
    current: usize,
    total: usize,
    complete: bool,
}

impl LevelProgression {
    /// Start at the first of `total` levels.
    pub fn new(total: usize) -> Self {
        Self {
            current: 0,
            total,
            complete: false,
        }
    }

    /// Index of the level currently in play.
    ///
    /// Stays on the last level after completion, so it is always a valid
    /// store index while `total > 0`.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of levels in the run.
    pub fn total_levels(&self) -> usize {
        self.total
    }

    /// True once the last level has been solved.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Record that the current level was solved and move on.
    ///
    /// Completing latches: once `Completed` has been returned, further
    /// calls return `Completed` without changing anything.
    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.complete {
            return AdvanceOutcome::Completed;
        }

        if self.current + 1 < self.total {
            self.current += 1;
            AdvanceOutcome::NextLevel(self.current)
        } else {
            self.complete = true;
            AdvanceOutcome::Completed
        }
    }

    /// Current solved/total counts.
    pub fn progress(&self) -> Progress {
        Progress {
            solved: if self.complete { self.total } else { self.current },
            total: self.total,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
