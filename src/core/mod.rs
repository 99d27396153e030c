//! Core deterministic primitives.
//!
//! All types in this module are designed for perfect cross-platform
//! determinism. They underpin the replayability of recorded sessions.

pub mod rng;
pub mod timer;
pub mod hash;

// Re-export core types
pub use rng::DeterministicRng;
pub use timer::{TimerId, TimerQueue, TimerScope};
pub use hash::compute_state_hash;
