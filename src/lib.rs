//! # Word Weave
//!
//! Deterministic word-ordering quiz core with replayable sessions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       WORD WEAVE                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  ├── timer.rs    - Tick-based timer queue                    │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Quiz logic (deterministic)                │
//! │  ├── level.rs    - Level data and validated store            │
//! │  ├── token.rs    - Word tokens and click-order selection     │
//! │  ├── evaluate.rs - Answer grading                            │
//! │  ├── progress.rs - Monotonic level progression               │
//! │  ├── session.rs  - Session state and phases                  │
//! │  ├── tick.rs     - Host-driven update loop                   │
//! │  ├── command.rs  - Player commands and replay log            │
//! │  └── events.rs   - Events for hosts and verification         │
//! │                                                              │
//! │  pack/           - Authoring (untrusted input)               │
//! │  ├── file.rs     - JSON pack files                           │
//! │  └── authoring.rs- Edit operations                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - No system time dependencies; delays are tick counts
//! - Commands apply in delivery order on numbered ticks
//! - All randomness from seeded Xorshift128+
//!
//! Given the same level pack, seed, and command timeline, a session
//! produces **identical state hashes and events** on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod pack;

// Re-export commonly used types
pub use crate::core::hash::StateHash;
pub use crate::core::rng::DeterministicRng;
pub use crate::game::command::{Command, CommandLog};
pub use crate::game::events::{QuizEvent, QuizEventData};
pub use crate::game::level::{Level, LevelStore};
pub use crate::game::session::{QuizPhase, QuizSession};
pub use crate::game::tick::{replay_session, tick, QuizConfig, TickResult};
pub use crate::pack::file::{load_pack, save_pack, LevelPack};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal host tick rate (Hz)
pub const TICK_RATE: u32 = 60;
