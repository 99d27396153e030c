//! Quiz Logic Module
//!
//! All quiz progression code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `level`: Level data and the validated level store
//! - `token`: Presented word tokens and click-order selection
//! - `evaluate`: Answer grading against the target sentence
//! - `progress`: Monotonic level progression
//! - `session`: Session state, phases, warnings
//! - `tick`: Host-driven update loop
//! - `command`: Player commands and the replay log
//! - `events`: Quiz events for hosts and replay verification

pub mod level;
pub mod token;
pub mod evaluate;
pub mod progress;
pub mod session;
pub mod tick;
pub mod command;
pub mod events;

// Re-export key types
pub use level::{ImageRef, Level, LevelError, LevelStore, MAX_WORDS_PER_LEVEL};
pub use token::{PresentedToken, SelectionTracker, TokenId};
pub use evaluate::{evaluate, Verdict};
pub use progress::{AdvanceOutcome, LevelProgression, Progress};
pub use session::{QuizPhase, QuizSession};
pub use tick::{replay_session, tick, QuizConfig, TickResult};
pub use command::{Command, CommandLog, RecordedCommand};
pub use events::{QuizEvent, QuizEventData, Warning};
