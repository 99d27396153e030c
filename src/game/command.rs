//! Player Commands and Session Recording
//!
//! Commands are the host's only way into the core. Recording them with
//! their delivery ticks, next to the seed, makes any session replayable
//! bit-for-bit.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::game::token::TokenId;

/// One player action, applied on the tick it is delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Activate the token with this identity.
    Activate(TokenId),
    /// Submit the assembled answer for grading.
    Submit,
    /// Discard the current deal and reshuffle.
    Reset,
}

/// A command stamped with its delivery tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedCommand {
    /// Tick the command was applied on.
    pub tick: u32,
    /// The command.
    pub command: Command,
}

/// Current recording format version.
pub const RECORD_VERSION: u8 = 1;

/// Recording errors.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The bytes did not decode as a recording.
    #[error("recording deserialization failed: {0}")]
    DeserializationFailed(String),

    /// The recording was written by an incompatible version.
    #[error("recording version mismatch: expected {expected}, got {got}")]
    VersionMismatch {
        /// Version this build writes.
        expected: u8,
        /// Version found in the bytes.
        got: u8,
    },
}

/// Complete command recording for one session.
///
/// Contains everything a replay needs: the seed, the session identity,
/// and every command with its tick. Commands are sparse (a few per
/// second at the very most), so entries are stored verbatim; there is
/// nothing to gain from delta-compressing them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommandLog {
    /// Version for forward compatibility.
    pub version: u8,

    /// Session identifier (UUID bytes).
    pub session_id: [u8; 16],

    /// RNG seed the session ran with.
    pub rng_seed: u64,

    /// Unix timestamp when the session started.
    pub start_timestamp: u64,

    /// Last tick covered by the recording.
    pub end_tick: u32,

    /// Commands ordered by tick.
    entries: Vec<RecordedCommand>,
}

impl CommandLog {
    /// Create an empty recording.
    pub fn new(session_id: [u8; 16], rng_seed: u64, start_timestamp: u64) -> Self {
        Self {
            version: RECORD_VERSION,
            session_id,
            rng_seed,
            start_timestamp,
            end_tick: 0,
            entries: Vec::new(),
        }
    }

    /// Record a command delivered on `tick`.
    ///
    /// Callers record in tick order; `commands_at` relies on it.
    pub fn record(&mut self, tick: u32, command: Command) {
        debug_assert!(
            self.entries.last().map_or(true, |last| last.tick <= tick),
            "commands must be recorded in tick order"
        );
        self.entries.push(RecordedCommand { tick, command });
        if tick > self.end_tick {
            self.end_tick = tick;
        }
    }

    /// Commands delivered on exactly `tick`.
    ///
    /// Binary search on both bounds; the slice is empty for quiet ticks.
    pub fn commands_at(&self, tick: u32) -> &[RecordedCommand] {
        let start = self.entries.partition_point(|entry| entry.tick < tick);
        let end = self.entries.partition_point(|entry| entry.tick <= tick);
        &self.entries[start..end]
    }

    /// All recorded commands in tick order.
    pub fn entries(&self) -> &[RecordedCommand] {
        &self.entries
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Close the recording (call when the session ends).
    pub fn finalize(&mut self, end_tick: u32) {
        self.end_tick = end_tick;
    }

    /// Serialize to bytes using bincode.
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("recording serialization should not fail")
    }

    /// Deserialize from bytes, rejecting incompatible versions.
    pub fn from_bytes(data: &[u8]) -> Result<Self, RecordError> {
        let log: Self = bincode::deserialize(data)
            .map_err(|e| RecordError::DeserializationFailed(e.to_string()))?;
        if log.version != RECORD_VERSION {
            return Err(RecordError::VersionMismatch {
                expected: RECORD_VERSION,
                got: log.version,
            });
        }
        Ok(log)
    }
}

// =============================================================================
// TESTS
// =============================================================================
