//! Quiz Events
//!
//! Events generated during simulation, drained by the host each tick.
//! They are the core's only output channel: image swaps, token rebuilds,
//! selection badges, warnings, and progression all cross the boundary here.

use serde::{Serialize, Deserialize};

use crate::game::level::ImageRef;
use crate::game::progress::Progress;
use crate::game::token::{SelectionTracker, TokenId};

/// Transient user-visible message.
///
/// The core emits which message, never display text; hosts own the
/// wording and presentation. Messages auto-clear via a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// Submit arrived before every token was selected.
    SelectAllWords,
    /// The final level was solved.
    QuizWon,
}

/// A token as announced to the host in a deal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealtToken {
    /// Identity the host must send back on activation.
    pub id: TokenId,
    /// Word to display on the button.
    pub word: String,
}

/// Quiz event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizEventData {
    /// A level became current; display its question image.
    LevelLoaded {
        /// Index into the level sequence.
        index: usize,
        /// Question image to display.
        image: ImageRef,
    },

    /// Destroy all existing tokens and present these instead.
    TokensDealt {
        /// Fresh tokens in presentation order.
        tokens: Vec<DealtToken>,
    },

    /// The selection changed; refresh every order badge.
    SelectionChanged {
        /// Token IDs in activation order. Position + 1 is the badge
        /// number; tokens absent from the list show no badge.
        order: Vec<TokenId>,
    },

    /// Show a transient message.
    WarningShown {
        /// Which message.
        warning: Warning,
    },

    /// Clear the transient message area.
    WarningCleared,

    /// Submitted answer matched the target sentence.
    AnswerCorrect {
        /// Level that was solved.
        level_index: usize,
    },

    /// Submitted answer did not match; feedback begins.
    AnswerWrong {
        /// Level that was answered.
        level_index: usize,
    },

    /// Wrong-answer feedback began; display this image and lock input.
    FeedbackStarted {
        /// The level's wrong-answer image.
        image: ImageRef,
    },

    /// Feedback window elapsed; restore this image and unlock input.
    FeedbackEnded {
        /// The level's question image.
        image: ImageRef,
    },

    /// Solved-level count moved; refresh the progress bar.
    ProgressChanged {
        /// Current counts.
        progress: Progress,
    },

    /// Every level is solved; the run is over.
    QuizCompleted {
        /// Levels solved in total.
        total_levels: usize,
    },
}

/// A quiz event with its timing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizEvent {
    /// Tick when the event occurred.
    pub tick: u32,

    /// Event data.
    pub data: QuizEventData,
}

impl QuizEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: QuizEventData) -> Self {
        Self { tick, data }
    }

    /// Create level loaded event.
    pub fn level_loaded(tick: u32, index: usize, image: ImageRef) -> Self {
        Self::new(tick, QuizEventData::LevelLoaded { index, image })
    }

    /// Create tokens dealt event from the tracker's presented tokens.
    pub fn tokens_dealt(tick: u32, tracker: &SelectionTracker) -> Self {
        let tokens = tracker
            .tokens()
            .iter()
            .map(|token| DealtToken {
                id: token.id,
                word: token.word.clone(),
            })
            .collect();
        Self::new(tick, QuizEventData::TokensDealt { tokens })
    }

    /// Create selection changed event from the tracker's current order.
    pub fn selection_changed(tick: u32, tracker: &SelectionTracker) -> Self {
        Self::new(
            tick,
            QuizEventData::SelectionChanged {
                order: tracker.selection().to_vec(),
            },
        )
    }

    /// Create warning shown event.
    pub fn warning_shown(tick: u32, warning: Warning) -> Self {
        Self::new(tick, QuizEventData::WarningShown { warning })
    }

    /// Create warning cleared event.
    pub fn warning_cleared(tick: u32) -> Self {
        Self::new(tick, QuizEventData::WarningCleared)
    }

    /// Create answer correct event.
    pub fn answer_correct(tick: u32, level_index: usize) -> Self {
        Self::new(tick, QuizEventData::AnswerCorrect { level_index })
    }

    /// Create answer wrong event.
    pub fn answer_wrong(tick: u32, level_index: usize) -> Self {
        Self::new(tick, QuizEventData::AnswerWrong { level_index })
    }

    /// Create feedback started event.
    pub fn feedback_started(tick: u32, image: ImageRef) -> Self {
        Self::new(tick, QuizEventData::FeedbackStarted { image })
    }

    /// Create feedback ended event.
    pub fn feedback_ended(tick: u32, image: ImageRef) -> Self {
        Self::new(tick, QuizEventData::FeedbackEnded { image })
    }

    /// Create progress changed event.
    pub fn progress_changed(tick: u32, progress: Progress) -> Self {
        Self::new(tick, QuizEventData::ProgressChanged { progress })
    }

    /// Create quiz completed event.
    pub fn quiz_completed(tick: u32, total_levels: usize) -> Self {
        Self::new(tick, QuizEventData::QuizCompleted { total_levels })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_dealt_mirrors_tracker() {
        let mut next_id = 0;
        let tracker = SelectionTracker::deal(
            vec!["like".to_string(), "I".to_string()],
            &mut next_id,
        );

        let event = QuizEvent::tokens_dealt(5, &tracker);
        match event.data {
            QuizEventData::TokensDealt { tokens } => {
                assert_eq!(tokens.len(), 2);
                assert_eq!(tokens[0].word, "like");
                assert_eq!(tokens[1].word, "I");
                assert_ne!(tokens[0].id, tokens[1].id);
            }
            other => panic!("unexpected event data: {:?}", other),
        }
    }

    #[test]
    fn test_selection_changed_carries_activation_order() {
        let mut next_id = 0;
        let mut tracker = SelectionTracker::deal(
            vec!["a".to_string(), "b".to_string()],
            &mut next_id,
        );
        let ids: Vec<TokenId> = tracker.tokens().iter().map(|t| t.id).collect();
        tracker.activate(ids[1]);
        tracker.activate(ids[0]);

        let event = QuizEvent::selection_changed(9, &tracker);
        assert_eq!(
            event.data,
            QuizEventData::SelectionChanged {
                order: vec![ids[1], ids[0]],
            }
        );
        assert_eq!(event.tick, 9);
    }

    #[test]
    fn test_event_json_round_trip() {
        let event = QuizEvent::warning_shown(42, Warning::SelectAllWords);

        let json = serde_json::to_string(&event).unwrap();
        let back: QuizEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(back, event);
    }
}
