//! Pack Authoring Operations
//!
//! Edit operations an authoring tool performs on a [`LevelPack`].
//! These mutate raw pack data and never reject an edit outright; the
//! one hard rule, the per-level word cap, clamps and reports instead
//! so the tool can surface it. Validation against the full ruleset
//! happens when the pack is loaded for play.

use std::fmt;

use crate::game::level::MAX_WORDS_PER_LEVEL;
use crate::pack::file::{LevelPack, PackLevel};

/// A rule the editor bent to keep the edit applicable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthoringWarning {
    /// Requested word count exceeded the cap and was clamped.
    WordCountClamped {
        /// What the author asked for.
        requested: usize,
        /// The cap that was applied.
        max: usize,
    },
}

impl fmt::Display for AuthoringWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthoringWarning::WordCountClamped { max, .. } => {
                write!(f, "can't have more than {} words in a level", max)
            }
        }
    }
}

/// Resize the level list, keeping existing entries.
///
/// Growth appends blank levels; shrinking drops levels from the end.
pub fn set_level_count(pack: &mut LevelPack, count: usize) {
    if count > pack.levels.len() {
        pack.levels.resize_with(count, PackLevel::default);
    } else {
        pack.levels.truncate(count);
    }
}

/// Append one blank level.
pub fn add_level(pack: &mut LevelPack) {
    pack.levels.push(PackLevel::default());
}

/// Delete the level at `index`. Returns false when out of range.
pub fn remove_level(pack: &mut LevelPack, index: usize) -> bool {
    if index >= pack.levels.len() {
        return false;
    }
    pack.levels.remove(index);
    true
}

/// Resize a level's word list, clamping at [`MAX_WORDS_PER_LEVEL`].
///
/// Growth appends empty strings for the author to fill in; shrinking
/// drops words from the end. Returns the warning when the request was
/// clamped.
pub fn set_word_count(level: &mut PackLevel, requested: usize) -> Option<AuthoringWarning> {
    let (count, warning) = if requested > MAX_WORDS_PER_LEVEL {
        (
            MAX_WORDS_PER_LEVEL,
            Some(AuthoringWarning::WordCountClamped {
                requested,
                max: MAX_WORDS_PER_LEVEL,
            }),
        )
    } else {
        (requested, None)
    };

    if count > level.words.len() {
        level.words.resize(count, String::new());
    } else {
        level.words.truncate(count);
    }

    warning
}

/// Set one word of the target sentence. Returns false when out of range.
pub fn set_word(level: &mut PackLevel, index: usize, word: impl Into<String>) -> bool {
    match level.words.get_mut(index) {
        Some(slot) => {
            *slot = word.into();
            true
        }
        None => false,
    }
}

/// Set the image shown while the level is being answered.
pub fn set_question_image(level: &mut PackLevel, image: impl Into<String>) {
    level.question_image = image.into();
}

/// Set the image shown during wrong-answer feedback.
pub fn set_wrong_answer_image(level: &mut PackLevel, image: impl Into<String>) {
    level.wrong_answer_image = image.into();
}

// =============================================================================
// TESTS
// =============================================================================
