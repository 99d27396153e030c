//! Level Data Definitions
//!
//! The validated, gameplay-facing form of quiz content. A level's words
//! are canonical: dealing always shuffles a copy, never this data.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::hash::StateHasher;

/// Maximum words a single level may hold.
pub const MAX_WORDS_PER_LEVEL: usize = 12;

// =============================================================================
// IMAGE REFERENCE
// =============================================================================

/// Opaque reference to a displayable image asset.
///
/// The core never interprets the value; it hands it back out in display
/// events and the host resolves it against its own asset store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap an asset name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The underlying asset name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// LEVEL
// =============================================================================

/// A level failed validation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// Target sentence is empty.
    #[error("level has no words")]
    NoWords,

    /// Target sentence exceeds the per-level word cap.
    #[error("level has {count} words, maximum is {max}")]
    TooManyWords {
        /// Words supplied.
        count: usize,
        /// The configured cap.
        max: usize,
    },
}

/// One quiz round: a target sentence plus question/feedback imagery.
///
/// Construction validates the word count, so every `Level` in play
/// satisfies `1 <= word_count() <= MAX_WORDS_PER_LEVEL`. Fields stay
/// private; gameplay reads levels, only the authoring layer builds them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    question_image: ImageRef,
    wrong_answer_image: ImageRef,
    words: Vec<String>,
}

impl Level {
    /// Create a validated level.
    pub fn new(
        question_image: ImageRef,
        wrong_answer_image: ImageRef,
        words: Vec<String>,
    ) -> Result<Self, LevelError> {
        if words.is_empty() {
            return Err(LevelError::NoWords);
        }
        if words.len() > MAX_WORDS_PER_LEVEL {
            return Err(LevelError::TooManyWords {
                count: words.len(),
                max: MAX_WORDS_PER_LEVEL,
            });
        }
        Ok(Self {
            question_image,
            wrong_answer_image,
            words,
        })
    }

    /// Image shown while the player assembles the answer.
    pub fn question_image(&self) -> &ImageRef {
        &self.question_image
    }

    /// Image shown during the wrong-answer feedback window.
    pub fn wrong_answer_image(&self) -> &ImageRef {
        &self.wrong_answer_image
    }

    /// The target sentence, in order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words in the target sentence.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Hash this level's content for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_str(self.question_image.as_str());
        hasher.update_str(self.wrong_answer_image.as_str());
        hasher.update_u32(self.words.len() as u32);
        for word in &self.words {
            hasher.update_str(word);
        }
    }
}

// =============================================================================
// LEVEL STORE
// =============================================================================

/// Ordered sequence of levels for one quiz run.
///
/// Read-only during gameplay; the authoring layer produces a new store
/// rather than editing one in place.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LevelStore {
    levels: Vec<Level>,
}

impl LevelStore {
    /// Create a store from already-validated levels.
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    /// Level at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// True when the store holds no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterate levels in play order.
    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    /// Hash every level's content, in order.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.levels.len() as u32);
        for level in &self.levels {
            level.hash_into(hasher);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_level_validation() {
        let level = Level::new(
            ImageRef::new("q1"),
            ImageRef::new("w1"),
            words(&["I", "like", "cats"]),
        )
        .unwrap();

        assert_eq!(level.word_count(), 3);
        assert_eq!(level.words()[1], "like");
        assert_eq!(level.question_image().as_str(), "q1");
    }

    #[test]
    fn test_level_rejects_no_words() {
        let result = Level::new(ImageRef::new("q"), ImageRef::new("w"), Vec::new());
        assert_eq!(result.unwrap_err(), LevelError::NoWords);
    }

    #[test]
    fn test_level_rejects_too_many_words() {
        let too_many: Vec<String> = (0..=MAX_WORDS_PER_LEVEL).map(|i| format!("w{}", i)).collect();
        let result = Level::new(ImageRef::new("q"), ImageRef::new("w"), too_many);

        assert_eq!(
            result.unwrap_err(),
            LevelError::TooManyWords {
                count: MAX_WORDS_PER_LEVEL + 1,
                max: MAX_WORDS_PER_LEVEL,
            }
        );
    }

    #[test]
    fn test_level_accepts_maximum_words() {
        let at_cap: Vec<String> = (0..MAX_WORDS_PER_LEVEL).map(|i| format!("w{}", i)).collect();
        let level = Level::new(ImageRef::new("q"), ImageRef::new("w"), at_cap).unwrap();
        assert_eq!(level.word_count(), MAX_WORDS_PER_LEVEL);
    }

    #[test]
    fn test_store_indexing() {
        let store = LevelStore::new(vec![
            Level::new(ImageRef::new("q1"), ImageRef::new("w1"), words(&["a"])).unwrap(),
            Level::new(ImageRef::new("q2"), ImageRef::new("w2"), words(&["b", "c"])).unwrap(),
        ]);

        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
        assert_eq!(store.get(1).unwrap().word_count(), 2);
        assert!(store.get(2).is_none());
    }

    #[test]
    fn test_store_hash_reflects_content() {
        use crate::core::hash::StateHasher;

        let store1 = LevelStore::new(vec![Level::new(
            ImageRef::new("q"),
            ImageRef::new("w"),
            words(&["I", "like", "cats"]),
        )
        .unwrap()]);
        let store2 = LevelStore::new(vec![Level::new(
            ImageRef::new("q"),
            ImageRef::new("w"),
            words(&["I", "like", "dogs"]),
        )
        .unwrap()]);

        let hash = |store: &LevelStore| {
            let mut hasher = StateHasher::for_level_pack();
            store.hash_into(&mut hasher);
            hasher.finalize()
        };

        assert_ne!(hash(&store1), hash(&store2));
    }
}
