//! Level Pack Files
//!
//! JSON serialization for authored level packs. A pack on disk is raw
//! authoring data; [`LevelPack::validate`] turns it into the immutable
//! [`LevelStore`] a session runs against, rejecting malformed levels
//! instead of letting them reach gameplay.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::hash::{StateHash, StateHasher};
use crate::game::level::{ImageRef, Level, LevelError, LevelStore};

/// Current pack file format version.
pub const PACK_VERSION: u32 = 1;

/// One authored level, as stored on disk.
///
/// Unvalidated: word lists may be empty or oversized while a pack is
/// being edited. Validation happens when the pack is turned into a
/// [`LevelStore`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackLevel {
    /// Image asset shown while the level is being answered.
    pub question_image: String,
    /// Image asset shown during wrong-answer feedback.
    pub wrong_answer_image: String,
    /// Target sentence, one entry per word, in the correct order.
    pub words: Vec<String>,
}

/// An authored collection of levels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelPack {
    /// Format version, checked on load.
    pub version: u32,
    /// Human-readable pack name.
    pub title: String,
    /// Levels in play order.
    pub levels: Vec<PackLevel>,
}

/// Errors from loading, saving, or validating a pack.
#[derive(Debug, Error)]
pub enum PackError {
    /// Pack file could not be read or written.
    #[error("pack file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Pack file is not valid JSON for this format.
    #[error("pack file parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Pack was written by an incompatible format version.
    #[error("unsupported pack version {got} (expected {expected})")]
    UnsupportedVersion {
        /// Version this build understands.
        expected: u32,
        /// Version found in the file.
        got: u32,
    },

    /// Pack has no levels.
    #[error("pack contains no levels")]
    Empty,

    /// A level failed validation.
    #[error("level {index} is invalid: {source}")]
    InvalidLevel {
        /// Zero-based index of the offending level.
        index: usize,
        /// What was wrong with it.
        source: LevelError,
    },
}

impl LevelPack {
    /// Create an empty pack at the current format version.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            version: PACK_VERSION,
            title: title.into(),
            levels: Vec::new(),
        }
    }

    /// Validate every level and build the immutable store.
    ///
    /// Fails on the first invalid level so the error names exactly one
    /// index to fix.
    pub fn validate(&self) -> Result<LevelStore, PackError> {
        if self.levels.is_empty() {
            return Err(PackError::Empty);
        }

        let mut levels = Vec::with_capacity(self.levels.len());
        for (index, entry) in self.levels.iter().enumerate() {
            let level = Level::new(
                ImageRef::new(entry.question_image.clone()),
                ImageRef::new(entry.wrong_answer_image.clone()),
                entry.words.clone(),
            )
            .map_err(|source| PackError::InvalidLevel { index, source })?;
            levels.push(level);
        }

        Ok(LevelStore::new(levels))
    }

    /// Content digest of the pack.
    ///
    /// Covers every field that affects gameplay, so two packs with the
    /// same digest deal identically under the same seed.
    pub fn digest(&self) -> StateHash {
        let mut hasher = StateHasher::for_level_pack();
        hasher.update_u32(self.version);
        hasher.update_str(&self.title);
        hasher.update_u32(self.levels.len() as u32);
        for level in &self.levels {
            hasher.update_str(&level.question_image);
            hasher.update_str(&level.wrong_answer_image);
            hasher.update_u32(level.words.len() as u32);
            for word in &level.words {
                hasher.update_str(word);
            }
        }
        hasher.finalize()
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from a JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Load a pack from disk, checking the format version.
pub fn load_pack(path: &Path) -> Result<LevelPack, PackError> {
    let raw = fs::read_to_string(path)?;
    let pack = LevelPack::from_json(&raw)?;

    if pack.version != PACK_VERSION {
        return Err(PackError::UnsupportedVersion {
            expected: PACK_VERSION,
            got: pack.version,
        });
    }

    tracing::info!(
        title = %pack.title,
        levels = pack.levels.len(),
        "Loaded level pack"
    );

    Ok(pack)
}

/// Write a pack to disk as pretty-printed JSON.
pub fn save_pack(path: &Path, pack: &LevelPack) -> Result<(), PackError> {
    let json = pack.to_json()?;
    fs::write(path, json)?;

    tracing::info!(
        title = %pack.title,
        levels = pack.levels.len(),
        "Saved level pack"
    );

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_pack() -> LevelPack {
        let mut pack = LevelPack::new("Starter");
        pack.levels.push(PackLevel {
            question_image: "img/cats_question.png".to_string(),
            wrong_answer_image: "img/cats_wrong.png".to_string(),
            words: vec!["I".to_string(), "like".to_string(), "cats".to_string()],
        });
        pack.levels.push(PackLevel {
            question_image: "img/night_question.png".to_string(),
            wrong_answer_image: "img/night_wrong.png".to_string(),
            words: vec!["good".to_string(), "night".to_string()],
        });
        pack
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pack.json");
        let pack = sample_pack();

        save_pack(&path, &pack).unwrap();
        let loaded = load_pack(&path).unwrap();

        assert_eq!(loaded, pack);
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pack.json");
        let mut pack = sample_pack();
        pack.version = 99;

        save_pack(&path, &pack).unwrap();
        let err = load_pack(&path).unwrap_err();

        assert!(matches!(
            err,
            PackError::UnsupportedVersion { expected: PACK_VERSION, got: 99 }
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.json");

        let err = load_pack(&path).unwrap_err();
        assert!(matches!(err, PackError::Io(_)));
    }

    #[test]
    fn test_load_garbage_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pack.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_pack(&path).unwrap_err();
        assert!(matches!(err, PackError::Parse(_)));
    }

    #[test]
    fn test_validate_builds_store_in_order() {
        let pack = sample_pack();
        let store = pack.validate().unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().words(), &["I", "like", "cats"]);
        assert_eq!(store.get(1).unwrap().word_count(), 2);
        assert_eq!(
            store.get(0).unwrap().question_image().as_str(),
            "img/cats_question.png"
        );
    }

    #[test]
    fn test_validate_rejects_empty_pack() {
        let pack = LevelPack::new("Empty");
        assert!(matches!(pack.validate(), Err(PackError::Empty)));
    }

    #[test]
    fn test_validate_names_offending_level() {
        let mut pack = sample_pack();
        pack.levels[1].words.clear();

        let err = pack.validate().unwrap_err();
        assert!(matches!(
            err,
            PackError::InvalidLevel {
                index: 1,
                source: LevelError::NoWords
            }
        ));
    }

    #[test]
    fn test_digest_tracks_content() {
        let pack = sample_pack();
        let mut reworded = pack.clone();
        reworded.levels[0].words[2] = "dogs".to_string();

        assert_eq!(pack.digest(), sample_pack().digest());
        assert_ne!(pack.digest(), reworded.digest());
    }
}
