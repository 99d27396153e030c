//! Level Pack Layer
//!
//! Authoring-side data: JSON pack files and edit operations.
//! This layer is **untrusted input** - packs validate into a
//! [`LevelStore`](crate::game::level::LevelStore) before play.

pub mod file;
pub mod authoring;

pub use file::{load_pack, save_pack, LevelPack, PackError, PackLevel, PACK_VERSION};
pub use authoring::{
    add_level, remove_level, set_level_count, set_question_image, set_word,
    set_word_count, set_wrong_answer_image, AuthoringWarning,
};
