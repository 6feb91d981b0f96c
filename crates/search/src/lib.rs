//! Core of manager-notes: slug generation, fuzzy relevance scoring and ranking.
//!
//! Nothing in this crate touches the file system or the clock; callers pass
//! note metadata and the current time in explicitly.

mod rank;
pub mod score;
mod slug;
mod timestamp;

pub use rank::{search, NoteEntry, ScoredEntry};
pub use score::score;
pub use slug::{slugify, DEFAULT_TITLE};
pub use timestamp::Timestamp;
