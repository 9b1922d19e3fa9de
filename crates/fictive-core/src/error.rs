//! Domain error types.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for story and turn-gate operations.
///
/// Every variant is recoverable at the caller: no operation leaves a story
/// stream partially mutated. The embedding layer decides how each maps to
/// a user-visible response.
#[derive(Debug, Error)]
pub enum StoryError {
    /// No story exists under the given id.
    #[error("story not found: {0}")]
    NotFound(Uuid),

    /// A mutation was attempted on a story that has already been finished.
    #[error("story {0} is already finished")]
    AlreadyFinished(Uuid),

    /// A contributor tried to take two turns in a row.
    #[error("turn violation on story {story_id}: {author} wrote the previous snippet")]
    TurnViolation {
        /// The story being contributed to.
        story_id: Uuid,
        /// The contributor whose turn it is not.
        author: String,
    },

    /// Another contributor holds an unexpired claim on the next turn.
    #[error("turn on story {story_id} is claimed by {holder} until {expires_at}")]
    ClaimHeld {
        /// The story whose turn is claimed.
        story_id: Uuid,
        /// The contributor holding the claim.
        holder: String,
        /// When the claim lapses on its own.
        expires_at: DateTime<Utc>,
    },

    /// Caller-supplied data failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Optimistic concurrency conflict on a story stream.
    #[error("concurrency conflict on story {story_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The story that had the conflict.
        story_id: Uuid,
        /// The version the writer loaded.
        expected: i64,
        /// The version actually found in storage.
        actual: i64,
    },

    /// An infrastructure/persistence error.
    #[error("storage error: {0}")]
    Storage(String),
}
