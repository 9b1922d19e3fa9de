//! Event repository abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoryError;

/// Stored representation of a domain event.
#[derive(Debug, Clone)]
pub struct StoredEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Story/stream this event belongs to.
    pub aggregate_id: Uuid,
    /// Event type name for deserialization routing.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Position within the stream.
    pub sequence_number: i64,
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: chrono::DateTime<chrono::Utc>,
}

/// Repository trait for loading and appending domain events.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Load all events for a given stream, ordered by sequence number.
    /// Unknown streams yield an empty vec, not an error.
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, StoryError>;

    /// Append new events to a stream. `expected_version` is the last
    /// sequence number the writer observed; a mismatch fails with
    /// `StoryError::ConcurrencyConflict` and appends nothing.
    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), StoryError>;
}
