//! In-memory implementation of the `EventRepository` trait.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use fictive_core::error::StoryError;
use fictive_core::repository::{EventRepository, StoredEvent};

/// In-memory event repository keyed by stream id.
///
/// Each stream's check-and-append runs under that stream's map entry, so
/// writers to different stories never contend. Loads hand back a detached
/// copy of the stream; callers never observe a half-appended batch.
#[derive(Debug, Default)]
pub struct MemoryEventRepository {
    streams: DashMap<Uuid, Vec<StoredEvent>>,
}

impl MemoryEventRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            streams: DashMap::new(),
        }
    }

    /// Number of streams with at least one event. Test and diagnostics aid.
    #[must_use]
    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, StoryError> {
        Ok(self
            .streams
            .get(&aggregate_id)
            .map(|stream| stream.clone())
            .unwrap_or_default())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), StoryError> {
        let mut stream = self.streams.entry(aggregate_id).or_default();

        let actual = stream.last().map_or(0, |event| event.sequence_number);
        if actual != expected_version {
            tracing::debug!(
                story_id = %aggregate_id,
                expected = expected_version,
                actual,
                "rejecting append with stale expected version"
            );
            return Err(StoryError::ConcurrencyConflict {
                story_id: aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        stream.extend(events.iter().cloned());
        Ok(())
    }
}
