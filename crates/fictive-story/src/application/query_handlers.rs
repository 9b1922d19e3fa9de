//! Query handlers for the Story context.
//!
//! Queries reconstitute a story from its stored events and return a
//! detached view DTO — never a live reference into mutable state.

use chrono::{DateTime, Utc};
use fictive_core::error::StoryError;
use fictive_core::repository::EventRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::aggregates::Story;
use crate::domain::snippets::SnippetBody;

/// Read-only view of one snippet.
#[derive(Debug, Clone, Serialize)]
pub struct SnippetView {
    /// Identifier of the contributing user.
    pub author: String,
    /// When the snippet was contributed.
    pub created_at: DateTime<Utc>,
    /// The snippet body.
    pub body: SnippetBody,
}

/// Read-only snapshot of a story aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct StoryView {
    /// The story identifier.
    pub story_id: Uuid,
    /// When the story was created.
    pub started_at: DateTime<Utc>,
    /// When the story was finished, if it has been.
    pub finished_at: Option<DateTime<Utc>>,
    /// All snippets in narrative order.
    pub snippets: Vec<SnippetView>,
    /// Current version (event count).
    pub version: i64,
}

impl StoryView {
    /// Whether the story has reached its terminal state.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// The most recently contributed snippet.
    #[must_use]
    pub fn last_snippet(&self) -> Option<&SnippetView> {
        self.snippets.last()
    }
}

pub(crate) fn view_of(story: &Story) -> Result<StoryView, StoryError> {
    use fictive_core::aggregate::AggregateRoot;

    let started_at = story
        .started_at()
        .ok_or_else(|| StoryError::Storage("story stream is missing its begin event".into()))?;

    Ok(StoryView {
        story_id: story.id,
        started_at,
        finished_at: story.finished_at(),
        snippets: story
            .snippets()
            .iter()
            .map(|snippet| SnippetView {
                author: snippet.author.clone(),
                created_at: snippet.created_at,
                body: snippet.body.clone(),
            })
            .collect(),
        version: story.version(),
    })
}

/// Retrieves a story snapshot by id.
///
/// # Errors
///
/// Returns `StoryError::NotFound` if no events exist for the id, or
/// `StoryError::Storage` if the stream cannot be deserialized.
pub async fn get_story_by_id(
    story_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<StoryView, StoryError> {
    let stored_events = repo.load_events(story_id).await?;
    if stored_events.is_empty() {
        return Err(StoryError::NotFound(story_id));
    }
    let story = command_handlers::reconstitute(story_id, &stored_events)?;
    view_of(&story)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use fictive_core::repository::StoredEvent;
    use uuid::Uuid;

    use super::*;
    use crate::domain::events::{SnippetContributed, StoryBegun, StoryEventKind, StoryFinished};
    use fictive_test_support::{EmptyEventRepository, RecordingEventRepository};

    fn stored(story_id: Uuid, sequence_number: i64, kind: &StoryEventKind) -> StoredEvent {
        StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id: story_id,
            event_type: "test".to_owned(),
            payload: serde_json::to_value(kind).unwrap(),
            sequence_number,
            correlation_id: Uuid::new_v4(),
            occurred_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_get_story_by_id_returns_snapshot_with_all_snippets() {
        let story_id = Uuid::new_v4();
        let events = vec![
            stored(
                story_id,
                1,
                &StoryEventKind::StoryBegun(StoryBegun { story_id }),
            ),
            stored(
                story_id,
                2,
                &StoryEventKind::SnippetContributed(SnippetContributed {
                    story_id,
                    author: "alice".into(),
                    body: SnippetBody::Written("Once upon a time".into()),
                }),
            ),
            stored(
                story_id,
                3,
                &StoryEventKind::StoryFinished(StoryFinished { story_id }),
            ),
        ];
        let repo = RecordingEventRepository::new(events);

        let view = get_story_by_id(story_id, &repo).await.unwrap();

        assert_eq!(view.story_id, story_id);
        assert_eq!(view.snippets.len(), 1);
        assert_eq!(view.snippets[0].author, "alice");
        assert!(view.is_finished());
        assert_eq!(view.version, 3);
    }

    #[tokio::test]
    async fn test_get_story_by_id_unknown_story_is_not_found() {
        let story_id = Uuid::new_v4();
        let repo = EmptyEventRepository;

        let result = get_story_by_id(story_id, &repo).await;

        match result.unwrap_err() {
            StoryError::NotFound(id) => assert_eq!(id, story_id),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
