//! Command handlers for the Story context.
//!
//! Each handler follows the same shape: load the story's events,
//! reconstitute the aggregate, execute the command method, and append the
//! resulting events with an expected-version check.

use fictive_core::aggregate::AggregateRoot;
use fictive_core::clock::Clock;
use fictive_core::error::StoryError;
use fictive_core::event::DomainEvent;
use fictive_core::repository::{EventRepository, StoredEvent};
use uuid::Uuid;

use crate::domain::aggregates::Story;
use crate::domain::commands::{BeginStory, ContributeSnippet, FinishStory};
use crate::domain::events::{StoryEvent, StoryEventKind};
use crate::domain::snippets::SnippetIndex;

fn to_stored_event(event: &StoryEvent) -> StoredEvent {
    let meta = event.metadata();
    StoredEvent {
        event_id: meta.event_id,
        aggregate_id: meta.aggregate_id,
        event_type: event.event_type().to_owned(),
        payload: event.to_payload(),
        sequence_number: meta.sequence_number,
        correlation_id: meta.correlation_id,
        occurred_at: meta.occurred_at,
    }
}

/// Reconstitutes a `Story` from stored events.
///
/// # Errors
///
/// Returns `StoryError::Storage` if event deserialization fails.
pub(crate) fn reconstitute(
    story_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<Story, StoryError> {
    let mut story = Story::new(story_id);
    for stored in existing_events {
        let kind: StoryEventKind = serde_json::from_value(stored.payload.clone())
            .map_err(|e| StoryError::Storage(format!("event deserialization failed: {e}")))?;
        let event = StoryEvent {
            metadata: fictive_core::event::EventMetadata {
                event_id: stored.event_id,
                event_type: stored.event_type.clone(),
                aggregate_id: stored.aggregate_id,
                sequence_number: stored.sequence_number,
                correlation_id: stored.correlation_id,
                occurred_at: stored.occurred_at,
            },
            kind,
        };
        story.apply(&event);
    }
    Ok(story)
}

fn uncommitted_as_stored(story: &Story) -> Vec<StoredEvent> {
    story
        .uncommitted_events()
        .iter()
        .map(to_stored_event)
        .collect()
}

/// Handles `BeginStory`: allocates a fresh story id and persists the
/// `StoryBegun` event at the head of a new stream.
///
/// # Errors
///
/// Returns `StoryError` if the append fails.
pub async fn handle_begin_story(
    command: &BeginStory,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Uuid, StoryError> {
    let story_id = Uuid::new_v4();
    let mut story = Story::new(story_id);

    story.begin(command.correlation_id, clock);

    repo.append_events(story_id, 0, &uncommitted_as_stored(&story))
        .await?;

    Ok(story_id)
}

/// Handles `ContributeSnippet`: reconstitutes the story, validates and
/// executes the contribution, persists it, and returns the zero-based
/// position of the new snippet.
///
/// # Errors
///
/// Returns `NotFound` for an unknown story, `AlreadyFinished` for a
/// terminal one, `InvalidInput` for rejected content, or a repository
/// error from loading/appending.
pub async fn handle_contribute_snippet(
    command: &ContributeSnippet,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<SnippetIndex, StoryError> {
    let existing_events = repo.load_events(command.story_id).await?;
    if existing_events.is_empty() {
        return Err(StoryError::NotFound(command.story_id));
    }
    let mut story = reconstitute(command.story_id, &existing_events)?;

    story.contribute(
        &command.author,
        command.body.clone(),
        command.correlation_id,
        clock,
    )?;

    repo.append_events(command.story_id, story.version(), &uncommitted_as_stored(&story))
        .await?;

    // The contribution lands directly after the committed snippets.
    Ok(story.snippets().len())
}

/// Handles `FinishStory`: reconstitutes the story and persists the
/// terminal `StoryFinished` event.
///
/// # Errors
///
/// Returns `NotFound` for an unknown story, `AlreadyFinished` if finish
/// already succeeded once, or a repository error from loading/appending.
pub async fn handle_finish_story(
    command: &FinishStory,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<(), StoryError> {
    let existing_events = repo.load_events(command.story_id).await?;
    if existing_events.is_empty() {
        return Err(StoryError::NotFound(command.story_id));
    }
    let mut story = reconstitute(command.story_id, &existing_events)?;

    story.finish(command.correlation_id, clock)?;

    repo.append_events(command.story_id, story.version(), &uncommitted_as_stored(&story))
        .await?;

    Ok(())
}
