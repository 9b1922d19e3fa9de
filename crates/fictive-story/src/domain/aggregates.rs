//! Aggregate roots for the Story context.

use chrono::{DateTime, Utc};
use fictive_core::aggregate::AggregateRoot;
use fictive_core::clock::Clock;
use fictive_core::error::StoryError;
use fictive_core::event::{DomainEvent, EventMetadata};
use uuid::Uuid;

use super::events::{SnippetContributed, StoryBegun, StoryEvent, StoryEventKind, StoryFinished};
use super::snippets::{MAX_SNIPPET_LEN, Snippet, SnippetBody};

/// The aggregate root for one collaborative story.
///
/// State transitions `Empty -> InProgress -> Finished`; the finished state
/// is terminal. Snippet order is narrative order.
#[derive(Debug)]
pub struct Story {
    /// Aggregate identifier.
    pub id: Uuid,
    version: i64,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    snippets: Vec<Snippet>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<StoryEvent>,
}

impl Story {
    /// Creates a story aggregate with no history applied.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            started_at: None,
            finished_at: None,
            snippets: Vec::new(),
            uncommitted_events: Vec::new(),
        }
    }

    /// When the story was created. `None` only for a stream that has not
    /// replayed its `StoryBegun` event.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// When the story was finished, if it has been.
    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Whether the story has reached its terminal state.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// All snippets in narrative order.
    #[must_use]
    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    /// The most recently contributed snippet.
    #[must_use]
    pub fn last_snippet(&self) -> Option<&Snippet> {
        self.snippets.last()
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn emit(&mut self, kind: StoryEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let mut event = StoryEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: String::new(),
                aggregate_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        event.metadata.event_type = event.event_type().to_owned();

        self.uncommitted_events.push(event);
    }

    /// Begins the story, producing a `StoryBegun` event.
    ///
    /// Only valid on a fresh aggregate; the creation handler allocates a
    /// new id, so an existing stream can never be begun twice.
    pub fn begin(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        debug_assert!(self.version == 0 && self.uncommitted_events.is_empty());
        self.emit(
            StoryEventKind::StoryBegun(StoryBegun { story_id: self.id }),
            correlation_id,
            clock,
        );
    }

    /// Contributes one snippet, producing a `SnippetContributed` event.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyFinished` once the story is terminal, and
    /// `InvalidInput` for an empty author, an empty written body, or a
    /// body longer than `MAX_SNIPPET_LEN` bytes.
    pub fn contribute(
        &mut self,
        author: &str,
        body: SnippetBody,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), StoryError> {
        if self.is_finished() {
            return Err(StoryError::AlreadyFinished(self.id));
        }
        if author.trim().is_empty() {
            return Err(StoryError::InvalidInput("author must not be empty".into()));
        }
        if let SnippetBody::Written(text) = &body {
            if text.is_empty() {
                return Err(StoryError::InvalidInput(
                    "a written snippet must not be empty; use a placeholder instead".into(),
                ));
            }
            if text.len() > MAX_SNIPPET_LEN {
                return Err(StoryError::InvalidInput(format!(
                    "snippet body exceeds {MAX_SNIPPET_LEN} bytes"
                )));
            }
        }

        self.emit(
            StoryEventKind::SnippetContributed(SnippetContributed {
                story_id: self.id,
                author: author.to_owned(),
                body,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Finishes the story, producing a `StoryFinished` event.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyFinished` on every call after the first successful
    /// one; a repeated finish is an error, never a silent success.
    pub fn finish(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), StoryError> {
        if self.is_finished() {
            return Err(StoryError::AlreadyFinished(self.id));
        }

        self.emit(
            StoryEventKind::StoryFinished(StoryFinished { story_id: self.id }),
            correlation_id,
            clock,
        );
        Ok(())
    }
}

impl AggregateRoot for Story {
    type Event = StoryEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            StoryEventKind::StoryBegun(_) => {
                self.started_at = Some(event.metadata.occurred_at);
            }
            StoryEventKind::SnippetContributed(payload) => {
                self.snippets.push(Snippet {
                    author: payload.author.clone(),
                    created_at: event.metadata.occurred_at,
                    body: payload.body.clone(),
                });
            }
            StoryEventKind::StoryFinished(_) => {
                self.finished_at = Some(event.metadata.occurred_at);
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fictive_test_support::FixedClock;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn begun_story(clock: &FixedClock) -> Story {
        let mut story = Story::new(Uuid::new_v4());
        story.begin(Uuid::new_v4(), clock);
        let events: Vec<StoryEvent> = story.uncommitted_events().to_vec();
        for event in &events {
            story.apply(event);
        }
        story.clear_uncommitted_events();
        story
    }

    #[test]
    fn test_begin_produces_story_begun_event() {
        let story_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let mut story = Story::new(story_id);

        story.begin(correlation_id, &clock);

        let events = story.uncommitted_events();
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert_eq!(event.event_type(), "story.begun");

        let meta = event.metadata();
        assert_eq!(meta.aggregate_id, story_id);
        assert_eq!(meta.sequence_number, 1);
        assert_eq!(meta.correlation_id, correlation_id);
        assert_eq!(meta.occurred_at, fixed_now());
    }

    #[test]
    fn test_apply_story_begun_sets_started_at() {
        let clock = FixedClock(fixed_now());
        let story = begun_story(&clock);

        assert_eq!(story.started_at(), Some(fixed_now()));
        assert_eq!(story.finished_at(), None);
        assert_eq!(story.version(), 1);
        assert!(story.snippets().is_empty());
    }

    #[test]
    fn test_contribute_appends_in_narrative_order() {
        let clock = FixedClock(fixed_now());
        let mut story = begun_story(&clock);

        story
            .contribute(
                "alice",
                SnippetBody::Written("Once upon a time".into()),
                Uuid::new_v4(),
                &clock,
            )
            .unwrap();
        story
            .contribute(
                "bob",
                SnippetBody::Written("a dragon appeared".into()),
                Uuid::new_v4(),
                &clock,
            )
            .unwrap();

        let events: Vec<StoryEvent> = story.uncommitted_events().to_vec();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].metadata.sequence_number, 2);
        assert_eq!(events[1].metadata.sequence_number, 3);

        for event in &events {
            story.apply(event);
        }

        assert_eq!(story.snippets().len(), 2);
        assert_eq!(story.snippets()[0].author, "alice");
        assert_eq!(story.snippets()[1].author, "bob");
        assert_eq!(
            story.last_snippet().unwrap().body.text(),
            Some("a dragon appeared")
        );
    }

    #[test]
    fn test_contribute_rejects_empty_author() {
        let clock = FixedClock(fixed_now());
        let mut story = begun_story(&clock);

        let result = story.contribute(
            "  ",
            SnippetBody::Written("text".into()),
            Uuid::new_v4(),
            &clock,
        );

        assert!(matches!(result, Err(StoryError::InvalidInput(_))));
        assert!(story.uncommitted_events().is_empty());
    }

    #[test]
    fn test_contribute_rejects_empty_written_body() {
        let clock = FixedClock(fixed_now());
        let mut story = begun_story(&clock);

        let result = story.contribute(
            "alice",
            SnippetBody::Written(String::new()),
            Uuid::new_v4(),
            &clock,
        );

        assert!(matches!(result, Err(StoryError::InvalidInput(_))));
    }

    #[test]
    fn test_contribute_rejects_oversized_body() {
        let clock = FixedClock(fixed_now());
        let mut story = begun_story(&clock);
        let oversized = "x".repeat(MAX_SNIPPET_LEN + 1);

        let result = story.contribute(
            "alice",
            SnippetBody::Written(oversized),
            Uuid::new_v4(),
            &clock,
        );

        assert!(matches!(result, Err(StoryError::InvalidInput(_))));
    }

    #[test]
    fn test_contribute_accepts_placeholder_body() {
        let clock = FixedClock(fixed_now());
        let mut story = begun_story(&clock);

        story
            .contribute("alice", SnippetBody::Placeholder, Uuid::new_v4(), &clock)
            .unwrap();

        let events: Vec<StoryEvent> = story.uncommitted_events().to_vec();
        for event in &events {
            story.apply(event);
        }
        assert_eq!(story.last_snippet().unwrap().body, SnippetBody::Placeholder);
    }

    #[test]
    fn test_finish_is_terminal() {
        let clock = FixedClock(fixed_now());
        let mut story = begun_story(&clock);

        story.finish(Uuid::new_v4(), &clock).unwrap();
        let events: Vec<StoryEvent> = story.uncommitted_events().to_vec();
        for event in &events {
            story.apply(event);
        }
        story.clear_uncommitted_events();

        assert_eq!(story.finished_at(), Some(fixed_now()));

        let story_id = story.id;
        match story.finish(Uuid::new_v4(), &clock) {
            Err(StoryError::AlreadyFinished(id)) => assert_eq!(id, story_id),
            other => panic!("expected AlreadyFinished, got {other:?}"),
        }
        match story.contribute(
            "alice",
            SnippetBody::Written("more".into()),
            Uuid::new_v4(),
            &clock,
        ) {
            Err(StoryError::AlreadyFinished(id)) => assert_eq!(id, story_id),
            other => panic!("expected AlreadyFinished, got {other:?}"),
        }
    }
}
