//! The `StoryStore` facade — the four public store operations.
//!
//! Owns per-story write serialization. The single package-level story of
//! the product sketch becomes an explicitly constructed store instance
//! holding its own clock, repository, and locks; nothing here is ambient
//! global state.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, instrument};
use uuid::Uuid;

use fictive_core::clock::Clock;
use fictive_core::error::StoryError;
use fictive_core::repository::EventRepository;

use crate::application::command_handlers;
use crate::application::query_handlers::{self, StoryView};
use crate::domain::commands::{BeginStory, ContributeSnippet, FinishStory};
use crate::domain::snippets::{SnippetBody, SnippetIndex};

/// Authoritative store for all stories.
///
/// Mutations on one story are serialized behind a per-story lock held
/// across the load-execute-append cycle; the repository's expected-version
/// check remains as a backstop, so a conflict surfacing to a caller means
/// an unserialized writer touched the stream. Reads take no lock: they
/// reconstitute a snapshot from an immutable copy of the stream.
pub struct StoryStore {
    clock: Arc<dyn Clock>,
    repository: Arc<dyn EventRepository>,
    write_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl StoryStore {
    /// Creates a store over the given clock and event repository.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, repository: Arc<dyn EventRepository>) -> Self {
        Self {
            clock,
            repository,
            write_locks: DashMap::new(),
        }
    }

    fn write_lock(&self, story_id: Uuid) -> Arc<Mutex<()>> {
        self.write_locks.entry(story_id).or_default().clone()
    }

    /// Creates a new, empty story and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `StoryError` only if the repository fails.
    #[instrument(skip(self))]
    pub async fn create_story(&self) -> Result<Uuid, StoryError> {
        let command = BeginStory {
            correlation_id: Uuid::new_v4(),
        };

        let story_id =
            command_handlers::handle_begin_story(&command, self.clock.as_ref(), &*self.repository)
                .await?;

        info!(story_id = %story_id, correlation_id = %command.correlation_id, "story created");
        Ok(story_id)
    }

    /// Appends one snippet to a story and returns its zero-based position.
    ///
    /// Concurrent calls against the same story are serialized here, so
    /// each contribution observes the one before it and positions are
    /// distinct and ordered.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `AlreadyFinished`, `InvalidInput`, or a
    /// repository error.
    #[instrument(skip_all, fields(story_id = %story_id, author = %author))]
    pub async fn append_snippet(
        &self,
        story_id: Uuid,
        author: &str,
        body: SnippetBody,
    ) -> Result<SnippetIndex, StoryError> {
        let lock = self.write_lock(story_id);
        let _guard = lock.lock().await;

        let command = ContributeSnippet {
            correlation_id: Uuid::new_v4(),
            story_id,
            author: author.to_owned(),
            body,
        };

        let index = command_handlers::handle_contribute_snippet(
            &command,
            self.clock.as_ref(),
            &*self.repository,
        )
        .await?;

        info!(
            story_id = %story_id,
            correlation_id = %command.correlation_id,
            snippet_index = index,
            "snippet contributed"
        );
        Ok(index)
    }

    /// Finishes a story, freezing it and unlocking full readability.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `AlreadyFinished` (on every call after the
    /// first successful one), or a repository error.
    #[instrument(skip_all, fields(story_id = %story_id))]
    pub async fn finish_story(&self, story_id: Uuid) -> Result<(), StoryError> {
        let lock = self.write_lock(story_id);
        let _guard = lock.lock().await;

        let command = FinishStory {
            correlation_id: Uuid::new_v4(),
            story_id,
        };

        command_handlers::handle_finish_story(&command, self.clock.as_ref(), &*self.repository)
            .await?;

        info!(story_id = %story_id, correlation_id = %command.correlation_id, "story finished");
        Ok(())
    }

    /// Returns a detached snapshot of a story.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id or a repository error.
    #[instrument(skip_all, fields(story_id = %story_id))]
    pub async fn get_story(&self, story_id: Uuid) -> Result<StoryView, StoryError> {
        query_handlers::get_story_by_id(story_id, &*self.repository).await
    }
}
