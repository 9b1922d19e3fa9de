//! The `TurnGate` — visibility and write-turn policy over the story store.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, instrument};
use uuid::Uuid;

use fictive_core::clock::Clock;
use fictive_core::error::StoryError;
use fictive_core::repository::EventRepository;
use fictive_story::application::query_handlers::{self, SnippetView, StoryView};

use crate::claim::{ClaimRegistry, DEFAULT_CLAIM_DURATION_SECS, TurnClaim};

/// Decides what a contributor may read and whether they may write next.
///
/// Reads go through the same event streams as the store, so the gate
/// always judges against a consistent snapshot. Turn claims live only in
/// the gate; the story store neither knows nor needs to know about them.
pub struct TurnGate {
    clock: Arc<dyn Clock>,
    repository: Arc<dyn EventRepository>,
    claims: ClaimRegistry,
    claim_duration: Duration,
}

impl TurnGate {
    /// Creates a gate over the given clock and event repository with the
    /// default claim duration.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, repository: Arc<dyn EventRepository>) -> Self {
        Self {
            clock,
            repository,
            claims: ClaimRegistry::new(),
            claim_duration: Duration::seconds(DEFAULT_CLAIM_DURATION_SECS),
        }
    }

    /// Overrides how long a granted claim lasts.
    #[must_use]
    pub fn with_claim_duration(mut self, claim_duration: Duration) -> Self {
        self.claim_duration = claim_duration;
        self
    }

    async fn load_view(&self, story_id: Uuid) -> Result<StoryView, StoryError> {
        query_handlers::get_story_by_id(story_id, &*self.repository).await
    }

    /// The prompt shown to a contributor: the most recent snippet, or
    /// `None` for a story nobody has written into yet. Earlier snippets
    /// are never exposed here; once a story is finished the full text is
    /// available through the store's snapshot read instead.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown story or a repository error.
    #[instrument(skip_all, fields(story_id = %story_id, requester = %requester))]
    pub async fn visible_prompt(
        &self,
        story_id: Uuid,
        requester: &str,
    ) -> Result<Option<SnippetView>, StoryError> {
        let view = self.load_view(story_id).await?;

        debug!(
            snippets = view.snippets.len(),
            finished = view.is_finished(),
            "serving prompt"
        );
        Ok(view.last_snippet().cloned())
    }

    /// Whether `requester` may submit the next snippet right now.
    ///
    /// False once the story is finished, false for the author of the
    /// immediately preceding snippet, and false while another contributor
    /// holds a live claim. True otherwise, including on a story with no
    /// snippets yet.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown story or a repository error.
    #[instrument(skip_all, fields(story_id = %story_id, requester = %requester))]
    pub async fn can_submit(&self, story_id: Uuid, requester: &str) -> Result<bool, StoryError> {
        let view = self.load_view(story_id).await?;

        if view.is_finished() {
            return Ok(false);
        }
        if view
            .last_snippet()
            .is_some_and(|snippet| snippet.author == requester)
        {
            return Ok(false);
        }
        let now = self.clock.now();
        if self
            .claims
            .live_claim(story_id, now, view.version)
            .is_some_and(|claim| claim.holder != requester)
        {
            return Ok(false);
        }
        Ok(true)
    }

    /// Claims the next turn for `requester` and returns the claim together
    /// with the current prompt. Claiming again while already the holder
    /// renews the lease.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `AlreadyFinished` for stories that cannot be
    /// written to, `InvalidInput` for an empty requester, `TurnViolation`
    /// if the requester authored the preceding snippet, and `ClaimHeld`
    /// while another contributor's claim is live.
    #[instrument(skip_all, fields(story_id = %story_id, requester = %requester))]
    pub async fn claim_turn(
        &self,
        story_id: Uuid,
        requester: &str,
    ) -> Result<(TurnClaim, Option<SnippetView>), StoryError> {
        if requester.trim().is_empty() {
            return Err(StoryError::InvalidInput(
                "requester must not be empty".into(),
            ));
        }

        let view = self.load_view(story_id).await?;
        if view.is_finished() {
            return Err(StoryError::AlreadyFinished(story_id));
        }
        if view
            .last_snippet()
            .is_some_and(|snippet| snippet.author == requester)
        {
            return Err(StoryError::TurnViolation {
                story_id,
                author: requester.to_owned(),
            });
        }

        let now = self.clock.now();
        if let Some(held) = self.claims.live_claim(story_id, now, view.version) {
            if held.holder != requester {
                return Err(StoryError::ClaimHeld {
                    story_id,
                    holder: held.holder,
                    expires_at: held.expires_at,
                });
            }
        }

        let claim = TurnClaim {
            story_id,
            holder: requester.to_owned(),
            story_version: view.version,
            claimed_at: now,
            expires_at: now + self.claim_duration,
        };
        self.claims.grant(claim.clone());

        debug!(expires_at = %claim.expires_at, "turn claimed");
        Ok((claim, view.last_snippet().cloned()))
    }

    /// Releases the requester's claim on a story, if they hold one.
    /// Claims also lapse on their own on expiry and whenever the story
    /// advances, so releasing is a courtesy, not an obligation.
    #[instrument(skip_all, fields(story_id = %story_id, requester = %requester))]
    pub fn release_turn(&self, story_id: Uuid, requester: &str) {
        self.claims.release(story_id, requester);
    }
}
