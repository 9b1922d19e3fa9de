//! Turn claims — exclusive, expiring write leases on a story's next turn.
//!
//! A claim gives one contributor human-scale time to compose a snippet
//! without racing another writer. Claims are advisory: append atomicity is
//! the story store's job. A claim lapses on its own when it expires or
//! when the story advances past the version it was granted against.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

/// How long a granted claim lasts before lapsing, in seconds.
pub const DEFAULT_CLAIM_DURATION_SECS: i64 = 21_600;

/// An exclusive write lease on one story's next turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnClaim {
    /// The story whose next turn is claimed.
    pub story_id: Uuid,
    /// The contributor holding the claim.
    pub holder: String,
    /// Story version the claim was granted against; the claim is spent
    /// once the story moves past it.
    pub story_version: i64,
    /// When the claim was granted.
    pub claimed_at: DateTime<Utc>,
    /// When the claim lapses on its own.
    pub expires_at: DateTime<Utc>,
}

impl TurnClaim {
    /// Whether the claim still binds at `now` against the story's
    /// `current_version`.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>, current_version: i64) -> bool {
        self.expires_at > now && self.story_version == current_version
    }
}

/// In-memory registry of at most one claim per story.
#[derive(Debug, Default)]
pub(crate) struct ClaimRegistry {
    claims: DashMap<Uuid, TurnClaim>,
}

impl ClaimRegistry {
    pub(crate) fn new() -> Self {
        Self {
            claims: DashMap::new(),
        }
    }

    /// Returns the live claim on a story, dropping a lapsed one as a side
    /// effect.
    pub(crate) fn live_claim(
        &self,
        story_id: Uuid,
        now: DateTime<Utc>,
        current_version: i64,
    ) -> Option<TurnClaim> {
        if let Some(entry) = self.claims.get(&story_id) {
            if entry.is_live(now, current_version) {
                return Some(entry.clone());
            }
        }
        self.claims
            .remove_if(&story_id, |_, claim| !claim.is_live(now, current_version));
        None
    }

    /// Records a claim, replacing any previous one on the same story.
    pub(crate) fn grant(&self, claim: TurnClaim) {
        self.claims.insert(claim.story_id, claim);
    }

    /// Drops the claim on a story if `holder` owns it.
    pub(crate) fn release(&self, story_id: Uuid, holder: &str) {
        self.claims
            .remove_if(&story_id, |_, claim| claim.holder == holder);
    }
}
