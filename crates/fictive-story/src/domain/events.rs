//! Domain events for the Story context.

use fictive_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::snippets::SnippetBody;

/// Emitted once when a story is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryBegun {
    /// The story identifier.
    pub story_id: Uuid,
}

/// Emitted for each snippet added to a story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetContributed {
    /// The story being contributed to.
    pub story_id: Uuid,
    /// Identifier of the contributing user.
    pub author: String,
    /// The snippet body.
    pub body: SnippetBody,
}

/// Emitted once when an administrator finishes a story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryFinished {
    /// The story that was finished.
    pub story_id: Uuid,
}

/// Event payload variants for the Story context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoryEventKind {
    /// A story has been created.
    StoryBegun(StoryBegun),
    /// A snippet has been contributed.
    SnippetContributed(SnippetContributed),
    /// A story has been finished.
    StoryFinished(StoryFinished),
}

/// Domain event envelope for the Story context.
#[derive(Debug, Clone)]
pub struct StoryEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: StoryEventKind,
}

impl DomainEvent for StoryEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            StoryEventKind::StoryBegun(_) => "story.begun",
            StoryEventKind::SnippetContributed(_) => "story.snippet_contributed",
            StoryEventKind::StoryFinished(_) => "story.finished",
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("StoryEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
