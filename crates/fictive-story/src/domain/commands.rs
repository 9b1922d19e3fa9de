//! Commands for the Story context.

use uuid::Uuid;

use super::snippets::SnippetBody;

/// Command to create a new, empty story.
#[derive(Debug, Clone)]
pub struct BeginStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

/// Command to append one snippet to an existing story.
#[derive(Debug, Clone)]
pub struct ContributeSnippet {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The story being contributed to.
    pub story_id: Uuid,
    /// Identifier of the contributing user.
    pub author: String,
    /// The snippet body.
    pub body: SnippetBody,
}

/// Command to finish a story, freezing it permanently.
#[derive(Debug, Clone)]
pub struct FinishStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The story to finish.
    pub story_id: Uuid,
}
