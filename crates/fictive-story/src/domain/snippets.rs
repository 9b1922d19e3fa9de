//! Snippet value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Zero-based position of a snippet within its story.
pub type SnippetIndex = usize;

/// Upper bound on the byte length of a written snippet body.
pub const MAX_SNIPPET_LEN: usize = 64 * 1024;

/// Body of a snippet.
///
/// A placeholder marks a turn that was taken but not yet written, so an
/// empty string never has to stand in for "absent".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnippetBody {
    /// A reserved entry with no text yet.
    Placeholder,
    /// The contributor's actual text.
    Written(String),
}

impl SnippetBody {
    /// Returns the written text, or `None` for a placeholder.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            SnippetBody::Placeholder => None,
            SnippetBody::Written(text) => Some(text),
        }
    }
}

/// One contributor's single addition to a story.
///
/// A snippet is exclusively owned by its parent story and has no
/// independent lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Identifier of the contributing user.
    pub author: String,
    /// When the snippet was contributed.
    pub created_at: DateTime<Utc>,
    /// The snippet body.
    pub body: SnippetBody,
}
