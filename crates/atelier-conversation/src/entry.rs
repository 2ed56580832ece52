//! Conversation log entries.

use atelier_common_core::{EntryId, Timestamp};
use serde::{Deserialize, Serialize};

/// What an entry in the log is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    /// A message typed by the curator.
    User,
    /// A candidate response produced by a model.
    AiResponse,
    /// Curator feedback on a rejected turn.
    Critique,
    /// The curator's replacement answer for a rejected turn.
    Suggestion,
    /// A notice produced by the client itself (errors, status).
    System,
}

/// One item in the ordered conversation log.
///
/// Entries are immutable once inserted, with a single exception: the
/// `selected` flag of an `ai-response` entry, which the engine flips when
/// the curator picks a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Unique id within the log.
    pub id: EntryId,
    /// Entry kind.
    pub kind: EntryKind,
    /// Text content.
    pub content: String,
    /// Creation time.
    pub timestamp: Timestamp,
    /// Generating model, present only on `ai-response` entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Model reasoning, present only on `ai-response` entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Selection flag, meaningful only on `ai-response` entries.
    #[serde(default)]
    pub selected: bool,
    /// Back-reference to the `user` entry a critique/suggestion was
    /// produced for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_to: Option<EntryId>,
}

impl Entry {
    /// A user message.
    pub fn user(id: EntryId, content: impl Into<String>) -> Self {
        Self {
            id,
            kind: EntryKind::User,
            content: content.into(),
            timestamp: Timestamp::now(),
            model: None,
            reasoning: None,
            selected: false,
            related_to: None,
        }
    }

    /// A candidate model response.
    pub fn ai_response(
        id: EntryId,
        model: impl Into<String>,
        content: impl Into<String>,
        reasoning: Option<String>,
    ) -> Self {
        Self {
            id,
            kind: EntryKind::AiResponse,
            content: content.into(),
            timestamp: Timestamp::now(),
            model: Some(model.into()),
            reasoning,
            selected: false,
            related_to: None,
        }
    }

    /// A critique of a rejected turn.
    pub fn critique(id: EntryId, related_to: EntryId, content: impl Into<String>) -> Self {
        Self {
            id,
            kind: EntryKind::Critique,
            content: content.into(),
            timestamp: Timestamp::now(),
            model: None,
            reasoning: None,
            selected: false,
            related_to: Some(related_to),
        }
    }

    /// A suggested replacement answer for a rejected turn.
    pub fn suggestion(id: EntryId, related_to: EntryId, content: impl Into<String>) -> Self {
        Self {
            id,
            kind: EntryKind::Suggestion,
            content: content.into(),
            timestamp: Timestamp::now(),
            model: None,
            reasoning: None,
            selected: false,
            related_to: Some(related_to),
        }
    }

    /// A client-side notice.
    pub fn system(id: EntryId, content: impl Into<String>) -> Self {
        Self {
            id,
            kind: EntryKind::System,
            content: content.into(),
            timestamp: Timestamp::now(),
            model: None,
            reasoning: None,
            selected: false,
            related_to: None,
        }
    }

    /// Is this a candidate response?
    pub fn is_candidate(&self) -> bool {
        self.kind == EntryKind::AiResponse
    }
}
