//! Engine error types.

use atelier_common_core::EntryId;
use thiserror::Error;

/// Errors from conversation engine operations.
///
/// Validation variants (`EmptyCritique`, `EmptySuggestion`) reject an
/// operation without touching state; the caller decides whether they are
/// user-visible. The id-resolution variants flag caller misuse; callers
/// wanting quiet no-op semantics downgrade them to a debug log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The id does not exist in the log.
    #[error("no entry with id {0} in the log")]
    UnknownEntry(EntryId),

    /// The id exists but is not a `user` entry.
    #[error("entry {0} is not a user entry")]
    NotAUserEntry(EntryId),

    /// The id exists but is not an `ai-response` entry.
    #[error("entry {0} is not a selectable response")]
    NotASelectableEntry(EntryId),

    /// The response has no preceding `user` entry to own it.
    #[error("response {0} has no owning user turn")]
    OrphanResponse(EntryId),

    /// An entry with this id is already in the log.
    #[error("duplicate entry id {0}")]
    DuplicateId(EntryId),

    /// Critique text is empty after trimming.
    #[error("critique text must not be empty")]
    EmptyCritique,

    /// Suggestion text is empty after trimming.
    #[error("suggestion text must not be empty")]
    EmptySuggestion,

    /// No turn is currently being critiqued.
    #[error("not in critique mode")]
    NotCritiquing,
}
