//! Turn derivation.
//!
//! A turn is one `user` entry plus the run of `ai-response` entries that
//! follows it, ending at the next `user` entry or the end of the log.
//! Critique, suggestion and system entries in that window neither stop the
//! scan nor join the candidate set. Turns are recomputed on every call and
//! never stored.

use crate::entry::{Entry, EntryKind};
use crate::log::ConversationLog;
use atelier_common_core::EntryId;

/// Candidate responses belonging to the turn of the given `user` entry,
/// in log order.
///
/// Returns an empty set when the id is unknown or does not name a `user`
/// entry (caller error, by contract). O(n) in log length, no mutation.
pub fn compute_turn(log: &ConversationLog, user_entry_id: EntryId) -> Vec<&Entry> {
    let entries = log.entries();
    let Some(start) = entries
        .iter()
        .position(|e| e.id == user_entry_id && e.kind == EntryKind::User)
    else {
        return Vec::new();
    };

    entries[start + 1..]
        .iter()
        .take_while(|e| e.kind != EntryKind::User)
        .filter(|e| e.kind == EntryKind::AiResponse)
        .collect()
}

/// The `user` entry owning the given response: the nearest preceding
/// `user` entry in the log.
///
/// The association is implicit, not stored, so it is recomputed from
/// position on every call.
pub fn owning_user(log: &ConversationLog, response_id: EntryId) -> Option<EntryId> {
    let entries = log.entries();
    let index = entries.iter().position(|e| e.id == response_id)?;
    entries[..index]
        .iter()
        .rev()
        .find(|e| e.kind == EntryKind::User)
        .map(|e| e.id)
}
