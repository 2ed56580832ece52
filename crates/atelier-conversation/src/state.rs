//! The conversation store: log, input mode and critique draft.
//!
//! All mutation goes through the methods here so the turn invariants hold
//! at every step: at most one selected candidate per turn, selection never
//! leaking across turns, critique pairs inserted right after their user
//! entry, ids unique across the whole log.

use crate::entry::{Entry, EntryKind};
use crate::error::EngineError;
use crate::log::ConversationLog;
use crate::mode::{CritiqueDraft, InputMode};
use crate::turn::{compute_turn, owning_user};
use atelier_common_core::EntryId;

/// Ids of a freshly inserted critique/suggestion pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CritiquePair {
    /// Id of the `critique` entry.
    pub critique: EntryId,
    /// Id of the `suggestion` entry.
    pub suggestion: EntryId,
}

/// Conversation state: the ordered log plus the input-mode machine.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    log: ConversationLog,
    mode: InputMode,
    draft: CritiqueDraft,
}

impl ConversationState {
    /// Empty conversation in normal mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild state from persisted entries.
    pub fn from_entries(entries: Vec<Entry>) -> Result<Self, EngineError> {
        Ok(Self {
            log: ConversationLog::from_entries(entries)?,
            mode: InputMode::Normal,
            draft: CritiqueDraft::default(),
        })
    }

    /// The log, read-only.
    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// Current input mode.
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Current critique draft.
    pub fn draft(&self) -> &CritiqueDraft {
        &self.draft
    }

    /// Update the critique text of the draft.
    pub fn set_critique_text(&mut self, text: impl Into<String>) {
        self.draft.critique = text.into();
    }

    /// Update the suggestion text of the draft.
    pub fn set_suggestion_text(&mut self, text: impl Into<String>) {
        self.draft.suggestion = text.into();
    }

    /// Candidate responses of the given user entry's turn, in log order.
    pub fn turn_candidates(&self, user_entry_id: EntryId) -> Vec<&Entry> {
        compute_turn(&self.log, user_entry_id)
    }

    /// Append a user message, returning its id.
    pub fn append_user(&mut self, content: impl Into<String>) -> EntryId {
        let id = self.log.allocate_id();
        self.log
            .push(Entry::user(id, content))
            .expect("freshly allocated id cannot collide");
        id
    }

    /// Append a system notice, returning its id.
    pub fn append_system(&mut self, content: impl Into<String>) -> EntryId {
        let id = self.log.allocate_id();
        self.log
            .push(Entry::system(id, content))
            .expect("freshly allocated id cannot collide");
        id
    }

    /// Append a candidate response.
    ///
    /// A backend-issued id is used as-is; on collision with an existing
    /// entry a locally allocated id is substituted.
    pub fn append_response(
        &mut self,
        preferred_id: Option<EntryId>,
        model: impl Into<String>,
        content: impl Into<String>,
        reasoning: Option<String>,
    ) -> EntryId {
        let id = match preferred_id {
            Some(id) if !self.log.contains(id) => id,
            _ => self.log.allocate_id(),
        };
        self.log
            .push(Entry::ai_response(id, model, content, reasoning))
            .expect("id checked or freshly allocated");
        id
    }

    /// Select one candidate within its turn, deselecting every other
    /// candidate of the same turn. Entries of other turns are untouched.
    pub fn select_response(&mut self, response_id: EntryId) -> Result<(), EngineError> {
        let entry = self
            .log
            .get(response_id)
            .ok_or(EngineError::UnknownEntry(response_id))?;
        if entry.kind != EntryKind::AiResponse {
            return Err(EngineError::NotASelectableEntry(response_id));
        }

        let owner = owning_user(&self.log, response_id)
            .ok_or(EngineError::OrphanResponse(response_id))?;
        let candidates: Vec<EntryId> = compute_turn(&self.log, owner)
            .iter()
            .map(|e| e.id)
            .collect();

        for entry in self.log.entries_mut() {
            if candidates.contains(&entry.id) {
                entry.selected = entry.id == response_id;
            }
        }
        Ok(())
    }

    /// Reject a turn: drop its candidate run from the log and enter
    /// critique mode for the user entry. Returns the removed ids.
    ///
    /// The user entry itself and everything outside the run survive in
    /// original order. An open critique for another turn is overwritten.
    pub fn reject_turn(&mut self, user_entry_id: EntryId) -> Result<Vec<EntryId>, EngineError> {
        let entry = self
            .log
            .get(user_entry_id)
            .ok_or(EngineError::UnknownEntry(user_entry_id))?;
        if entry.kind != EntryKind::User {
            return Err(EngineError::NotAUserEntry(user_entry_id));
        }

        let rejected: Vec<EntryId> = compute_turn(&self.log, user_entry_id)
            .iter()
            .map(|e| e.id)
            .collect();
        self.log.remove(&rejected);

        self.mode = InputMode::Critiquing(user_entry_id);
        self.draft.clear();
        Ok(rejected)
    }

    /// Leave critique mode without submitting, discarding the draft.
    pub fn cancel_critique(&mut self) {
        self.mode = InputMode::Normal;
        self.draft.clear();
    }

    /// Trimmed draft texts, or the validation error that a submission
    /// would fail with. Does not modify state.
    pub fn validate_draft(&self) -> Result<(String, String), EngineError> {
        let critique = self.draft.critique.trim();
        if critique.is_empty() {
            return Err(EngineError::EmptyCritique);
        }
        let suggestion = self.draft.suggestion.trim();
        if suggestion.is_empty() {
            return Err(EngineError::EmptySuggestion);
        }
        Ok((critique.to_string(), suggestion.to_string()))
    }

    /// Submit the draft critique for the turn under critique, with locally
    /// allocated entry ids.
    pub fn submit_critique(&mut self) -> Result<CritiquePair, EngineError> {
        self.submit_critique_with(None)
    }

    /// Submit the draft critique, preferring the given (critique,
    /// suggestion) ids, typically backend-issued. Ids that collide with
    /// the log or with each other are replaced by local allocation.
    ///
    /// On success the pair is inserted, in that order, immediately after
    /// the user entry's current position; the mode returns to normal and
    /// the draft is cleared. Validation failure leaves everything as it
    /// was.
    pub fn submit_critique_with(
        &mut self,
        ids: Option<(EntryId, EntryId)>,
    ) -> Result<CritiquePair, EngineError> {
        let user_id = self.mode.critiquing().ok_or(EngineError::NotCritiquing)?;
        let (critique_text, suggestion_text) = self.validate_draft()?;

        match self.log.get(user_id) {
            Some(e) if e.kind == EntryKind::User => {}
            Some(_) => return Err(EngineError::NotAUserEntry(user_id)),
            None => return Err(EngineError::UnknownEntry(user_id)),
        }

        let (critique_id, suggestion_id) = match ids {
            Some((c, s)) if c != s && !self.log.contains(c) && !self.log.contains(s) => (c, s),
            _ => (self.log.allocate_id(), self.log.allocate_id()),
        };

        self.log.insert_after(
            user_id,
            vec![
                Entry::critique(critique_id, user_id, critique_text),
                Entry::suggestion(suggestion_id, user_id, suggestion_text),
            ],
        )?;

        self.mode = InputMode::Normal;
        self.draft.clear();
        Ok(CritiquePair {
            critique: critique_id,
            suggestion: suggestion_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two turns: U1 with candidates A1(m1), A2(m2); U2 with A3(m1).
    fn sample_state() -> (ConversationState, [EntryId; 5]) {
        let mut state = ConversationState::new();
        let u1 = state.append_user("first question");
        let a1 = state.append_response(None, "m1", "answer a", None);
        let a2 = state.append_response(None, "m2", "answer b", None);
        let u2 = state.append_user("second question");
        let a3 = state.append_response(None, "m1", "answer c", None);
        (state, [u1, a1, a2, u2, a3])
    }

    #[test]
    fn test_select_sets_exactly_one_in_turn() {
        let (mut state, [_, a1, a2, _, a3]) = sample_state();
        state.select_response(a2).unwrap();

        assert!(!state.log().get(a1).unwrap().selected);
        assert!(state.log().get(a2).unwrap().selected);
        // Other turn untouched
        assert!(!state.log().get(a3).unwrap().selected);
    }

    #[test]
    fn test_reselect_moves_selection_within_turn() {
        let (mut state, [_, a1, a2, _, _]) = sample_state();
        state.select_response(a2).unwrap();
        state.select_response(a1).unwrap();

        assert!(state.log().get(a1).unwrap().selected);
        assert!(!state.log().get(a2).unwrap().selected);
    }

    #[test]
    fn test_select_does_not_cross_turns() {
        let (mut state, [_, _, a2, _, a3]) = sample_state();
        state.select_response(a2).unwrap();
        state.select_response(a3).unwrap();

        // Each turn keeps its own single selection.
        assert!(state.log().get(a2).unwrap().selected);
        assert!(state.log().get(a3).unwrap().selected);
    }

    #[test]
    fn test_select_rejects_non_response_ids() {
        let (mut state, [u1, ..]) = sample_state();
        assert_eq!(
            state.select_response(u1),
            Err(EngineError::NotASelectableEntry(u1))
        );
        assert_eq!(
            state.select_response(EntryId::new(999)),
            Err(EngineError::UnknownEntry(EntryId::new(999)))
        );
    }

    #[test]
    fn test_select_orphan_response() {
        let mut state = ConversationState::new();
        let orphan = state.append_response(None, "m1", "stray", None);
        assert_eq!(
            state.select_response(orphan),
            Err(EngineError::OrphanResponse(orphan))
        );
    }

    #[test]
    fn test_reject_removes_run_and_enters_critique() {
        let (mut state, [u1, a1, a2, u2, a3]) = sample_state();
        let removed = state.reject_turn(u1).unwrap();
        assert_eq!(removed, vec![a1, a2]);

        let ids: Vec<EntryId> = state.log().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![u1, u2, a3]);
        assert_eq!(state.mode(), InputMode::Critiquing(u1));
        assert_eq!(state.draft(), &CritiqueDraft::default());
    }

    #[test]
    fn test_reject_then_compute_turn_is_empty() {
        let (mut state, [u1, ..]) = sample_state();
        state.reject_turn(u1).unwrap();
        assert!(state.turn_candidates(u1).is_empty());
    }

    #[test]
    fn test_reject_overwrites_open_critique() {
        let (mut state, [u1, _, _, u2, _]) = sample_state();
        state.reject_turn(u1).unwrap();
        state.set_critique_text("half-written");

        state.reject_turn(u2).unwrap();
        assert_eq!(state.mode(), InputMode::Critiquing(u2));
        // Draft from the previous critique is gone, not stacked.
        assert!(state.draft().critique.is_empty());
    }

    #[test]
    fn test_submit_requires_non_empty_texts() {
        let (mut state, [u1, ..]) = sample_state();
        state.reject_turn(u1).unwrap();
        let len_before = state.log().len();

        state.set_critique_text("too vague");
        state.set_suggestion_text("   ");
        assert_eq!(state.submit_critique(), Err(EngineError::EmptySuggestion));

        // Validation failure changes nothing.
        assert_eq!(state.log().len(), len_before);
        assert_eq!(state.mode(), InputMode::Critiquing(u1));
        assert_eq!(state.draft().critique, "too vague");
    }

    #[test]
    fn test_submit_inserts_pair_after_user_entry() {
        let (mut state, [u1, _, _, u2, a3]) = sample_state();
        state.reject_turn(u1).unwrap();
        state.set_critique_text("too vague");
        state.set_suggestion_text("be more specific");

        let pair = state.submit_critique().unwrap();

        let ids: Vec<EntryId> = state.log().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![u1, pair.critique, pair.suggestion, u2, a3]);

        let critique = state.log().get(pair.critique).unwrap();
        assert_eq!(critique.kind, EntryKind::Critique);
        assert_eq!(critique.content, "too vague");
        assert_eq!(critique.related_to, Some(u1));

        let suggestion = state.log().get(pair.suggestion).unwrap();
        assert_eq!(suggestion.kind, EntryKind::Suggestion);
        assert_eq!(suggestion.related_to, Some(u1));

        assert_ne!(pair.critique, pair.suggestion);
        assert_eq!(state.mode(), InputMode::Normal);
        assert_eq!(state.draft(), &CritiqueDraft::default());
    }

    #[test]
    fn test_submit_uses_backend_ids_when_free() {
        let (mut state, [u1, ..]) = sample_state();
        state.reject_turn(u1).unwrap();
        state.set_critique_text("c");
        state.set_suggestion_text("s");

        let wanted = (EntryId::new(500), EntryId::new(501));
        let pair = state.submit_critique_with(Some(wanted)).unwrap();
        assert_eq!((pair.critique, pair.suggestion), wanted);
    }

    #[test]
    fn test_submit_falls_back_on_colliding_ids() {
        let (mut state, [u1, _, _, u2, _]) = sample_state();
        state.reject_turn(u1).unwrap();
        state.set_critique_text("c");
        state.set_suggestion_text("s");

        // u2's id is taken; the whole pair falls back to local allocation.
        let pair = state.submit_critique_with(Some((u2, EntryId::new(501)))).unwrap();
        assert_ne!(pair.critique, u2);
        assert_ne!(pair.critique, pair.suggestion);
        assert!(state.log().contains(pair.critique));
        assert!(state.log().contains(pair.suggestion));
    }

    #[test]
    fn test_submit_outside_critique_mode() {
        let (mut state, _) = sample_state();
        state.set_critique_text("c");
        state.set_suggestion_text("s");
        assert_eq!(state.submit_critique(), Err(EngineError::NotCritiquing));
    }

    #[test]
    fn test_cancel_returns_to_normal() {
        let (mut state, [u1, ..]) = sample_state();
        state.reject_turn(u1).unwrap();
        state.set_critique_text("never mind");
        state.cancel_critique();

        assert_eq!(state.mode(), InputMode::Normal);
        assert!(state.draft().critique.is_empty());
    }

    #[test]
    fn test_backend_response_id_collision_falls_back() {
        let mut state = ConversationState::new();
        let u1 = state.append_user("q");
        let taken = state.append_response(None, "m1", "a", None);

        // Backend hands back an id we already hold.
        let id = state.append_response(Some(taken), "m2", "b", None);
        assert_ne!(id, taken);
        assert_eq!(state.turn_candidates(u1).len(), 2);
    }
}
