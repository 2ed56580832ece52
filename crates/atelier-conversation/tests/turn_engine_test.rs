//! End-to-end tests for the turn association engine.

use atelier_common_core::EntryId;
use atelier_conversation::{
    compute_turn, ConversationState, Entry, EntryKind, InputMode,
};
use proptest::prelude::*;

/// The full curation cycle on one conversation: compare, select, reject,
/// critique.
#[test]
fn curation_cycle() {
    let mut state = ConversationState::new();

    let u1 = state.append_user("Explain gradient descent");
    let a1 = state.append_response(None, "gpt-4-turbo", "It is an optimizer...", None);
    let a2 = state.append_response(
        None,
        "claude-3-opus",
        "Start from the loss surface...",
        Some("compared three formulations".to_string()),
    );
    let u2 = state.append_user("Now with a concrete example");
    let a3 = state.append_response(None, "gpt-4-turbo", "Take f(x) = x^2...", None);

    // compute_turn(U1) -> [A1, A2]
    let turn: Vec<EntryId> = compute_turn(state.log(), u1).iter().map(|e| e.id).collect();
    assert_eq!(turn, vec![a1, a2]);

    // selectResponse(A2): A2 selected, A1 cleared, A3 untouched.
    state.select_response(a2).unwrap();
    assert!(state.log().get(a2).unwrap().selected);
    assert!(!state.log().get(a1).unwrap().selected);
    assert!(!state.log().get(a3).unwrap().selected);

    // rejectTurn(U1): log becomes [U1, U2, A3], mode Critiquing(U1).
    state.reject_turn(u1).unwrap();
    let ids: Vec<EntryId> = state.log().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![u1, u2, a3]);
    assert_eq!(state.mode(), InputMode::Critiquing(u1));

    // submitCritique inserts the pair right after U1.
    state.set_critique_text("too vague");
    state.set_suggestion_text("be more specific");
    let pair = state.submit_critique().unwrap();

    let shape: Vec<(EntryKind, EntryId)> =
        state.log().iter().map(|e| (e.kind, e.id)).collect();
    assert_eq!(
        shape,
        vec![
            (EntryKind::User, u1),
            (EntryKind::Critique, pair.critique),
            (EntryKind::Suggestion, pair.suggestion),
            (EntryKind::User, u2),
            (EntryKind::AiResponse, a3),
        ]
    );

    // The pair never collides, even created in one operation.
    assert_ne!(pair.critique, pair.suggestion);

    // A rejected turn has no candidates left.
    assert!(compute_turn(state.log(), u1).is_empty());
    assert_eq!(state.mode(), InputMode::Normal);
}

/// A turn rejected while another critique is open replaces it outright.
#[test]
fn rejection_is_not_a_stack() {
    let mut state = ConversationState::new();
    let u1 = state.append_user("first");
    state.append_response(None, "m1", "a", None);
    let u2 = state.append_user("second");
    state.append_response(None, "m1", "b", None);

    state.reject_turn(u1).unwrap();
    state.set_critique_text("draft for the first turn");
    state.reject_turn(u2).unwrap();

    assert_eq!(state.mode(), InputMode::Critiquing(u2));
    assert!(state.draft().critique.is_empty());
}

// Property-based checks over arbitrary logs.

#[derive(Debug, Clone)]
enum Item {
    User,
    Response,
    System,
}

fn item_strategy() -> impl Strategy<Value = Item> {
    prop_oneof![
        2 => Just(Item::User),
        5 => Just(Item::Response),
        1 => Just(Item::System),
    ]
}

fn build_state(items: &[Item]) -> ConversationState {
    let mut state = ConversationState::new();
    for (i, item) in items.iter().enumerate() {
        match item {
            Item::User => {
                state.append_user(format!("question {i}"));
            }
            Item::Response => {
                state.append_response(None, "m1", format!("answer {i}"), None);
            }
            Item::System => {
                state.append_system(format!("notice {i}"));
            }
        }
    }
    state
}

proptest! {
    /// Candidates are exactly the ai-response entries between the user
    /// entry and the next user entry, and computing them never mutates.
    #[test]
    fn turn_is_contiguous_and_pure(items in prop::collection::vec(item_strategy(), 0..40)) {
        let state = build_state(&items);
        let before: Vec<Entry> = state.log().entries().to_vec();

        for user in state.log().iter().filter(|e| e.kind == EntryKind::User) {
            let candidates = compute_turn(state.log(), user.id);

            let start = state.log().position(user.id).unwrap();
            let entries = state.log().entries();
            let end = entries[start + 1..]
                .iter()
                .position(|e| e.kind == EntryKind::User)
                .map(|off| start + 1 + off)
                .unwrap_or(entries.len());

            let expected: Vec<EntryId> = entries[start + 1..end]
                .iter()
                .filter(|e| e.kind == EntryKind::AiResponse)
                .map(|e| e.id)
                .collect();
            let actual: Vec<EntryId> = candidates.iter().map(|e| e.id).collect();
            prop_assert_eq!(actual, expected);
        }

        prop_assert_eq!(state.log().entries(), &before[..]);
    }

    /// After selecting any response, its turn holds exactly one selected
    /// entry and every other turn keeps its prior selection state.
    #[test]
    fn selection_is_single_per_turn(items in prop::collection::vec(item_strategy(), 1..40)) {
        let mut state = build_state(&items);

        let responses: Vec<EntryId> = state
            .log()
            .iter()
            .filter(|e| e.kind == EntryKind::AiResponse)
            .map(|e| e.id)
            .collect();

        for target in responses {
            let result = state.select_response(target);
            if result.is_err() {
                // Orphan responses (no preceding user entry) stay a no-op.
                continue;
            }

            let users: Vec<EntryId> = state
                .log()
                .iter()
                .filter(|e| e.kind == EntryKind::User)
                .map(|e| e.id)
                .collect();
            for user in users {
                let selected = compute_turn(state.log(), user)
                    .iter()
                    .filter(|e| e.selected)
                    .count();
                prop_assert!(selected <= 1);
            }
        }
    }

    /// Rejecting any user turn leaves no candidates, never touches other
    /// turns' entries, and keeps the user entry itself.
    #[test]
    fn rejection_is_turn_local(items in prop::collection::vec(item_strategy(), 1..40)) {
        let mut state = build_state(&items);
        let users: Vec<EntryId> = state
            .log()
            .iter()
            .filter(|e| e.kind == EntryKind::User)
            .map(|e| e.id)
            .collect();

        if let Some(&victim) = users.first() {
            let doomed: Vec<EntryId> =
                compute_turn(state.log(), victim).iter().map(|e| e.id).collect();
            let survivors: Vec<EntryId> = state
                .log()
                .iter()
                .map(|e| e.id)
                .filter(|id| !doomed.contains(id))
                .collect();

            state.reject_turn(victim).unwrap();

            prop_assert!(compute_turn(state.log(), victim).is_empty());
            prop_assert!(state.log().contains(victim));
            let remaining: Vec<EntryId> = state.log().iter().map(|e| e.id).collect();
            prop_assert_eq!(remaining, survivors);
        }
    }

    /// Ids stay unique across every operation mix.
    #[test]
    fn ids_stay_unique(items in prop::collection::vec(item_strategy(), 0..40)) {
        let state = build_state(&items);
        let mut ids: Vec<EntryId> = state.log().iter().map(|e| e.id).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
    }
}
