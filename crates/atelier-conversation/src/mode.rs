//! Input-mode state machine.

use atelier_common_core::EntryId;

/// What the conversation input is currently doing.
///
/// Only one turn can be critiqued at a time: rejecting a turn while another
/// critique is open overwrites the mode (never a stack).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Composing ordinary messages.
    #[default]
    Normal,
    /// Authoring a critique for the given `user` entry's rejected turn.
    Critiquing(EntryId),
}

impl InputMode {
    /// The turn currently under critique, if any.
    pub fn critiquing(&self) -> Option<EntryId> {
        match self {
            Self::Critiquing(id) => Some(*id),
            Self::Normal => None,
        }
    }
}

/// In-progress critique text, cleared on every mode transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CritiqueDraft {
    /// Why the rejected candidates were unsatisfactory.
    pub critique: String,
    /// The curator's replacement answer.
    pub suggestion: String,
}

impl CritiqueDraft {
    /// Discard both buffers.
    pub fn clear(&mut self) {
        self.critique.clear();
        self.suggestion.clear();
    }
}
