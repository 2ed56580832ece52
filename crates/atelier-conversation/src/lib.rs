//! Conversation log model and turn association engine.
//!
//! A conversation is a flat, time-ordered log of entries: user messages,
//! candidate AI responses, critique/suggestion pairs and system notices.
//! Turns are never stored; a turn is derived as one `user` entry plus the
//! run of candidate responses that follows it. This crate owns that
//! derivation and the bookkeeping around it (single-select among a turn's
//! candidates, turn rejection, critique authoring) as a plain state store
//! with no I/O and no rendering concerns.

pub mod entry;
pub mod error;
pub mod log;
pub mod mode;
pub mod state;
pub mod turn;

pub use entry::{Entry, EntryKind};
pub use error::EngineError;
pub use log::ConversationLog;
pub use mode::{CritiqueDraft, InputMode};
pub use state::{ConversationState, CritiquePair};
pub use turn::{compute_turn, owning_user};
