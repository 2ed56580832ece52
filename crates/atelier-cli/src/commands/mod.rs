//! Command implementations.

mod chat;
mod conversations;
mod kb;
mod train;

pub use chat::ChatCommand;
pub use conversations::ConversationsCommand;
pub use kb::KbCommand;
pub use train::TrainCommand;
