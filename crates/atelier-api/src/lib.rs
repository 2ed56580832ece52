//! Typed clients for the curation backend's REST API.
//!
//! The wire contract is the real external interface: request and response
//! field names are reproduced exactly as the backend speaks them
//! (camelCase), via serde renames. Nothing here retries; every failure is
//! a typed [`ApiError`] for the caller to surface.

pub mod backend;
pub mod conversation;
pub mod error;
pub mod knowledge_base;
pub mod training;

pub use backend::ConversationBackend;
pub use conversation::ConversationClient;
pub use error::ApiError;
pub use knowledge_base::KnowledgeBaseClient;
pub use training::TrainingClient;
