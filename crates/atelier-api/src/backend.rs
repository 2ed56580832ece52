//! Backend seam for conversation persistence.

use crate::conversation::{
    ConversationSummary, CritiqueRequest, CritiqueResponse, MessageDto, SelectResponseAck,
    SendMessageRequest, SendMessageResponse,
};
use crate::error::ApiError;
use crate::ConversationClient;
use async_trait::async_trait;
use atelier_common_core::{ConversationId, EntryId};

/// The conversation operations the workbench needs from a backend.
///
/// The REST client is the production implementation; tests drive the
/// workbench through an in-memory fake.
#[async_trait]
pub trait ConversationBackend: Send + Sync {
    /// Create a conversation and return its record.
    async fn create_conversation(&self, title: &str) -> Result<ConversationSummary, ApiError>;

    /// Fetch the persisted messages of a conversation.
    async fn conversation_messages(
        &self,
        conversation: ConversationId,
    ) -> Result<Vec<MessageDto>, ApiError>;

    /// Send a message and receive candidate responses.
    async fn send_message(
        &self,
        conversation: ConversationId,
        request: SendMessageRequest,
    ) -> Result<SendMessageResponse, ApiError>;

    /// Persist a selection.
    async fn select_response(&self, message: EntryId) -> Result<SelectResponseAck, ApiError>;

    /// Persist a critique/suggestion pair; the backend issues the ids.
    async fn submit_critique(
        &self,
        message: EntryId,
        request: CritiqueRequest,
    ) -> Result<CritiqueResponse, ApiError>;
}

#[async_trait]
impl ConversationBackend for ConversationClient {
    async fn create_conversation(&self, title: &str) -> Result<ConversationSummary, ApiError> {
        self.create(title).await
    }

    async fn conversation_messages(
        &self,
        conversation: ConversationId,
    ) -> Result<Vec<MessageDto>, ApiError> {
        self.messages(conversation).await
    }

    async fn send_message(
        &self,
        conversation: ConversationId,
        request: SendMessageRequest,
    ) -> Result<SendMessageResponse, ApiError> {
        ConversationClient::send_message(self, conversation, &request).await
    }

    async fn select_response(&self, message: EntryId) -> Result<SelectResponseAck, ApiError> {
        ConversationClient::select_response(self, message).await
    }

    async fn submit_critique(
        &self,
        message: EntryId,
        request: CritiqueRequest,
    ) -> Result<CritiqueResponse, ApiError> {
        self.critique_response(message, &request).await
    }
}
