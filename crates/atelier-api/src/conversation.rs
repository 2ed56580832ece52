//! Conversation endpoints.

use crate::error::ApiError;
use atelier_common_core::{ConversationId, EntryId, Timestamp};
use atelier_common_http::ApiClient;
use atelier_conversation::{Entry, EntryKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored conversation, as listed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub title: String,
    #[serde(default)]
    pub message_count: u32,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConversationsEnvelope {
    conversations: Vec<ConversationSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessagesEnvelope {
    messages: Vec<MessageDto>,
}

/// A message on the wire. `sender` is the backend's spelling of the entry
/// kind (`ai`, not `ai-response`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: EntryId,
    pub sender: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_to: Option<EntryId>,
}

impl MessageDto {
    /// Map the wire sender to an engine entry kind.
    pub fn kind(&self) -> Option<EntryKind> {
        match self.sender.as_str() {
            "user" => Some(EntryKind::User),
            "ai" => Some(EntryKind::AiResponse),
            "critique" => Some(EntryKind::Critique),
            "suggestion" => Some(EntryKind::Suggestion),
            "system" => Some(EntryKind::System),
            _ => None,
        }
    }

    /// Convert to a log entry. Returns `None` for sender values the client
    /// does not know.
    pub fn into_entry(self) -> Option<Entry> {
        let kind = self.kind()?;
        let timestamp = self
            .timestamp
            .as_deref()
            .and_then(|s| s.parse::<DateTime<Utc>>().ok())
            .map(Timestamp::from_datetime)
            .unwrap_or_default();

        Some(Entry {
            id: self.id,
            kind,
            content: self.content,
            timestamp,
            model: self.model,
            reasoning: self.reasoning,
            selected: self.selected.unwrap_or(false),
            related_to: self.related_to,
        })
    }
}

/// Request body for creating a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConversationRequest {
    pub title: String,
}

/// Request body for sending a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    pub models: Vec<String>,
}

/// Candidate responses returned for a sent message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub responses: Vec<MessageDto>,
}

/// Acknowledgement of a persisted selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectResponseAck {
    pub status: String,
    pub message_id: EntryId,
    pub selected: bool,
}

/// Request body for persisting a critique/suggestion pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CritiqueRequest {
    pub critique: String,
    pub suggestion: String,
}

/// Backend-issued ids for a persisted critique/suggestion pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CritiqueResponse {
    pub status: String,
    pub critique_id: EntryId,
    pub suggestion_id: EntryId,
}

/// Client for the conversation endpoints.
#[derive(Debug, Clone)]
pub struct ConversationClient {
    api: ApiClient,
}

impl ConversationClient {
    /// Wrap an authenticated API client.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /conversations`
    pub async fn list(&self) -> Result<Vec<ConversationSummary>, ApiError> {
        let envelope: ConversationsEnvelope = self.api.get_json("/conversations").await?;
        Ok(envelope.conversations)
    }

    /// `POST /conversations`
    pub async fn create(&self, title: &str) -> Result<ConversationSummary, ApiError> {
        let request = CreateConversationRequest {
            title: title.to_string(),
        };
        Ok(self.api.post_json("/conversations", &request).await?)
    }

    /// `GET /conversations/{id}/messages`
    pub async fn messages(&self, id: ConversationId) -> Result<Vec<MessageDto>, ApiError> {
        let envelope: MessagesEnvelope = self
            .api
            .get_json(&format!("/conversations/{id}/messages"))
            .await?;
        Ok(envelope.messages)
    }

    /// `POST /conversations/{id}/messages`
    pub async fn send_message(
        &self,
        id: ConversationId,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, ApiError> {
        Ok(self
            .api
            .post_json(&format!("/conversations/{id}/messages"), request)
            .await?)
    }

    /// `POST /conversations/messages/{id}/select`
    pub async fn select_response(&self, message: EntryId) -> Result<SelectResponseAck, ApiError> {
        Ok(self
            .api
            .post_json(
                &format!("/conversations/messages/{message}/select"),
                &serde_json::json!({}),
            )
            .await?)
    }

    /// `POST /conversations/messages/{id}/critique`
    pub async fn critique_response(
        &self,
        message: EntryId,
        request: &CritiqueRequest,
    ) -> Result<CritiqueResponse, ApiError> {
        Ok(self
            .api
            .post_json(
                &format!("/conversations/messages/{message}/critique"),
                request,
            )
            .await?)
    }
}
