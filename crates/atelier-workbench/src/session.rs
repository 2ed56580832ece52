//! A live curation session over one conversation.

use crate::error::WorkbenchError;
use atelier_api::conversation::{CritiqueRequest, SendMessageRequest};
use atelier_api::ConversationBackend;
use atelier_common_core::{ConversationId, EntryId};
use atelier_conversation::{
    ConversationState, CritiquePair, EngineError, Entry, InputMode,
};
use tokio::sync::Mutex;

/// Notice appended to the log when a backend call fails.
pub const BACKEND_ERROR_NOTICE: &str =
    "Une erreur est survenue lors de la communication avec l'API.";

/// Session parameters.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Title used when the conversation is lazily created on first send.
    pub title: String,
    /// Models asked for candidate responses, in request order.
    pub models: Vec<String>,
}

struct Inner {
    state: ConversationState,
    conversation_id: Option<ConversationId>,
}

/// A conversation being curated against a backend.
///
/// The engine state is the single source of truth; the backend is notified
/// of everything worth persisting. All log mutation goes through `inner`;
/// `send_lock` serializes whole send round-trips so overlapping sends
/// queue instead of interleaving their responses.
pub struct ChatSession<B> {
    backend: B,
    config: SessionConfig,
    inner: Mutex<Inner>,
    send_lock: Mutex<()>,
}

impl<B: ConversationBackend> ChatSession<B> {
    /// Start an empty session. The remote conversation is created on the
    /// first send.
    pub fn new(backend: B, config: SessionConfig) -> Self {
        Self {
            backend,
            config,
            inner: Mutex::new(Inner {
                state: ConversationState::new(),
                conversation_id: None,
            }),
            send_lock: Mutex::new(()),
        }
    }

    /// The remote conversation id, once created or loaded.
    pub async fn conversation_id(&self) -> Option<ConversationId> {
        self.inner.lock().await.conversation_id
    }

    /// Snapshot of the log entries in order.
    pub async fn entries(&self) -> Vec<Entry> {
        self.inner.lock().await.state.log().entries().to_vec()
    }

    /// Current input mode.
    pub async fn mode(&self) -> InputMode {
        self.inner.lock().await.state.mode()
    }

    /// Candidate responses of a user entry's turn.
    pub async fn turn_candidates(&self, user_entry_id: EntryId) -> Vec<Entry> {
        let inner = self.inner.lock().await;
        inner
            .state
            .turn_candidates(user_entry_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Replace the session contents with a persisted conversation.
    pub async fn load(&self, conversation: ConversationId) -> Result<(), WorkbenchError> {
        let messages = self.backend.conversation_messages(conversation).await?;
        let entries: Vec<Entry> = messages
            .into_iter()
            .filter_map(|dto| {
                let id = dto.id;
                let entry = dto.into_entry();
                if entry.is_none() {
                    tracing::warn!(%id, "dropping message with unknown sender");
                }
                entry
            })
            .collect();

        let state = ConversationState::from_entries(entries)?;
        let mut inner = self.inner.lock().await;
        inner.state = state;
        inner.conversation_id = Some(conversation);
        Ok(())
    }

    /// Send a message and absorb the returned candidate responses.
    ///
    /// Returns the ids of the appended candidates. On backend failure the
    /// user entry stays in the log, a `system` notice is appended, and the
    /// error is returned for the caller to log.
    pub async fn send(&self, content: &str) -> Result<Vec<EntryId>, WorkbenchError> {
        // One send at a time per session; later calls queue here.
        let _flight = self.send_lock.lock().await;

        let user_id = {
            let mut inner = self.inner.lock().await;
            inner.state.append_user(content)
        };

        match self.round_trip(content).await {
            Ok(responses) => {
                let mut inner = self.inner.lock().await;
                let mut appended = Vec::new();
                for dto in responses {
                    match dto.kind() {
                        Some(atelier_conversation::EntryKind::AiResponse) => {
                            let model = dto.model.clone().unwrap_or_else(|| "unknown".to_string());
                            let id = inner.state.append_response(
                                Some(dto.id),
                                model,
                                dto.content,
                                dto.reasoning,
                            );
                            appended.push(id);
                        }
                        _ => {
                            tracing::warn!(id = %dto.id, sender = %dto.sender,
                                "ignoring non-candidate entry in send response");
                        }
                    }
                }
                tracing::debug!(user = %user_id, candidates = appended.len(), "send completed");
                Ok(appended)
            }
            Err(err) => {
                tracing::error!(error = %err, "send failed");
                let mut inner = self.inner.lock().await;
                inner.state.append_system(BACKEND_ERROR_NOTICE);
                Err(err)
            }
        }
    }

    /// The network half of a send: lazy conversation creation plus the
    /// message post.
    async fn round_trip(
        &self,
        content: &str,
    ) -> Result<Vec<atelier_api::conversation::MessageDto>, WorkbenchError> {
        // Copy the id out before any further await; holding the state lock
        // across the create call would deadlock the re-lock below.
        let existing = {
            let inner = self.inner.lock().await;
            inner.conversation_id
        };
        let conversation = match existing {
            Some(id) => id,
            None => {
                let created = self.backend.create_conversation(&self.config.title).await?;
                self.inner.lock().await.conversation_id = Some(created.id);
                created.id
            }
        };

        let request = SendMessageRequest {
            content: content.to_string(),
            models: self.config.models.clone(),
        };
        let response = self.backend.send_message(conversation, request).await?;
        Ok(response.responses)
    }

    /// Select a candidate response and persist the choice.
    ///
    /// Ids that do not name a candidate are a quiet no-op. A persistence
    /// failure keeps the local selection and surfaces a `system` notice.
    pub async fn select(&self, response_id: EntryId) -> Result<(), WorkbenchError> {
        {
            let mut inner = self.inner.lock().await;
            match inner.state.select_response(response_id) {
                Ok(()) => {}
                Err(
                    err @ (EngineError::UnknownEntry(_)
                    | EngineError::NotASelectableEntry(_)
                    | EngineError::OrphanResponse(_)),
                ) => {
                    tracing::debug!(error = %err, "ignoring selection of a non-candidate");
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            }
        }

        if let Err(err) = self.backend.select_response(response_id).await {
            tracing::warn!(error = %err, "selection not persisted");
            let mut inner = self.inner.lock().await;
            inner.state.append_system(BACKEND_ERROR_NOTICE);
            return Err(err.into());
        }
        Ok(())
    }

    /// Reject a turn's candidates and enter critique mode.
    pub async fn reject(&self, user_entry_id: EntryId) -> Result<Vec<EntryId>, WorkbenchError> {
        let mut inner = self.inner.lock().await;
        Ok(inner.state.reject_turn(user_entry_id)?)
    }

    /// Update the critique text of the draft.
    pub async fn set_critique_text(&self, text: &str) {
        self.inner.lock().await.state.set_critique_text(text);
    }

    /// Update the suggestion text of the draft.
    pub async fn set_suggestion_text(&self, text: &str) {
        self.inner.lock().await.state.set_suggestion_text(text);
    }

    /// Abandon the critique in progress.
    pub async fn cancel_critique(&self) {
        self.inner.lock().await.state.cancel_critique();
    }

    /// Submit the drafted critique/suggestion pair.
    ///
    /// The pair is persisted first and inserted locally only on success,
    /// with the backend-issued ids. On failure the session stays in
    /// critique mode with the draft intact, ready to retry.
    pub async fn submit_critique(&self) -> Result<CritiquePair, WorkbenchError> {
        let (user_id, critique_text, suggestion_text) = {
            let inner = self.inner.lock().await;
            let user_id = inner
                .state
                .mode()
                .critiquing()
                .ok_or(EngineError::NotCritiquing)?;
            let (critique, suggestion) = inner.state.validate_draft()?;
            (user_id, critique, suggestion)
        };

        let request = CritiqueRequest {
            critique: critique_text,
            suggestion: suggestion_text,
        };
        let response = match self.backend.submit_critique(user_id, request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "critique not persisted; draft kept");
                let mut inner = self.inner.lock().await;
                inner.state.append_system(BACKEND_ERROR_NOTICE);
                return Err(err.into());
            }
        };

        let mut inner = self.inner.lock().await;
        let pair = inner
            .state
            .submit_critique_with(Some((response.critique_id, response.suggestion_id)))?;
        tracing::debug!(critique = %pair.critique, suggestion = %pair.suggestion,
            "critique submitted");
        Ok(pair)
    }
}
