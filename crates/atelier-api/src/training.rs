//! Training and evaluation endpoints.

use crate::error::ApiError;
use atelier_common_core::{CheckpointId, JobStatus, KnowledgeBaseId, TrainingSessionId};
use atelier_common_http::ApiClient;
use serde::{Deserialize, Serialize};

/// Metrics reported for a finished training session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetrics {
    pub accuracy: f64,
    pub loss: f64,
    pub f1_score: f64,
}

/// A past or running training session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSession {
    pub id: TrainingSessionId,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub duration: String,
    pub base_model: String,
    pub checkpoint: Option<CheckpointId>,
    pub metrics: SessionMetrics,
    #[serde(default)]
    pub knowledge_bases: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionsEnvelope {
    sessions: Vec<TrainingSession>,
}

/// One tracked evaluation metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingMetric {
    pub id: i64,
    pub name: String,
    pub value: f64,
    pub change: f64,
    #[serde(default)]
    pub date: String,
    pub checkpoint: CheckpointId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetricsEnvelope {
    metrics: Vec<TrainingMetric>,
}

/// Share of a knowledge base in the training mix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBaseShare {
    pub id: KnowledgeBaseId,
    pub distribution: f64,
}

/// Request body for starting a training session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTrainingRequest {
    pub base_model: String,
    pub use_checkpoint: bool,
    pub checkpoint_id: String,
    pub knowledge_bases: Vec<KnowledgeBaseShare>,
}

/// Acknowledgement for a started training session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTrainingResponse {
    pub session_id: TrainingSessionId,
    pub status: String,
    #[serde(default)]
    pub estimated_duration: String,
}

/// Polled progress of a training session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingProgress {
    pub session_id: TrainingSessionId,
    #[serde(default)]
    pub progress: f64,
    pub status: String,
    #[serde(default)]
    pub time_remaining: String,
}

impl TrainingProgress {
    /// The backend's status string as a typed job state.
    pub fn job_status(&self) -> JobStatus {
        JobStatus::parse(&self.status)
    }
}

/// Request body for a checkpoint smoke test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCheckpointRequest {
    pub message: String,
}

/// Metrics reported for a checkpoint test reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestMetrics {
    pub confidence: f64,
    #[serde(default)]
    pub response_time: String,
}

/// Reply from testing a checkpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCheckpointResponse {
    pub response: String,
    pub checkpoint: CheckpointId,
    #[serde(default)]
    pub date: String,
    pub metrics: TestMetrics,
}

/// Client for the training endpoints.
#[derive(Debug, Clone)]
pub struct TrainingClient {
    api: ApiClient,
}

impl TrainingClient {
    /// Wrap an authenticated API client.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /training/sessions`
    pub async fn sessions(&self) -> Result<Vec<TrainingSession>, ApiError> {
        let envelope: SessionsEnvelope = self.api.get_json("/training/sessions").await?;
        Ok(envelope.sessions)
    }

    /// `GET /training/metrics`
    pub async fn metrics(&self) -> Result<Vec<TrainingMetric>, ApiError> {
        let envelope: MetricsEnvelope = self.api.get_json("/training/metrics").await?;
        Ok(envelope.metrics)
    }

    /// `POST /training/sessions`
    pub async fn start_session(
        &self,
        request: &StartTrainingRequest,
    ) -> Result<StartTrainingResponse, ApiError> {
        Ok(self.api.post_json("/training/sessions", request).await?)
    }

    /// `GET /training/sessions/{id}/progress`
    pub async fn progress(&self, session: TrainingSessionId) -> Result<TrainingProgress, ApiError> {
        Ok(self
            .api
            .get_json(&format!("/training/sessions/{session}/progress"))
            .await?)
    }

    /// `POST /training/checkpoints/{id}/test`
    pub async fn test_checkpoint(
        &self,
        checkpoint: &CheckpointId,
        request: &TestCheckpointRequest,
    ) -> Result<TestCheckpointResponse, ApiError> {
        Ok(self
            .api
            .post_json(&format!("/training/checkpoints/{checkpoint}/test"), request)
            .await?)
    }
}
