//! Knowledge-base endpoints.

use crate::error::ApiError;
use atelier_common_core::{JobId, JobStatus, KnowledgeBaseId};
use atelier_common_http::ApiClient;
use serde::{Deserialize, Serialize};

/// A knowledge base of generated samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBase {
    pub id: KnowledgeBaseId,
    pub name: String,
    #[serde(default)]
    pub samples: u32,
    #[serde(default)]
    pub last_updated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KnowledgeBasesEnvelope {
    knowledge_bases: Vec<KnowledgeBase>,
}

/// Request body for creating a knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateKnowledgeBaseRequest {
    pub name: String,
    pub description: String,
    pub instructions: String,
}

/// Record returned for a created knowledge base.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKnowledgeBaseResponse {
    pub id: KnowledgeBaseId,
    pub name: String,
    #[serde(default)]
    pub samples: u32,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub status: String,
}

/// Request body for starting sample generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSamplesRequest {
    pub sample_count: u32,
    pub model: String,
}

/// Handle for a started generation job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSamplesResponse {
    pub job_id: JobId,
    pub status: String,
    #[serde(default)]
    pub estimated_time: String,
}

/// Polled status of a generation job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStatus {
    pub job_id: JobId,
    pub status: String,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub samples_generated: u32,
    #[serde(default)]
    pub total_samples: u32,
}

impl GenerationStatus {
    /// The backend's status string as a typed job state.
    pub fn job_status(&self) -> JobStatus {
        JobStatus::parse(&self.status)
    }
}

/// Client for the knowledge-base endpoints.
#[derive(Debug, Clone)]
pub struct KnowledgeBaseClient {
    api: ApiClient,
}

impl KnowledgeBaseClient {
    /// Wrap an authenticated API client.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /knowledge-bases`
    pub async fn list(&self) -> Result<Vec<KnowledgeBase>, ApiError> {
        let envelope: KnowledgeBasesEnvelope = self.api.get_json("/knowledge-bases").await?;
        Ok(envelope.knowledge_bases)
    }

    /// `POST /knowledge-bases`
    pub async fn create(
        &self,
        request: &CreateKnowledgeBaseRequest,
    ) -> Result<CreateKnowledgeBaseResponse, ApiError> {
        Ok(self.api.post_json("/knowledge-bases", request).await?)
    }

    /// `POST /knowledge-bases/{id}/generate`
    pub async fn generate_samples(
        &self,
        id: KnowledgeBaseId,
        request: &GenerateSamplesRequest,
    ) -> Result<GenerateSamplesResponse, ApiError> {
        Ok(self
            .api
            .post_json(&format!("/knowledge-bases/{id}/generate"), request)
            .await?)
    }

    /// `GET /knowledge-bases/jobs/{jobId}`
    pub async fn generation_status(&self, job: &JobId) -> Result<GenerationStatus, ApiError> {
        Ok(self
            .api
            .get_json(&format!("/knowledge-bases/jobs/{job}"))
            .await?)
    }
}
