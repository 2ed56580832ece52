//! Knowledge-base sample generation flow.
//!
//! Mirrors the curation UI's "generate suggestions" button: create the
//! knowledge base, start the generation job, poll until the backend says
//! it is done.

use crate::error::WorkbenchError;
use crate::jobs::{poll_until_terminal, PollConfig};
use atelier_api::knowledge_base::{
    CreateKnowledgeBaseRequest, GenerateSamplesRequest, GenerationStatus,
};
use atelier_api::KnowledgeBaseClient;
use atelier_common_core::{JobId, KnowledgeBaseId};

/// Parameters for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Knowledge base name.
    pub name: String,
    /// Knowledge base description.
    pub description: String,
    /// Instructions for the generator.
    pub instructions: String,
    /// Number of samples to generate.
    pub sample_count: u32,
    /// Model used for generation.
    pub model: String,
    /// Status poll configuration.
    pub poll: PollConfig,
}

impl GenerationRequest {
    /// The defaults the UI used: description and instructions derived from
    /// the knowledge base name.
    pub fn for_knowledge_base(name: &str, sample_count: u32, model: &str, poll: PollConfig) -> Self {
        Self {
            name: name.to_string(),
            description: format!("Knowledge base for {name}"),
            instructions: format!("This knowledge base contains examples related to {name}"),
            sample_count,
            model: model.to_string(),
            poll,
        }
    }
}

/// Result of a finished generation run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// The created knowledge base.
    pub knowledge_base_id: KnowledgeBaseId,
    /// The backend job that produced the samples.
    pub job_id: JobId,
    /// Last observed status; terminal, but not necessarily successful.
    pub final_status: GenerationStatus,
}

/// Run a full generation cycle, reporting each status observation.
///
/// A poll failure aborts the run with [`crate::jobs::JobError::Poll`]; the
/// caller decides how to surface it. The final status may be an error
/// status; inspect `final_status.job_status()`.
pub async fn run_generation(
    client: &KnowledgeBaseClient,
    request: GenerationRequest,
    observe: impl FnMut(&GenerationStatus),
) -> Result<GenerationReport, WorkbenchError> {
    let created = client
        .create(&CreateKnowledgeBaseRequest {
            name: request.name.clone(),
            description: request.description.clone(),
            instructions: request.instructions.clone(),
        })
        .await?;
    tracing::info!(id = %created.id, name = %created.name, "knowledge base created");

    let started = client
        .generate_samples(
            created.id,
            &GenerateSamplesRequest {
                sample_count: request.sample_count,
                model: request.model.clone(),
            },
        )
        .await?;
    tracing::info!(job = %started.job_id, "generation started");

    let job_id = started.job_id.clone();
    let final_status = poll_until_terminal(
        request.poll,
        || client.generation_status(&job_id),
        observe,
    )
    .await?;

    Ok(GenerationReport {
        knowledge_base_id: created.id,
        job_id: started.job_id,
        final_status,
    })
}
