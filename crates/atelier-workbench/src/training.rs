//! Training session flow.
//!
//! Start a session on the backend, then poll its progress to a terminal
//! status. Checkpoint testing is a plain client call and needs no flow.

use crate::error::WorkbenchError;
use crate::jobs::{poll_until_terminal, PollConfig};
use atelier_api::training::{StartTrainingRequest, TrainingProgress};
use atelier_api::TrainingClient;
use atelier_common_core::TrainingSessionId;

/// Result of a finished training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// The backend session.
    pub session_id: TrainingSessionId,
    /// Last observed progress; terminal, but not necessarily successful.
    pub final_progress: TrainingProgress,
}

/// Start a training session and poll it to completion, reporting each
/// progress observation.
pub async fn run_training(
    client: &TrainingClient,
    request: &StartTrainingRequest,
    poll: PollConfig,
    observe: impl FnMut(&TrainingProgress),
) -> Result<TrainingReport, WorkbenchError> {
    let started = client.start_session(request).await?;
    tracing::info!(session = %started.session_id, status = %started.status,
        "training session started");

    let session_id = started.session_id;
    let final_progress =
        poll_until_terminal(poll, || client.progress(session_id), observe).await?;

    Ok(TrainingReport {
        session_id,
        final_progress,
    })
}
