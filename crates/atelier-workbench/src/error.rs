//! Workbench error types.

use crate::jobs::JobError;
use atelier_api::ApiError;
use atelier_conversation::EngineError;
use thiserror::Error;

/// Errors from workbench operations.
#[derive(Debug, Error)]
pub enum WorkbenchError {
    /// A backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The conversation engine rejected the operation.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A polled job failed or was cancelled.
    #[error(transparent)]
    Job(#[from] JobError),
}
