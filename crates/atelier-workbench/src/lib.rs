//! Curation session orchestration.
//!
//! Ties the pure conversation engine to a backend: sending messages and
//! absorbing candidate responses, persisting selections and critiques, and
//! driving generation/training jobs by polling. Backend failures never
//! crash a session; they surface as `system` entries in the log.

pub mod error;
pub mod generation;
pub mod jobs;
pub mod session;
pub mod training;

pub use error::WorkbenchError;
pub use generation::{run_generation, GenerationReport, GenerationRequest};
pub use jobs::{poll_until_terminal, JobError, JobHandle, PollConfig};
pub use session::{ChatSession, SessionConfig, BACKEND_ERROR_NOTICE};
pub use training::{run_training, TrainingReport};
