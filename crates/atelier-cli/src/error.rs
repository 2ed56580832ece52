//! CLI error handling.

use std::io;
use std::process::ExitCode;

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] atelier_common_config::ConfigError),

    #[error("Credential error: {0}")]
    Credentials(#[from] atelier_common_config::EnvError),

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("Backend error: {0}")]
    Api(#[from] atelier_api::ApiError),

    #[error("{0}")]
    Workbench(#[from] atelier_workbench::WorkbenchError),

    #[error("HTTP client error: {0}")]
    Http(#[from] atelier_common_http::HttpError),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        let code = match self {
            Self::Config(_) | Self::Credentials(_) => 2,
            Self::Io(_) => 3,
            Self::Api(_) | Self::Http(_) | Self::Workbench(_) => 4,
            Self::InvalidInput(_) => 5,
            Self::Other(_) => 1,
        };
        ExitCode::from(code)
    }
}
