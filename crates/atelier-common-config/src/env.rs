//! Environment variable and credential handling.

use std::env;
use std::path::Path;
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("required environment variable not set: {var}")]
    NotSet { var: String },

    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("no API token found (set {var} or write .atelier/credentials)")]
    MissingToken { var: String },

    #[error("failed to read credentials file: {0}")]
    CredentialsRead(#[from] std::io::Error),
}

/// Environment variable names.
pub mod vars {
    /// Bearer token for the curation backend.
    pub const ATELIER_API_TOKEN: &str = "ATELIER_API_TOKEN";
    /// Override for the backend base URL.
    pub const ATELIER_API_URL: &str = "ATELIER_API_URL";

    // Configuration
    pub const ATELIER_CONFIG_PATH: &str = "ATELIER_CONFIG_PATH";
    pub const ATELIER_LOG_LEVEL: &str = "ATELIER_LOG_LEVEL";

    // Development
    pub const RUST_LOG: &str = "RUST_LOG";
    pub const RUST_BACKTRACE: &str = "RUST_BACKTRACE";
}

/// Environment configuration.
pub struct Environment {
    _guard: (), // Prevent construction outside module
}

impl Environment {
    /// Initialize environment from .env files.
    pub fn init() -> Self {
        // Load .env files in order (later overrides earlier)
        let _ = dotenvy::from_filename(".env");
        let _ = dotenvy::from_filename(".env.local");

        Self { _guard: () }
    }

    /// Get a required string variable.
    pub fn require(var: &str) -> Result<String, EnvError> {
        env::var(var).map_err(|_| EnvError::NotSet {
            var: var.to_string(),
        })
    }

    /// Get an optional string variable.
    pub fn get(var: &str) -> Option<String> {
        env::var(var).ok()
    }

    /// Get a variable with a default value.
    pub fn get_or(var: &str, default: &str) -> String {
        env::var(var).unwrap_or_else(|_| default.to_string())
    }
}

/// Bearer-token access for the curation backend.
///
/// The token lives in local client storage: the `ATELIER_API_TOKEN`
/// environment variable wins, then the `.atelier/credentials` file
/// (first non-empty line) in the project directory.
pub struct ApiCredentials;

impl ApiCredentials {
    /// Load the bearer token for the given project directory.
    pub fn load(project_dir: impl AsRef<Path>) -> Result<String, EnvError> {
        if let Some(token) = Environment::get(vars::ATELIER_API_TOKEN) {
            let token = token.trim().to_string();
            if !token.is_empty() {
                return Ok(token);
            }
        }

        let path = project_dir.as_ref().join(".atelier/credentials");
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if let Some(token) = contents.lines().map(str::trim).find(|l| !l.is_empty()) {
                return Ok(token.to_string());
            }
        }

        Err(EnvError::MissingToken {
            var: vars::ATELIER_API_TOKEN.to_string(),
        })
    }

    /// Store the bearer token in the project credentials file.
    pub fn store(project_dir: impl AsRef<Path>, token: &str) -> Result<(), EnvError> {
        let dir = project_dir.as_ref().join(".atelier");
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("credentials"), format!("{}\n", token.trim()))?;
        Ok(())
    }
}
