//! Configuration types.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AtelierConfig {
    /// Backend API configuration.
    pub api: ApiConfig,
    /// Model selection configuration.
    pub models: ModelsConfig,
    /// Sample generation configuration.
    pub generation: GenerationConfig,
    /// Training configuration.
    pub training: TrainingConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the curation backend.
    pub base_url: String,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Which models candidate responses are requested from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Primary model id.
    pub primary: String,
    /// Secondary model id (must differ from primary).
    pub secondary: String,
    /// Models offered for selection.
    pub available: Vec<ModelEntry>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            primary: "gpt-4-turbo".to_string(),
            secondary: "claude-3-opus".to_string(),
            available: vec![
                ModelEntry::new("gpt-4-turbo", "GPT-4 Turbo", "OpenAI"),
                ModelEntry::new("gpt-4o", "GPT-4o", "OpenAI"),
                ModelEntry::new("claude-3-opus", "Claude 3 Opus", "Anthropic"),
                ModelEntry::new("claude-3-sonnet", "Claude 3 Sonnet", "Anthropic"),
                ModelEntry::new("gemini-pro", "Gemini Pro", "Google"),
                ModelEntry::new("llama-3-70b", "Llama 3 70B", "Meta"),
            ],
        }
    }
}

/// A selectable model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Stable model id sent to the backend.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Provider name.
    pub provider: String,
}

impl ModelEntry {
    /// Build an entry from string literals.
    pub fn new(id: &str, name: &str, provider: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            provider: provider.to_string(),
        }
    }
}

/// Sample generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Samples requested per generation run.
    pub total_samples: u32,
    /// Status poll interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            total_samples: 36,
            poll_interval_ms: 2000,
        }
    }
}

/// Training configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Progress poll interval in milliseconds.
    pub poll_interval_ms: u64,
    /// Default base model for new sessions.
    pub base_model: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
            base_model: "llama-3-70b".to_string(),
        }
    }
}
