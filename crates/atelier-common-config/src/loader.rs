//! Configuration file loading and parsing.

use crate::types::AtelierConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

/// Configuration loader.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Load configuration from `.atelier/config.yaml`.
    pub fn load(&self) -> Result<AtelierConfig, ConfigError> {
        let config_path = self.base_path.join(".atelier/config.yaml");

        if !config_path.exists() {
            // Return defaults if no config file
            return Ok(AtelierConfig::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let expanded = self.expand_env_vars(&contents)?;

        let config: AtelierConfig =
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        self.validate(&config)?;
        Ok(config)
    }

    /// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
    fn expand_env_vars(&self, content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").unwrap();

        for cap in re.captures_iter(content) {
            let full_match = cap.get(0).unwrap().as_str();
            let var_name = &cap[1];
            let default = cap.get(2).map(|m| m.as_str());

            let value = match std::env::var(var_name) {
                Ok(v) => v,
                Err(_) => match default {
                    Some(d) => d.to_string(),
                    None => {
                        return Err(ConfigError::EnvVarNotFound {
                            var: var_name.to_string(),
                        })
                    }
                },
            };

            result = result.replace(full_match, &value);
        }

        Ok(result)
    }

    /// Validate configuration values.
    fn validate(&self, config: &AtelierConfig) -> Result<(), ConfigError> {
        if config.api.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "api.base_url must not be empty".to_string(),
            });
        }

        if config.models.primary == config.models.secondary {
            return Err(ConfigError::ValidationError {
                message: "models.secondary must differ from models.primary".to_string(),
            });
        }

        if config.generation.total_samples == 0 {
            return Err(ConfigError::ValidationError {
                message: "generation.total_samples must be greater than 0".to_string(),
            });
        }

        if config.generation.poll_interval_ms == 0 || config.training.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError {
                message: "poll_interval_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, config: &AtelierConfig) -> Result<(), ConfigError> {
        let config_dir = self.base_path.join(".atelier");
        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.yaml");
        let yaml = serde_yaml::to_string(config).map_err(|e| ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        })?;

        std::fs::write(config_path, yaml)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_defaults_when_no_file() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path());
        let config = loader.load().unwrap();
        assert_eq!(config.models.primary, "gpt-4-turbo");
        assert_eq!(config.generation.total_samples, 36);
    }

    #[test]
    fn test_load_config_from_yaml_file() {
        let dir = tempdir().unwrap();
        let atelier_dir = dir.path().join(".atelier");
        fs::create_dir_all(&atelier_dir).unwrap();

        let config_content = r#"
api:
  base_url: https://curation.example.com/api
models:
  primary: claude-3-sonnet
generation:
  total_samples: 12
"#;

        fs::write(atelier_dir.join("config.yaml"), config_content).unwrap();

        let loader = ConfigLoader::new(dir.path());
        let config = loader.load().unwrap();

        assert_eq!(config.api.base_url, "https://curation.example.com/api");
        assert_eq!(config.models.primary, "claude-3-sonnet");
        assert_eq!(config.generation.total_samples, 12);

        // Check that unspecified values use defaults
        assert_eq!(config.models.secondary, "claude-3-opus");
        assert_eq!(config.training.poll_interval_ms, 2000);
    }

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("ATELIER_TEST_VAR", "test_value");
        let loader = ConfigLoader::new(".");
        let result = loader.expand_env_vars("key: ${ATELIER_TEST_VAR}").unwrap();
        assert_eq!(result, "key: test_value");
        std::env::remove_var("ATELIER_TEST_VAR");
    }

    #[test]
    fn test_env_var_default() {
        let loader = ConfigLoader::new(".");
        let result = loader
            .expand_env_vars("key: ${ATELIER_NONEXISTENT:-default}")
            .unwrap();
        assert_eq!(result, "key: default");
    }

    #[test]
    fn test_env_var_missing_error() {
        let loader = ConfigLoader::new(".");
        let result = loader.expand_env_vars("key: ${ATELIER_MISSING_VAR}");
        assert!(result.is_err());
        match result.unwrap_err() {
            ConfigError::EnvVarNotFound { var } => assert_eq!(var, "ATELIER_MISSING_VAR"),
            _ => panic!("Expected EnvVarNotFound error"),
        }
    }

    #[test]
    fn test_validation_errors() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path());

        let mut config = AtelierConfig::default();
        config.models.secondary = config.models.primary.clone();
        let result = loader.validate(&config);
        assert!(result.is_err());
        match result.unwrap_err() {
            ConfigError::ValidationError { message } => {
                assert!(message.contains("models.secondary"));
            }
            _ => panic!("Expected ValidationError"),
        }

        let mut config = AtelierConfig::default();
        config.generation.total_samples = 0;
        assert!(loader.validate(&config).is_err());

        let mut config = AtelierConfig::default();
        config.api.base_url = "  ".to_string();
        assert!(loader.validate(&config).is_err());
    }

    #[test]
    fn test_parse_error_with_line_number() {
        let dir = tempdir().unwrap();
        let atelier_dir = dir.path().join(".atelier");
        fs::create_dir_all(&atelier_dir).unwrap();

        let bad_yaml = r#"
api:
  base_url: https://example.com
  invalid_yaml: [unclosed
"#;

        fs::write(atelier_dir.join("config.yaml"), bad_yaml).unwrap();

        let loader = ConfigLoader::new(dir.path());
        let result = loader.load();
        assert!(result.is_err());
        match result.unwrap_err() {
            ConfigError::ParseError { line, message: _ } => {
                assert!(line.is_some());
            }
            _ => panic!("Expected ParseError with line number"),
        }
    }

    #[test]
    fn test_save_config() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path());

        let mut config = AtelierConfig::default();
        config.models.primary = "gemini-pro".to_string();
        config.generation.total_samples = 48;

        loader.save(&config).unwrap();

        let config_path = dir.path().join(".atelier/config.yaml");
        assert!(config_path.exists());

        let loaded = loader.load().unwrap();
        assert_eq!(loaded.models.primary, "gemini-pro");
        assert_eq!(loaded.generation.total_samples, 48);
    }
}
