//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Load the file at `path` if it exists, otherwise validate and use defaults.
pub fn load_or_default(path: &Path) -> Result<ClientConfig, ConfigError> {
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "Config file not found, using defaults");
    let config = ClientConfig::default();
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ClientConfig, ConfigError> {
    let config: ClientConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_config() {
        let config = parse_config(
            r#"
            [cluster]
            rpc_url = "http://127.0.0.1:8899"
            commitment = "finalized"
            skip_preflight = false
            "#,
        )
        .unwrap();
        assert_eq!(config.cluster.commitment, "finalized");
        assert!(!config.cluster.skip_preflight);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[cluster\nrpc_url = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_display() {
        let err = parse_config(
            r#"
            [cluster]
            rpc_timeout_secs = 0
            confirmation_timeout_secs = 0
            "#,
        )
        .unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("Validation failed: "));
        assert!(text.contains("cluster.rpc_timeout_secs"));
        assert!(text.contains(", cluster.confirmation_timeout_secs"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_or_default(Path::new("/nonexistent/aogo.toml")).unwrap();
        assert_eq!(config.program.program_id, crate::config::schema::DEFAULT_PROGRAM_ID);
    }

    #[test]
    fn test_missing_file_is_io_error_for_strict_load() {
        let err = load_config(Path::new("/nonexistent/aogo.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
