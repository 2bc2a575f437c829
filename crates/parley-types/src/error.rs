use std::path::PathBuf;

use thiserror::Error;

/// Errors related to loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("environment variable '{0}' is not set")]
    MissingEnv(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid("max_turns too large".to_string());
        assert_eq!(err.to_string(), "invalid configuration: max_turns too large");
    }

    #[test]
    fn test_not_found_includes_path() {
        let err = ConfigError::NotFound(PathBuf::from("/tmp/parley.toml"));
        assert!(err.to_string().contains("/tmp/parley.toml"));
    }

    #[test]
    fn test_missing_env_display() {
        let err = ConfigError::MissingEnv("PARLEY_API_KEY".to_string());
        assert_eq!(
            err.to_string(),
            "environment variable 'PARLEY_API_KEY' is not set"
        );
    }
}
