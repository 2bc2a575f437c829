//! Configuration loader for parley.
//!
//! Reads `config.toml` (by default from `<config_dir>/parley/`) and
//! deserializes it into [`ChatConfig`]. The implicit default location falls
//! back to defaults when the file is missing or malformed; a path given
//! explicitly must exist and parse.

use std::path::{Path, PathBuf};

use parley_types::config::ChatConfig;
use parley_types::error::ConfigError;

/// File name looked up inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config location: `<platform config dir>/parley/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("parley").join(CONFIG_FILE_NAME))
}

/// Load and parse the config at `path`.
///
/// # Errors
///
/// - [`ConfigError::NotFound`] when the file does not exist
/// - [`ConfigError::Io`] when it cannot be read
/// - [`ConfigError::Parse`] when it is not valid TOML for [`ChatConfig`]
pub async fn load_chat_config_strict(path: &Path) -> Result<ChatConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str::<ChatConfig>(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Load the config at `path`, falling back to defaults.
///
/// - If the file does not exist, returns [`ChatConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and
///   returns the default.
pub async fn load_chat_config(path: &Path) -> ChatConfig {
    match load_chat_config_strict(path).await {
        Ok(config) => config,
        Err(ConfigError::NotFound(_)) => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            ChatConfig::default()
        }
        Err(err) => {
            tracing::warn!("{err}, using defaults");
            ChatConfig::default()
        }
    }
}

/// Render a config as TOML for display.
pub fn render_config(config: &ChatConfig) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(|err| ConfigError::Invalid(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::llm::BackendType;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_chat_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_chat_config(&tmp.path().join(CONFIG_FILE_NAME)).await;
        assert_eq!(config, ChatConfig::default());
    }

    #[tokio::test]
    async fn load_chat_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(
            &config_path,
            r#"
max_turns = 3

[backend]
backend_type = "openai_compatible"
base_url = "http://localhost:8000/v1"
"#,
        )
        .await
        .unwrap();

        let config = load_chat_config(&config_path).await;
        assert_eq!(config.max_turns, 3);
        assert_eq!(config.backend.backend_type, BackendType::OpenAiCompatible);
        assert_eq!(config.exit_command, "/exit");
    }

    #[tokio::test]
    async fn load_chat_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_chat_config(&config_path).await;
        assert_eq!(config, ChatConfig::default());
    }

    #[tokio::test]
    async fn load_chat_config_strict_reports_missing_and_invalid() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);

        let err = load_chat_config_strict(&config_path).await.unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));

        tokio::fs::write(&config_path, "max_turns = \"five\"").await.unwrap();
        let err = load_chat_config_strict(&config_path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[tokio::test]
    async fn load_chat_config_strict_rejects_negative_window() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(&config_path, "max_turns = -1").await.unwrap();

        let err = load_chat_config_strict(&config_path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn render_config_parses_back() {
        let config = ChatConfig::default();
        let text = render_config(&config).unwrap();
        assert!(text.contains("max_turns = 5"));
        let parsed: ChatConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn default_config_path_ends_with_file_name() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with(Path::new("parley").join(CONFIG_FILE_NAME)));
        }
    }
}
