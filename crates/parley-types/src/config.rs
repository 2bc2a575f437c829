//! Configuration types for parley.
//!
//! `ChatConfig` represents the `config.toml` that controls the history
//! window, the generation backend, sampling parameters and reply
//! extraction. All fields have defaults, so an empty file is valid.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::llm::{BackendType, GenerationParams};

/// Number of turns kept in the sliding window when not configured.
pub const DEFAULT_MAX_TURNS: usize = 5;

/// Sentinel that ends the conversation when not configured.
pub const DEFAULT_EXIT_COMMAND: &str = "/exit";

/// Reply used when extraction leaves nothing to show.
pub const DEFAULT_FALLBACK_REPLY: &str =
    "I'm sorry, I couldn't generate a clear response for that. Can you please rephrase?";

/// Top-level configuration for a parley chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of most recent turns supplied as context.
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Input that ends the session (compared case-insensitively, trimmed).
    #[serde(default = "default_exit_command")]
    pub exit_command: String,

    /// Shown and recorded when the extracted reply is empty.
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub generation: GenerationParams,

    #[serde(default)]
    pub extraction: ExtractionConfig,
}

fn default_max_turns() -> usize {
    DEFAULT_MAX_TURNS
}

fn default_exit_command() -> String {
    DEFAULT_EXIT_COMMAND.to_string()
}

fn default_fallback_reply() -> String {
    DEFAULT_FALLBACK_REPLY.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            exit_command: default_exit_command(),
            fallback_reply: default_fallback_reply(),
            backend: BackendConfig::default(),
            generation: GenerationParams::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl ChatConfig {
    /// Check values that deserialize fine but cannot drive a session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exit_command.trim().is_empty() {
            return Err(ConfigError::Invalid("exit_command must not be empty".into()));
        }
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("backend.base_url must not be empty".into()));
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::Invalid("backend.timeout_secs must be positive".into()));
        }
        let temperature = self.generation.temperature;
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "generation.temperature must be positive, got {temperature}"
            )));
        }
        let top_p = self.generation.top_p;
        if !(top_p > 0.0 && top_p <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "generation.top_p must be in (0, 1], got {top_p}"
            )));
        }
        if self.generation.max_new_tokens == 0 {
            return Err(ConfigError::Invalid(
                "generation.max_new_tokens must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Where and how to reach the generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub backend_type: BackendType,
    /// Base URL of the server (e.g. `http://localhost:8080` for TGI,
    /// `http://localhost:8000/v1` for an OpenAI-compatible server).
    pub base_url: String,
    /// Model identifier sent to backends that need one.
    pub model: String,
    /// Name of the environment variable holding the API key, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Ask the backend to return the prompt ahead of the continuation.
    pub echo_prompt: bool,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            backend_type: BackendType::Tgi,
            base_url: "http://localhost:8080".to_string(),
            model: "microsoft/phi-1_5".to_string(),
            api_key_env: None,
            echo_prompt: true,
            timeout_secs: 300,
        }
    }
}

/// Line openers that end a reply by default, besides the role labels.
///
/// Small instruction-tuned models such as phi-1_5 drift into these
/// textbook-style sections after answering.
pub const DEFAULT_EXTRA_STOP_LABELS: [&str; 4] = ["Instruct:", "Question:", "Answer:", "Exercise"];

/// Tuning for the reply extraction heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Labels that, at the start of a line, end the reply in addition to
    /// the user and bot labels (e.g. `"Question:"`).
    pub extra_stop_labels: Vec<String>,
    /// End the reply at the first blank line.
    pub stop_at_blank_line: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            extra_stop_labels: DEFAULT_EXTRA_STOP_LABELS.iter().map(|l| l.to_string()).collect(),
            stop_at_blank_line: false,
        }
    }
}
