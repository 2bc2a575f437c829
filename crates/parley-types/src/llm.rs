//! Text-generation request types for parley.
//!
//! These types model the boundary with the external generation backend:
//! the prompt plus sampling parameters going out, and the error taxonomy
//! coming back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sampling parameters sent with every generation request.
///
/// Defaults mirror a conservative chat setup: up to 200 new tokens,
/// temperature 0.7 with top-k 50 / nucleus 0.95 sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub do_sample: bool,
    pub top_k: u32,
    pub top_p: f64,
    /// Stop sequences forwarded to backends that support them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 200,
            temperature: 0.7,
            do_sample: true,
            top_k: 50,
            top_p: 0.95,
            stop: Vec::new(),
        }
    }
}

/// A single generation call: the full prompt text plus parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub params: GenerationParams,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            prompt: prompt.into(),
            params,
        }
    }
}

/// What a generation backend does with the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendCapabilities {
    /// Whether returned text begins with the verbatim prompt.
    pub echoes_prompt: bool,
    /// Whether the backend honours `GenerationParams::stop`.
    pub stop_sequences: bool,
}

/// Type of generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendType {
    /// Hugging Face text-generation-inference (`POST /generate`).
    Tgi,
    /// Any server exposing the OpenAI legacy completions API (`POST /completions`).
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible,
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendType::Tgi => write!(f, "tgi"),
            BackendType::OpenAiCompatible => write!(f, "openai_compatible"),
        }
    }
}

impl FromStr for BackendType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tgi" => Ok(BackendType::Tgi),
            "openai_compatible" | "openai" => Ok(BackendType::OpenAiCompatible),
            other => Err(format!("invalid backend type: '{other}'")),
        }
    }
}

/// Errors from generation backend operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("backend overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_params_default() {
        let params = GenerationParams::default();
        assert_eq!(params.max_new_tokens, 200);
        assert!((params.temperature - 0.7).abs() < f64::EPSILON);
        assert!(params.do_sample);
        assert_eq!(params.top_k, 50);
        assert!((params.top_p - 0.95).abs() < f64::EPSILON);
        assert!(params.stop.is_empty());
    }

    #[test]
    fn test_generation_params_partial_deserialize() {
        let json = r#"{"max_new_tokens": 64}"#;
        let params: GenerationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.max_new_tokens, 64);
        assert_eq!(params.top_k, 50);
    }

    #[test]
    fn test_generation_params_skips_empty_stop() {
        let json = serde_json::to_value(GenerationParams::default()).unwrap();
        assert!(json.get("stop").is_none());
    }

    #[test]
    fn test_backend_type_roundtrip() {
        for bt in [BackendType::Tgi, BackendType::OpenAiCompatible] {
            let s = bt.to_string();
            let parsed: BackendType = s.parse().unwrap();
            assert_eq!(bt, parsed);
        }
    }

    #[test]
    fn test_backend_type_alias() {
        assert_eq!(
            "OpenAI".parse::<BackendType>().unwrap(),
            BackendType::OpenAiCompatible
        );
        assert!("llama".parse::<BackendType>().is_err());
    }

    #[test]
    fn test_backend_type_serde() {
        let bt = BackendType::OpenAiCompatible;
        let json = serde_json::to_string(&bt).unwrap();
        assert_eq!(json, "\"openai_compatible\"");
        let parsed: BackendType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, BackendType::OpenAiCompatible);
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::Timeout(300);
        assert_eq!(err.to_string(), "request timed out after 300s");

        let err = LlmError::Provider {
            message: "HTTP 500".to_string(),
        };
        assert!(err.to_string().contains("HTTP 500"));
    }
}
