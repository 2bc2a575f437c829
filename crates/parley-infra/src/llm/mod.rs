//! Generation backend implementations.
//!
//! Contains concrete implementations of the [`TextGenerator`] trait defined
//! in `parley-core`, a factory ([`create_generator`]) that builds the right
//! backend from a [`BackendConfig`], and a connectivity probe
//! ([`check_backend`]).
//!
//! [`TextGenerator`]: parley_core::llm::provider::TextGenerator

mod http;
pub mod openai_compat;
pub mod tgi;

use secrecy::SecretString;

use parley_core::llm::box_provider::BoxTextGenerator;
use parley_types::config::BackendConfig;
use parley_types::error::ConfigError;
use parley_types::llm::{BackendType, GenerationParams, GenerationRequest, LlmError};

use self::openai_compat::OpenAiCompletionGenerator;
use self::tgi::TgiGenerator;

/// Create a [`BoxTextGenerator`] from a [`BackendConfig`].
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn create_generator(
    config: &BackendConfig,
    api_key: Option<SecretString>,
) -> Result<BoxTextGenerator, LlmError> {
    match config.backend_type {
        BackendType::Tgi => {
            let generator = TgiGenerator::new(
                config.base_url.clone(),
                config.model.clone(),
                api_key,
                config.echo_prompt,
                config.timeout_secs,
            )?;
            Ok(BoxTextGenerator::new(generator))
        }
        BackendType::OpenAiCompatible => {
            let generator = OpenAiCompletionGenerator::new(
                config.base_url.clone(),
                config.model.clone(),
                api_key,
                config.echo_prompt,
                config.timeout_secs,
            )?;
            Ok(BoxTextGenerator::new(generator))
        }
    }
}

/// Resolve the API key named by `api_key_env`, if any.
///
/// A configured variable that is unset is an error; no variable configured
/// means the backend is used without authentication.
pub fn resolve_api_key(config: &BackendConfig) -> Result<Option<SecretString>, ConfigError> {
    let Some(var) = config.api_key_env.as_deref() else {
        return Ok(None);
    };
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => Ok(Some(SecretString::from(value))),
        _ => Err(ConfigError::MissingEnv(var.to_string())),
    }
}

/// Probe the backend with a one-token generation.
///
/// # Errors
///
/// Returns the backend error if it fails to respond.
pub async fn check_backend(generator: &BoxTextGenerator) -> Result<(), LlmError> {
    let request = GenerationRequest::new(
        "User: ping\nBot:",
        GenerationParams {
            max_new_tokens: 1,
            do_sample: false,
            ..GenerationParams::default()
        },
    );
    generator.generate(&request).await?;
    Ok(())
}
