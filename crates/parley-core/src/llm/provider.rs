//! TextGenerator trait definition.
//!
//! This is the capability boundary between the conversation loop and
//! whatever actually runs the model. Uses RPITIT for `generate` so concrete
//! backends can be plain `async fn`s.

use parley_types::llm::{BackendCapabilities, GenerationRequest, LlmError};

/// Trait for text-generation backends (TGI, OpenAI-compatible servers, ...).
///
/// A backend takes the full prompt and returns the raw generated text.
/// Whether that text starts with the prompt is reported through
/// [`BackendCapabilities::echoes_prompt`]; callers must not rely on it.
///
/// Implementations live in parley-infra (e.g., `TgiGenerator`).
pub trait TextGenerator: Send + Sync {
    /// Human-readable backend name (e.g., "tgi", "openai_compatible").
    fn name(&self) -> &str;

    /// Model identifier requests are sent for.
    fn model(&self) -> &str;

    /// What this backend does with the prompt.
    fn capabilities(&self) -> &BackendCapabilities;

    /// Run one generation call and return the raw text.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}
