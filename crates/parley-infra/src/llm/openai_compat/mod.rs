//! OpenAiCompletionGenerator -- [`TextGenerator`] for servers speaking the
//! OpenAI completions protocol.
//!
//! Uses the raw-prompt `/completions` endpoint rather than chat
//! completions: the prompt already carries the `User:`/`Bot:` transcript.
//! `echo` asks the server to return the prompt ahead of the completion.

pub mod types;

use secrecy::SecretString;
use tracing::debug;

use parley_core::llm::provider::TextGenerator;
use parley_types::llm::{BackendCapabilities, GenerationRequest, LlmError};

use self::types::{CompletionBody, CompletionResponse};
use super::http::{build_client, join_url, post_json};

/// The completions API accepts at most this many stop sequences.
const MAX_STOP_SEQUENCES: usize = 4;

/// Backend for any OpenAI-compatible completions server.
///
/// Does NOT derive Debug; the API key stays inside `SecretString`.
pub struct OpenAiCompletionGenerator {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
    timeout_secs: u64,
    capabilities: BackendCapabilities,
}

impl OpenAiCompletionGenerator {
    /// Create a backend for `base_url` (including any `/v1` suffix).
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<SecretString>,
        echo_prompt: bool,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            api_key,
            base_url: base_url.into(),
            model: model.into(),
            timeout_secs,
            capabilities: BackendCapabilities {
                echoes_prompt: echo_prompt,
                stop_sequences: true,
            },
        })
    }

    fn to_completion_body(&self, request: &GenerationRequest) -> CompletionBody {
        let params = &request.params;
        let stop = (!params.stop.is_empty())
            .then(|| params.stop.iter().take(MAX_STOP_SEQUENCES).cloned().collect());

        CompletionBody {
            model: self.model.clone(),
            prompt: request.prompt.clone(),
            max_tokens: params.max_new_tokens,
            // No separate greedy switch in this protocol
            temperature: if params.do_sample { params.temperature } else { 0.0 },
            top_p: params.top_p,
            echo: self.capabilities.echoes_prompt,
            stop,
        }
    }
}

impl TextGenerator for OpenAiCompletionGenerator {
    fn name(&self) -> &str {
        "openai_compatible"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn capabilities(&self) -> &BackendCapabilities {
        &self.capabilities
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let body = self.to_completion_body(request);
        let url = join_url(&self.base_url, "/completions");

        let response: CompletionResponse =
            post_json(&self.client, &url, self.api_key.as_ref(), &body, self.timeout_secs).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Deserialization("response contained no choices".into()))?;
        debug!(finish_reason = ?choice.finish_reason, "Completion received");
        Ok(choice.text)
    }
}
