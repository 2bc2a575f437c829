//! TgiGenerator -- [`TextGenerator`] backed by Hugging Face
//! text-generation-inference.
//!
//! Sends `POST {base_url}/generate`. With `return_full_text` set the server
//! returns the prompt followed by the continuation, which is what the reply
//! extraction expects.

pub mod types;

use secrecy::SecretString;

use parley_core::llm::provider::TextGenerator;
use parley_types::llm::{BackendCapabilities, GenerationRequest, LlmError};

use self::types::{TgiParameters, TgiRequest, TgiResponse};
use super::http::{build_client, join_url, post_json};

/// text-generation-inference backend.
///
/// Does NOT derive Debug; the optional API key is only exposed when
/// building request headers.
pub struct TgiGenerator {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
    timeout_secs: u64,
    capabilities: BackendCapabilities,
}

impl TgiGenerator {
    /// Create a TGI backend.
    ///
    /// `model` is informational only: a TGI server serves one model.
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

    fn to_tgi_request(&self, request: &GenerationRequest) -> TgiRequest {
        let params = &request.params;
        let sampling = params.do_sample;
        TgiRequest {
            inputs: request.prompt.clone(),
            parameters: TgiParameters {
                max_new_tokens: params.max_new_tokens,
                do_sample: sampling,
                temperature: sampling.then_some(params.temperature),
                top_k: (sampling && params.top_k > 0).then_some(params.top_k),
                top_p: (sampling && params.top_p < 1.0).then_some(params.top_p),
                return_full_text: self.capabilities.echoes_prompt,
                stop: params.stop.clone(),
            },
        }
    }
}

impl TextGenerator for TgiGenerator {
    fn name(&self) -> &str {
        "tgi"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn capabilities(&self) -> &BackendCapabilities {
        &self.capabilities
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let body = self.to_tgi_request(request);
        let url = join_url(&self.base_url, "/generate");

        let response: TgiResponse =
            post_json(&self.client, &url, self.api_key.as_ref(), &body, self.timeout_secs).await?;

        response
            .into_text()
            .ok_or_else(|| LlmError::Deserialization("response contained no generations".into()))
    }
}
