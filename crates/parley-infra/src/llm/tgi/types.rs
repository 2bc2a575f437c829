//! Wire types for the text-generation-inference `/generate` endpoint.

use serde::{Deserialize, Serialize};

/// Request body for `POST /generate`.
#[derive(Debug, Clone, Serialize)]
pub struct TgiRequest {
    pub inputs: String,
    pub parameters: TgiParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct TgiParameters {
    pub max_new_tokens: u32,
    pub do_sample: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// TGI rejects `top_p >= 1.0`; omitted in that case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    pub return_full_text: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

/// A single generation result.
#[derive(Debug, Clone, Deserialize)]
pub struct TgiGeneration {
    pub generated_text: String,
}

/// `/generate` returns an object; the hosted Inference API wraps it in an
/// array. Both are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TgiResponse {
    Single(TgiGeneration),
    Batch(Vec<TgiGeneration>),
}

impl TgiResponse {
    pub fn into_text(self) -> Option<String> {
        match self {
            TgiResponse::Single(generation) => Some(generation.generated_text),
            TgiResponse::Batch(generations) => {
                generations.into_iter().next().map(|g| g.generated_text)
            }
        }
    }
}
