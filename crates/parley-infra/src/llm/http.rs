//! HTTP plumbing shared by the generation backends.

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use parley_types::llm::LlmError;

/// Build the reqwest client used by a backend.
pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| LlmError::Provider {
            message: format!("failed to create HTTP client: {e}"),
        })
}

/// Join a base URL and an endpoint path without doubling the slash.
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Attach a bearer token when one is configured.
pub(crate) fn with_auth(
    builder: reqwest::RequestBuilder,
    api_key: Option<&SecretString>,
) -> reqwest::RequestBuilder {
    match api_key {
        Some(key) => builder.bearer_auth(key.expose_secret()),
        None => builder,
    }
}

/// Map a transport-level failure (connect, timeout, body read).
pub(crate) fn map_transport_error(e: reqwest::Error, timeout_secs: u64) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout(timeout_secs)
    } else {
        LlmError::Provider {
            message: format!("HTTP request failed: {e}"),
        }
    }
}

/// Map a non-success HTTP status to the error taxonomy.
pub(crate) fn map_status_error(status: StatusCode, body: String) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited {
            retry_after_ms: None,
        },
        503 => LlmError::Overloaded(body),
        400 | 422 => LlmError::InvalidRequest(body),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}

/// Send a JSON request and decode a JSON response, mapping failures.
pub(crate) async fn post_json<B, R>(
    client: &reqwest::Client,
    url: &str,
    api_key: Option<&SecretString>,
    body: &B,
    timeout_secs: u64,
) -> Result<R, LlmError>
where
    B: serde::Serialize + ?Sized,
    R: serde::de::DeserializeOwned,
{
    let response = with_auth(client.post(url), api_key)
        .json(body)
        .send()
        .await
        .map_err(|e| map_transport_error(e, timeout_secs))?;

    let status = response.status();
    if !status.is_success() {
        let error_body = response.text().await.unwrap_or_default();
        return Err(map_status_error(status, error_body));
    }

    response
        .json::<R>()
        .await
        .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))
}
