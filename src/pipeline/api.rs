//! The network exchange: submit the assembled request, map the response.
//!
//! This is the only stage with network I/O and the single suspension point
//! of the whole flow. The client is built without a request timeout: the
//! exchange runs to completion or to whatever failure the transport itself
//! reports, and the attempt is never retried here.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::pipeline::request::{GenerateRequest, GenerateResponse};
use tracing::{debug, warn};

/// Build the model endpoint URL for this attempt.
///
/// The credential travels as the `key` query parameter, which is how the
/// generative-language API expects it.
pub fn endpoint_url(base_url: &str, model: &str, api_key: &str) -> String {
    format!(
        "{}/models/{}:generateContent?key={}",
        base_url.trim_end_matches('/'),
        model,
        api_key
    )
}

/// Submit the request and return the model's text verbatim.
pub async fn generate(
    client: &reqwest::Client,
    config: &ExtractionConfig,
    api_key: &str,
    request: &GenerateRequest,
) -> Result<String, ExtractError> {
    let url = endpoint_url(&config.api_base_url, &config.model, api_key);
    debug!(
        "Submitting {} parts to model '{}'",
        request.part_count(),
        config.model
    );

    let response = client.post(&url).json(request).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("Model API answered {}", status);
        return Err(ExtractError::ApiError {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    let parsed: GenerateResponse =
        serde_json::from_str(&body).map_err(|e| ExtractError::ApiError {
            status: status.as_u16(),
            message: format!("malformed response body: {e}"),
        })?;

    if let Some(error) = parsed.error {
        return Err(ExtractError::ApiError {
            status: status.as_u16(),
            message: error.message,
        });
    }

    parsed.text().ok_or(ExtractError::EmptyResponse)
}

/// Pull the API's error message out of a failure body, falling back to a
/// truncated raw body when it isn't the documented JSON shape.
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<GenerateResponse>(body) {
        if let Some(error) = parsed.error {
            return error.message;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error detail provided".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}
