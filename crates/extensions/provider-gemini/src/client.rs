//! Gemini API client.

use reqwest::Client;
use tracing::debug;

use retouch_protocols::error::BridgeError;

use crate::types::*;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for rewrite requests.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini API client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(300))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url,
        }
    }

    /// Send a rewrite instruction and return the reply text.
    ///
    /// The credential travels as a URL query parameter. Failures map
    /// onto the bridge error kinds: transport problems are
    /// `Unreachable`, non-success statuses are `Rejected` with the
    /// upstream status and message forwarded, and a reply without a
    /// usable text part is `MalformedReply`.
    pub async fn generate_text(&self, model: &str, prompt: String) -> Result<String, BridgeError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        debug!("Gemini generate_text: model={}", model);

        let request = GenerateContentRequest {
            contents: vec![Content::text(prompt)],
            generation_config: None,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BridgeError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BridgeError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            let error: Result<GeminiError, _> = serde_json::from_str(&body);
            return match error {
                Ok(e) => Err(BridgeError::Rejected {
                    status: status.as_u16(),
                    message: e.error.message,
                }),
                Err(_) => Err(BridgeError::Rejected {
                    status: status.as_u16(),
                    message: body,
                }),
            };
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| BridgeError::MalformedReply(format!("undecodable reply: {e}")))?;

        parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| BridgeError::MalformedReply("reply carries no text".to_string()))
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
