//! The relay seam: the privileged process that performs network calls
//! on behalf of the page context.

use async_trait::async_trait;
use tracing::debug;

use retouch_protocols::error::BridgeError;
use retouch_protocols::{RelayRequest, RelayResponse, RequestKind};
use retouch_provider_gemini::{GeminiClient, DEFAULT_MODEL};

use crate::prompt::compose_rewrite_instruction;

/// Privileged message relay.
///
/// An in-process relay may fail with a typed [`BridgeError`] directly;
/// an out-of-process relay reports failure through the wire shape
/// (`success: false`), which the bridge maps for it.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Perform the network call for one request.
    async fn send(&self, request: RelayRequest) -> Result<RelayResponse, BridgeError>;
}

/// Configuration for [`HttpRelay`].
#[derive(Debug, Clone)]
pub struct HttpRelayConfig {
    /// Mediator credential; absent means rewrite requests fail with
    /// [`BridgeError::MissingCredential`] before any I/O.
    pub api_key: Option<String>,
    /// Mediator model.
    pub model: String,
    /// Mediator endpoint base URL; `None` uses the public endpoint.
    pub mediator_base_url: Option<String>,
    /// Endpoint receiving raw snapshot forwards.
    pub editor_endpoint: String,
}

impl Default for HttpRelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            mediator_base_url: None,
            editor_endpoint: "http://localhost:3001/update".to_string(),
        }
    }
}

/// Relay that performs the network calls itself: Gemini for rewrite
/// requests, a plain JSON POST of the snapshot for editor forwards.
pub struct HttpRelay {
    config: HttpRelayConfig,
    client: reqwest::Client,
}

impl HttpRelay {
    /// Create a relay from its configuration.
    pub fn new(config: HttpRelayConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(300))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    fn mediator_client(&self) -> Result<GeminiClient, BridgeError> {
        let api_key = self
            .config
            .api_key
            .clone()
            .ok_or(BridgeError::MissingCredential)?;
        Ok(match &self.config.mediator_base_url {
            Some(base_url) => GeminiClient::with_base_url(api_key, base_url.clone()),
            None => GeminiClient::new(api_key),
        })
    }

    async fn rewrite(&self, request: &RelayRequest) -> Result<String, BridgeError> {
        let client = self.mediator_client()?;
        let instruction = compose_rewrite_instruction(&request.data);
        client.generate_text(&self.config.model, instruction).await
    }

    async fn forward(&self, request: &RelayRequest) -> Result<String, BridgeError> {
        let response = self
            .client
            .post(&self.config.editor_endpoint)
            .json(&request.data)
            .send()
            .await
            .map_err(|e| BridgeError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BridgeError::Unreachable(e.to_string()))?;
        if !status.is_success() {
            return Err(BridgeError::Rejected {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl Relay for HttpRelay {
    async fn send(&self, request: RelayRequest) -> Result<RelayResponse, BridgeError> {
        debug!(id = %request.id, kind = ?request.kind, "relay dispatching request");
        let result = match request.kind {
            RequestKind::RewriteWithAi => self.rewrite(&request).await?,
            RequestKind::ForwardToEditor => self.forward(&request).await?,
        };
        Ok(RelayResponse::ok(request.id, result))
    }
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;
