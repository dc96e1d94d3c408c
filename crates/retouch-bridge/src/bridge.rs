//! Snapshot submission and reply correlation.

use std::sync::Arc;

use tracing::debug;

use retouch_protocols::error::BridgeError;
use retouch_protocols::{ElementSnapshot, RelayRequest, RequestKind};

use crate::relay::Relay;

/// The AI mediation bridge.
///
/// Exactly one outstanding request per `submit` call; a new submission
/// before a previous one resolves runs independently.
pub struct Bridge {
    relay: Arc<dyn Relay>,
}

impl Bridge {
    /// Create a bridge over a relay.
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        Self { relay }
    }

    /// Submit a snapshot and wait for the correlated reply.
    ///
    /// On success the relay's result string is returned after fence
    /// stripping; every failure is terminal for this submission.
    pub async fn submit(
        &self,
        snapshot: ElementSnapshot,
        kind: RequestKind,
    ) -> Result<String, BridgeError> {
        let request = RelayRequest::new(kind, snapshot);
        let request_id = request.id;
        debug!(id = %request_id, ?kind, "submitting snapshot");

        let response = self.relay.send(request).await?;

        if response.id != request_id {
            return Err(BridgeError::MalformedReply(format!(
                "correlation mismatch: expected {request_id}, got {}",
                response.id
            )));
        }
        if !response.success {
            // Out-of-process relays carry no upstream status; surface
            // their failure string as a gateway rejection.
            return Err(BridgeError::Rejected {
                status: 502,
                message: response
                    .error
                    .unwrap_or_else(|| "relay reported failure".to_string()),
            });
        }
        let result = response
            .result
            .ok_or_else(|| BridgeError::MalformedReply("success reply without result".to_string()))?;
        Ok(clean_reply(&result))
    }
}

/// Strip the code fences a mediator sometimes wraps fragments in.
fn clean_reply(reply: &str) -> String {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let inner = inner.strip_prefix("html").unwrap_or(inner);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim().to_string()
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
