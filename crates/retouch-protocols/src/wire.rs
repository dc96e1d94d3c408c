//! Wire messages between the page context, the privileged relay, and
//! the toggle UI.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::snapshot::ElementSnapshot;

/// Request flavor carried to the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    /// Instruction-guided rewrite through the generative-AI mediator.
    #[serde(rename = "SEND_TO_AI")]
    RewriteWithAi,
    /// Unconditional forward of the snapshot to the editor endpoint.
    #[serde(rename = "SEND_TO_CURSOR")]
    ForwardToEditor,
}

/// Outbound request to the privileged relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayRequest {
    /// Correlation id, echoed back in the reply.
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: RequestKind,
    pub data: ElementSnapshot,
}

impl RelayRequest {
    /// Create a request with a fresh correlation id.
    pub fn new(kind: RequestKind, data: ElementSnapshot) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            data,
        }
    }
}

/// Reply from the relay: `{success: true, result}` or
/// `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayResponse {
    /// Correlation id of the request this answers.
    pub id: Uuid,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    /// Successful reply carrying the relay's result string.
    pub fn ok(id: Uuid, result: impl Into<String>) -> Self {
        Self {
            id,
            success: true,
            result: Some(result.into()),
            error: None,
        }
    }

    /// Failed reply carrying the relay's error description.
    pub fn err(id: Uuid, error: impl Into<String>) -> Self {
        Self {
            id,
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Inbound command from the toggle UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
    /// Flip Idle/Armed selection mode.
    ToggleSelectionMode,
}

/// Synchronous acknowledgement of an inbound command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
    /// Selection mode after the command was handled.
    pub enabled: bool,
}

impl Ack {
    /// Successful acknowledgement.
    pub fn ok(enabled: bool) -> Self {
        Self {
            status: "success".to_string(),
            enabled,
        }
    }
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
