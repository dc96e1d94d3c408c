use super::*;

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use retouch_protocols::{BoundingBox, ComputedStyle, RelayResponse};

fn snapshot() -> ElementSnapshot {
    ElementSnapshot {
        markup: "<p>old</p>".to_string(),
        text: "old".to_string(),
        tag_name: "p".to_string(),
        id: None,
        classes: BTreeSet::new(),
        attributes: BTreeMap::new(),
        computed_style: ComputedStyle::default(),
        geometry: BoundingBox::default(),
        framework_state: None,
        page_url: "https://example.com/".to_string(),
        captured_at: Utc::now(),
        user_instruction: Some("change it".to_string()),
    }
}

struct EchoRelay {
    reply: String,
}

#[async_trait]
impl Relay for EchoRelay {
    async fn send(&self, request: RelayRequest) -> Result<RelayResponse, BridgeError> {
        Ok(RelayResponse::ok(request.id, self.reply.clone()))
    }
}

struct MiscorrelatedRelay;

#[async_trait]
impl Relay for MiscorrelatedRelay {
    async fn send(&self, _request: RelayRequest) -> Result<RelayResponse, BridgeError> {
        Ok(RelayResponse::ok(Uuid::new_v4(), "<p>new</p>"))
    }
}

struct FailureOutcomeRelay;

#[async_trait]
impl Relay for FailureOutcomeRelay {
    async fn send(&self, request: RelayRequest) -> Result<RelayResponse, BridgeError> {
        Ok(RelayResponse::err(request.id, "relay process is down"))
    }
}

struct TypedErrorRelay;

#[async_trait]
impl Relay for TypedErrorRelay {
    async fn send(&self, _request: RelayRequest) -> Result<RelayResponse, BridgeError> {
        Err(BridgeError::MissingCredential)
    }
}

struct ResultlessRelay;

#[async_trait]
impl Relay for ResultlessRelay {
    async fn send(&self, request: RelayRequest) -> Result<RelayResponse, BridgeError> {
        Ok(RelayResponse {
            id: request.id,
            success: true,
            result: None,
            error: None,
        })
    }
}

#[tokio::test]
async fn test_submit_returns_relay_result() {
    let bridge = Bridge::new(Arc::new(EchoRelay {
        reply: "<p>new</p>".to_string(),
    }));
    let result = bridge
        .submit(snapshot(), RequestKind::RewriteWithAi)
        .await
        .unwrap();
    assert_eq!(result, "<p>new</p>");
}

#[tokio::test]
async fn test_submit_strips_code_fences() {
    let bridge = Bridge::new(Arc::new(EchoRelay {
        reply: "```html\n<p>new</p>\n```".to_string(),
    }));
    let result = bridge
        .submit(snapshot(), RequestKind::RewriteWithAi)
        .await
        .unwrap();
    assert_eq!(result, "<p>new</p>");
}

#[tokio::test]
async fn test_correlation_mismatch_is_malformed_reply() {
    let bridge = Bridge::new(Arc::new(MiscorrelatedRelay));
    let err = bridge
        .submit(snapshot(), RequestKind::RewriteWithAi)
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::MalformedReply(_)), "got {err:?}");
}

#[tokio::test]
async fn test_failure_outcome_maps_to_rejected() {
    let bridge = Bridge::new(Arc::new(FailureOutcomeRelay));
    let err = bridge
        .submit(snapshot(), RequestKind::ForwardToEditor)
        .await
        .unwrap_err();
    match err {
        BridgeError::Rejected { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "relay process is down");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_typed_relay_error_passes_through() {
    let bridge = Bridge::new(Arc::new(TypedErrorRelay));
    let err = bridge
        .submit(snapshot(), RequestKind::RewriteWithAi)
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::MissingCredential));
}

#[tokio::test]
async fn test_success_without_result_is_malformed_reply() {
    let bridge = Bridge::new(Arc::new(ResultlessRelay));
    let err = bridge
        .submit(snapshot(), RequestKind::RewriteWithAi)
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::MalformedReply(_)));
}

#[test]
fn test_clean_reply_passthrough() {
    assert_eq!(clean_reply("  <p>x</p>\n"), "<p>x</p>");
    assert_eq!(clean_reply("```\n<p>x</p>\n```"), "<p>x</p>");
    assert_eq!(clean_reply("no fences"), "no fences");
}
