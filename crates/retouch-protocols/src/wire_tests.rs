use super::*;

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;

use crate::geometry::BoundingBox;
use crate::snapshot::ComputedStyle;

fn snapshot() -> ElementSnapshot {
    ElementSnapshot {
        markup: "<p>hi</p>".to_string(),
        text: "hi".to_string(),
        tag_name: "p".to_string(),
        id: None,
        classes: BTreeSet::new(),
        attributes: BTreeMap::new(),
        computed_style: ComputedStyle::default(),
        geometry: BoundingBox::default(),
        framework_state: None,
        page_url: "https://example.com/".to_string(),
        captured_at: Utc::now(),
        user_instruction: None,
    }
}

#[test]
fn test_request_kind_wire_tags() {
    assert_eq!(
        serde_json::to_value(RequestKind::RewriteWithAi).unwrap(),
        serde_json::json!("SEND_TO_AI")
    );
    assert_eq!(
        serde_json::to_value(RequestKind::ForwardToEditor).unwrap(),
        serde_json::json!("SEND_TO_CURSOR")
    );
}

#[test]
fn test_relay_request_serializes_type_field() {
    let request = RelayRequest::new(RequestKind::ForwardToEditor, snapshot());
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["type"], "SEND_TO_CURSOR");
    assert!(json["data"]["markup"].is_string());
}

#[test]
fn test_relay_request_ids_are_unique() {
    let a = RelayRequest::new(RequestKind::RewriteWithAi, snapshot());
    let b = RelayRequest::new(RequestKind::RewriteWithAi, snapshot());
    assert_ne!(a.id, b.id);
}

#[test]
fn test_relay_response_success_shape() {
    let id = Uuid::new_v4();
    let json = serde_json::to_value(RelayResponse::ok(id, "<p>new</p>")).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["result"], "<p>new</p>");
    assert!(json.get("error").is_none());
}

#[test]
fn test_relay_response_failure_shape() {
    let id = Uuid::new_v4();
    let json = serde_json::to_value(RelayResponse::err(id, "boom")).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "boom");
    assert!(json.get("result").is_none());
}

#[test]
fn test_command_wire_shape() {
    let json = serde_json::to_value(Command::ToggleSelectionMode).unwrap();
    assert_eq!(json, serde_json::json!({"action": "toggleSelectionMode"}));

    let parsed: Command =
        serde_json::from_value(serde_json::json!({"action": "toggleSelectionMode"})).unwrap();
    assert_eq!(parsed, Command::ToggleSelectionMode);
}

#[test]
fn test_ack() {
    let ack = Ack::ok(true);
    assert_eq!(ack.status, "success");
    assert!(ack.enabled);
}
