use super::*;

use retouch_protocols::BoundingBox;
use serde_json::json;

fn page_with_card() -> (Document, NodeId) {
    let mut doc = Document::new("https://example.com/page");
    let nodes = doc
        .parse_fragment("<div id=\"card\" class=\"box primary\"><p>Hello <em>there</em></p></div>")
        .unwrap();
    let card = nodes[0];
    doc.append_child(doc.root(), card);
    doc.set_bounds(card, BoundingBox::new(20.0, 30.0, 400.0, 120.0));
    doc.set_computed_style(card, "font-size", "16px");
    doc.set_computed_style(card, "color", "rgb(0, 0, 0)");
    doc.set_computed_style(card, "line-height", "24px");
    (doc, card)
}

#[test]
fn test_capture_markup_matches_serialized_form() {
    let (doc, card) = page_with_card();
    let snapshot = capture(&doc, card).unwrap();
    assert_eq!(snapshot.markup, doc.outer_markup(card));

    // Round trip: re-parsing the captured markup yields identical
    // structure as long as the document has not mutated.
    let mut scratch = Document::new("https://example.com/page");
    let reparsed = scratch.parse_fragment(&snapshot.markup).unwrap();
    assert_eq!(scratch.outer_markup(reparsed[0]), snapshot.markup);
}

#[test]
fn test_capture_basic_fields() {
    let (doc, card) = page_with_card();
    let snapshot = capture(&doc, card).unwrap();

    assert_eq!(snapshot.tag_name, "div");
    assert_eq!(snapshot.id.as_deref(), Some("card"));
    assert!(snapshot.classes.contains("box"));
    assert!(snapshot.classes.contains("primary"));
    assert_eq!(snapshot.attributes.get("id").map(String::as_str), Some("card"));
    assert_eq!(snapshot.text, "Hello there");
    assert_eq!(snapshot.page_url, "https://example.com/page");
    assert_eq!(snapshot.geometry, BoundingBox::new(20.0, 30.0, 400.0, 120.0));
}

#[test]
fn test_capture_extracts_fixed_style_subset() {
    let (doc, card) = page_with_card();
    let snapshot = capture(&doc, card).unwrap();

    assert_eq!(
        snapshot.computed_style.extracted.get("font-size").map(String::as_str),
        Some("16px")
    );
    assert_eq!(
        snapshot.computed_style.extracted.get("color").map(String::as_str),
        Some("rgb(0, 0, 0)")
    );
    // Properties outside the fixed subset stay in `raw` only.
    assert!(!snapshot.computed_style.extracted.contains_key("line-height"));
    assert!(snapshot.computed_style.raw.contains("line-height: 24px"));
}

#[test]
fn test_capture_non_element_is_none() {
    let mut doc = Document::new("https://example.com/");
    let text = doc.create_text("loose");
    doc.append_child(doc.root(), text);
    assert!(capture(&doc, text).is_none());
}

#[test]
fn test_framework_probe_extracts_bounded_view() {
    let (mut doc, card) = page_with_card();
    doc.set_host_prop(
        card,
        "__reactFiber$abc123",
        json!({
            "memoizedProps": {"label": "Hello"},
            "memoizedState": {"open": true},
            "elementType": {"name": "Card"}
        }),
    );

    let state = capture(&doc, card).unwrap().framework_state.unwrap();
    assert_eq!(state.component_name, "Card");
    assert_eq!(state.props["label"], "Hello");
    assert_eq!(state.state["open"], true);
}

#[test]
fn test_framework_probe_unknown_type_name() {
    let (mut doc, card) = page_with_card();
    doc.set_host_prop(
        card,
        "__reactInternalInstance$x",
        json!({"memoizedProps": {}}),
    );

    let state = capture(&doc, card).unwrap().framework_state.unwrap();
    assert_eq!(state.component_name, "Unknown");
    assert!(state.state.is_null());
}

#[test]
fn test_framework_probe_fails_soft() {
    let (mut doc, card) = page_with_card();

    // No marker at all.
    assert!(capture(&doc, card).unwrap().framework_state.is_none());

    // Marker present but not an object: an access error, not a crash.
    doc.set_host_prop(card, "__reactFiber$x", json!("not an object"));
    assert!(capture(&doc, card).unwrap().framework_state.is_none());

    // Unrelated expando props are ignored.
    doc.set_host_prop(card, "jQuery311", json!({"data": 1}));
    assert!(capture(&doc, card).unwrap().framework_state.is_none());
}
