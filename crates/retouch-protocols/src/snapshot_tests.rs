use super::*;

fn sample() -> ElementSnapshot {
    ElementSnapshot {
        markup: "<button id=\"go\">Submit</button>".to_string(),
        text: "Submit".to_string(),
        tag_name: "button".to_string(),
        id: Some("go".to_string()),
        classes: BTreeSet::new(),
        attributes: BTreeMap::from([("id".to_string(), "go".to_string())]),
        computed_style: ComputedStyle::default(),
        geometry: BoundingBox::new(10.0, 10.0, 80.0, 24.0),
        framework_state: None,
        page_url: "https://example.com/".to_string(),
        captured_at: Utc::now(),
        user_instruction: None,
    }
}

#[test]
fn test_with_instruction() {
    let snapshot = sample().with_instruction("make it red");
    assert_eq!(snapshot.user_instruction.as_deref(), Some("make it red"));
}

#[test]
fn test_serde_round_trip() {
    let snapshot = sample().with_instruction("make it red");
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: ElementSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn test_optional_fields_omitted_from_wire() {
    let json = serde_json::to_value(sample()).unwrap();
    assert!(json.get("framework_state").is_none());
    assert!(json.get("user_instruction").is_none());
}

#[test]
fn test_extracted_style_subset_is_fixed() {
    assert_eq!(EXTRACTED_STYLE_PROPERTIES.len(), 6);
    assert!(EXTRACTED_STYLE_PROPERTIES.contains(&"font-size"));
    assert!(EXTRACTED_STYLE_PROPERTIES.contains(&"background-color"));
}
