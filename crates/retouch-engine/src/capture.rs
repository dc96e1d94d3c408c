//! Context capture: document node → immutable snapshot.
//!
//! Runs fully synchronously. Geometry and computed style are read
//! before the caller reaches any suspension point, so later reflow
//! cannot corrupt the captured position.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Utc;

use retouch_dom::{Document, NodeId};
use retouch_protocols::{
    ComputedStyle, ElementSnapshot, FrameworkState, EXTRACTED_STYLE_PROPERTIES,
};

/// Expando key prefixes marking a framework component tree on a node.
const FRAMEWORK_MARKER_PREFIXES: [&str; 2] = ["__reactFiber", "__reactInternalInstance"];

/// Capture a snapshot of a live element. Returns `None` when `node`
/// does not name a live element.
pub fn capture(doc: &Document, node: NodeId) -> Option<ElementSnapshot> {
    let data = doc.element(node)?;

    let mut extracted = BTreeMap::new();
    for property in EXTRACTED_STYLE_PROPERTIES {
        if let Some(value) = data.computed_style.get(property) {
            extracted.insert(property.to_string(), value.clone());
        }
    }
    let mut raw_pairs: Vec<(&String, &String)> = data.computed_style.iter().collect();
    raw_pairs.sort();
    let raw = raw_pairs
        .iter()
        .map(|(p, v)| format!("{p}: {v}"))
        .collect::<Vec<_>>()
        .join("; ");

    Some(ElementSnapshot {
        markup: doc.outer_markup(node),
        text: doc.inner_text(node),
        tag_name: data.tag.clone(),
        id: doc.element_id(node).map(str::to_string),
        classes: doc.classes(node).into_iter().collect::<BTreeSet<_>>(),
        attributes: data
            .attributes
            .iter()
            .cloned()
            .collect::<BTreeMap<String, String>>(),
        computed_style: ComputedStyle { raw, extracted },
        geometry: data.bounds,
        framework_state: probe_framework(&data.host_props),
        page_url: doc.url().to_string(),
        captured_at: Utc::now(),
        user_instruction: None,
    })
}

/// Best-effort framework introspection.
///
/// Scans the node's expando properties for a recognized component-tree
/// marker and extracts a bounded view. Any shape mismatch yields
/// `None`; this never fails past the capturer.
fn probe_framework(host_props: &HashMap<String, serde_json::Value>) -> Option<FrameworkState> {
    let mut marker_keys: Vec<&String> = host_props
        .keys()
        .filter(|key| {
            FRAMEWORK_MARKER_PREFIXES
                .iter()
                .any(|prefix| key.starts_with(prefix))
        })
        .collect();
    marker_keys.sort();
    let fiber = host_props.get(*marker_keys.first()?)?.as_object()?;

    Some(FrameworkState {
        props: fiber
            .get("memoizedProps")
            .cloned()
            .unwrap_or(serde_json::Value::Null),
        state: fiber
            .get("memoizedState")
            .cloned()
            .unwrap_or(serde_json::Value::Null),
        component_name: fiber
            .get("elementType")
            .and_then(|t| t.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or("Unknown")
            .to_string(),
    })
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
