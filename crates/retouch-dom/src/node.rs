//! Document nodes.

use std::collections::HashMap;

use retouch_protocols::BoundingBox;

/// Handle to a node in a [`Document`](crate::Document) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Elements that never have children and serialize without a close tag.
pub(crate) const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub(crate) fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// An element node.
///
/// Attributes keep source order so serialization is exact and stable.
/// Computed style and bounds are host-supplied facts, not derived here.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in source order, name → value.
    pub attributes: Vec<(String, String)>,
    /// Child node ids, in order.
    pub children: Vec<NodeId>,
    /// Computed style, property → value.
    pub computed_style: HashMap<String, String>,
    /// Bounding box in viewport coordinates.
    pub bounds: BoundingBox,
    /// Host-attached expando properties (carrier for framework
    /// component-tree markers).
    pub host_props: HashMap<String, serde_json::Value>,
}

impl ElementData {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing in place to preserve source order.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    /// Remove an attribute by name.
    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(n, _)| n != name);
    }
}

/// A node: element or bare text.
#[derive(Debug, Clone)]
pub enum Node {
    Element(ElementData),
    Text(String),
}

impl Node {
    /// Element view of this node, if it is one.
    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            Node::Element(data) => Some(data),
            Node::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_tag_lowercased() {
        let el = ElementData::new("DIV");
        assert_eq!(el.tag, "div");
    }

    #[test]
    fn test_set_attribute_preserves_order() {
        let mut el = ElementData::new("div");
        el.set_attribute("id", "a");
        el.set_attribute("class", "x");
        el.set_attribute("id", "b");
        assert_eq!(
            el.attributes,
            vec![
                ("id".to_string(), "b".to_string()),
                ("class".to_string(), "x".to_string())
            ]
        );
    }

    #[test]
    fn test_void_elements() {
        assert!(is_void_element("br"));
        assert!(is_void_element("img"));
        assert!(!is_void_element("div"));
    }
}
