//! The document: an arena of nodes rooted at a single element.

use std::collections::HashMap;

use retouch_protocols::{BoundingBox, Point};

use crate::node::{ElementData, Node, NodeId};

#[derive(Debug, Clone)]
struct NodeEntry {
    node: Node,
    parent: Option<NodeId>,
}

/// An in-memory document.
///
/// Nodes live in an arena; freed slots are never reused within one
/// document's lifetime, so a [`NodeId`] stays unambiguous after
/// removals.
#[derive(Debug, Clone)]
pub struct Document {
    url: String,
    nodes: Vec<Option<NodeEntry>>,
    root: NodeId,
}

impl Document {
    /// Create a document with a `body` root.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_root(url, "body")
    }

    /// Create a document with a custom root element.
    pub fn with_root(url: impl Into<String>, root_tag: &str) -> Self {
        let mut doc = Self {
            url: url.into(),
            nodes: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.alloc(Node::Element(ElementData::new(root_tag)), None);
        doc
    }

    /// URL of the page this document models.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Root element id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(NodeEntry { node, parent }));
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::Element(ElementData::new(tag)), None)
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::Text(text.into()), None)
    }

    fn entry(&self, id: NodeId) -> Option<&NodeEntry> {
        self.nodes.get(id.0).and_then(|slot| slot.as_ref())
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut NodeEntry> {
        self.nodes.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    /// Whether `id` still names a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.entry(id).is_some()
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.entry(id).map(|e| &e.node)
    }

    /// Element data by id, if the node is an element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id).and_then(Node::as_element)
    }

    /// Mutable element data by id.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.entry_mut(id) {
            Some(NodeEntry {
                node: Node::Element(data),
                ..
            }) => Some(data),
            _ => None,
        }
    }

    /// Text content by id, if the node is a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.node(id) {
            Some(Node::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).and_then(|e| e.parent)
    }

    /// Children of a node (empty for text nodes).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        const EMPTY: &[NodeId] = &[];
        self.element(id).map(|e| e.children.as_slice()).unwrap_or(EMPTY)
    }

    /// Append a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.parent(child).is_none(), "child must be detached");
        if let Some(data) = self.element_mut(parent) {
            data.children.push(child);
        } else {
            return;
        }
        if let Some(entry) = self.entry_mut(child) {
            entry.parent = Some(parent);
        }
    }

    /// Detach a node from its parent, keeping its subtree alive.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(data) = self.element_mut(parent) {
            data.children.retain(|c| *c != id);
        }
        if let Some(entry) = self.entry_mut(id) {
            entry.parent = None;
        }
    }

    /// Free a node and its whole subtree.
    pub fn remove_subtree(&mut self, id: NodeId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            stack.extend_from_slice(self.children(current));
            if let Some(slot) = self.nodes.get_mut(current.0) {
                *slot = None;
            }
        }
    }

    /// Replace `old` with the detached node `new`, preserving position.
    ///
    /// The old subtree is freed. Replacing the root makes `new` the new
    /// root.
    pub fn replace_node(&mut self, old: NodeId, new: NodeId) {
        debug_assert!(self.parent(new).is_none(), "replacement must be detached");
        match self.parent(old) {
            Some(parent) => {
                if let Some(data) = self.element_mut(parent) {
                    if let Some(slot) = data.children.iter_mut().find(|c| **c == old) {
                        *slot = new;
                    }
                }
                if let Some(entry) = self.entry_mut(new) {
                    entry.parent = Some(parent);
                }
                // Old node no longer referenced by its parent; drop the
                // parent link before freeing so detach is a no-op.
                if let Some(entry) = self.entry_mut(old) {
                    entry.parent = None;
                }
            }
            None => {
                if old == self.root {
                    self.root = new;
                }
            }
        }
        self.remove_subtree(old);
    }

    /// All live nodes in document (preorder) order, starting at the root.
    pub fn document_order(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if !self.contains(id) {
                continue;
            }
            order.push(id);
            for child in self.children(id).iter().rev() {
                stack.push(*child);
            }
        }
        order
    }

    /// All live elements in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.document_order()
            .into_iter()
            .filter(|id| self.element(*id).is_some())
            .collect()
    }

    /// Depth of a node (root = 0).
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Attribute value on an element.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attribute(name))
    }

    /// Set an attribute on an element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(data) = self.element_mut(id) {
            data.set_attribute(name, value);
        }
    }

    /// Remove an attribute from an element.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(data) = self.element_mut(id) {
            data.remove_attribute(name);
        }
    }

    /// Non-empty `id` attribute of an element.
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.attribute(id, "id").filter(|v| !v.is_empty())
    }

    /// Class list of an element.
    pub fn classes(&self, id: NodeId) -> Vec<String> {
        self.attribute(id, "class")
            .map(|v| v.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Whether an element carries a class.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attribute(id, "class")
            .map(|v| v.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Add a class to an element (no-op when already present).
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let merged = match self.attribute(id, "class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attribute(id, "class", &merged);
    }

    /// Remove a class from an element.
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let Some(existing) = self.attribute(id, "class") else {
            return;
        };
        let remaining: Vec<&str> = existing
            .split_whitespace()
            .filter(|c| *c != class)
            .collect();
        if remaining.is_empty() {
            self.remove_attribute(id, "class");
        } else {
            let joined = remaining.join(" ");
            self.set_attribute(id, "class", &joined);
        }
    }

    /// Set the host-supplied bounding box of an element.
    pub fn set_bounds(&mut self, id: NodeId, bounds: BoundingBox) {
        if let Some(data) = self.element_mut(id) {
            data.bounds = bounds;
        }
    }

    /// Bounding box of an element (zero box when unset or not an element).
    pub fn bounds(&self, id: NodeId) -> BoundingBox {
        self.element(id).map(|e| e.bounds).unwrap_or_default()
    }

    /// Set one host-supplied computed style property.
    pub fn set_computed_style(&mut self, id: NodeId, property: &str, value: &str) {
        if let Some(data) = self.element_mut(id) {
            data.computed_style
                .insert(property.to_string(), value.to_string());
        }
    }

    /// Computed style map of an element.
    pub fn computed_style(&self, id: NodeId) -> Option<&HashMap<String, String>> {
        self.element(id).map(|e| &e.computed_style)
    }

    /// Set an inline style property.
    ///
    /// Updates both the `style` attribute and the computed map, so a
    /// repeated set is an overwrite, not an accumulation.
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) {
        let mut declarations: Vec<(String, String)> = self
            .attribute(id, "style")
            .map(parse_style_declarations)
            .unwrap_or_default();
        match declarations.iter_mut().find(|(p, _)| p == property) {
            Some((_, v)) => *v = value.to_string(),
            None => declarations.push((property.to_string(), value.to_string())),
        }
        let serialized = declarations
            .iter()
            .map(|(p, v)| format!("{p}: {v}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attribute(id, "style", &serialized);
        self.set_computed_style(id, property, value);
    }

    /// Remove an inline style property from both the `style` attribute
    /// and the computed map.
    pub fn remove_style_property(&mut self, id: NodeId, property: &str) {
        let mut declarations: Vec<(String, String)> = self
            .attribute(id, "style")
            .map(parse_style_declarations)
            .unwrap_or_default();
        declarations.retain(|(p, _)| p != property);
        if declarations.is_empty() {
            self.remove_attribute(id, "style");
        } else {
            let serialized = declarations
                .iter()
                .map(|(p, v)| format!("{p}: {v}"))
                .collect::<Vec<_>>()
                .join("; ");
            self.set_attribute(id, "style", &serialized);
        }
        if let Some(data) = self.element_mut(id) {
            data.computed_style.remove(property);
        }
    }

    /// Inline/computed style property value.
    pub fn style_property(&self, id: NodeId, property: &str) -> Option<&str> {
        self.computed_style(id)
            .and_then(|style| style.get(property))
            .map(String::as_str)
    }

    /// Attach a host expando property to an element.
    pub fn set_host_prop(&mut self, id: NodeId, key: &str, value: serde_json::Value) {
        if let Some(data) = self.element_mut(id) {
            data.host_props.insert(key.to_string(), value);
        }
    }

    /// Concatenated, trimmed text content of a subtree.
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match self.node(current) {
                Some(Node::Text(text)) => out.push_str(text),
                Some(Node::Element(_)) => {
                    for child in self.children(current).iter().rev() {
                        stack.push(*child);
                    }
                }
                None => {}
            }
        }
        out.trim().to_string()
    }

    /// Replace all children of an element with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        let children: Vec<NodeId> = self.children(id).to_vec();
        for child in children {
            self.remove_subtree(child);
        }
        let text_node = self.create_text(text);
        self.append_child(id, text_node);
    }

    /// Topmost element under a viewport point: the deepest element whose
    /// bounds contain the point, later document order breaking ties.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        let mut best: Option<(usize, usize, NodeId)> = None;
        for (order, id) in self.elements().into_iter().enumerate() {
            if !self.bounds(id).contains(point) {
                continue;
            }
            let depth = self.depth(id);
            let better = match best {
                Some((best_depth, best_order, _)) => {
                    depth > best_depth || (depth == best_depth && order > best_order)
                }
                None => true,
            };
            if better {
                best = Some((depth, order, id));
            }
        }
        best.map(|(_, _, id)| id)
    }
}

fn parse_style_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim();
            let value = value.trim();
            if prop.is_empty() {
                return None;
            }
            Some((prop.to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
