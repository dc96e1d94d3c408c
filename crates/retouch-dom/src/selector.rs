//! Best-effort CSS selectors: generation for persisted mutations and
//! resolution at replay time.

use tracing::debug;

use crate::document::Document;
use crate::node::NodeId;

impl Document {
    /// Best-effort unique selector for an element: `#id` when one is
    /// present, otherwise a `>`-combined path of `tag:nth-of-type(k)`
    /// segments from the root.
    pub fn best_effort_selector(&self, id: NodeId) -> String {
        if let Some(element_id) = self.element_id(id) {
            return format!("#{element_id}");
        }
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(data) = self.element(current) {
            match self.parent(current) {
                Some(parent) => {
                    segments.push(format!(
                        "{}:nth-of-type({})",
                        data.tag,
                        self.type_index(parent, current, &data.tag)
                    ));
                    current = parent;
                }
                None => {
                    segments.push(data.tag.clone());
                    break;
                }
            }
        }
        segments.reverse();
        segments.join(" > ")
    }

    /// 1-based index of `child` among `parent`'s element children that
    /// share `tag`.
    fn type_index(&self, parent: NodeId, child: NodeId, tag: &str) -> usize {
        let mut index = 0;
        for sibling in self.children(parent) {
            if self.element(*sibling).map(|e| e.tag == tag).unwrap_or(false) {
                index += 1;
                if *sibling == child {
                    break;
                }
            }
        }
        index
    }

    /// Resolve a selector against the document: first match in document
    /// order, `None` when nothing matches or the selector is not in the
    /// supported grammar.
    ///
    /// Supported: the grammar [`best_effort_selector`](Self::best_effort_selector)
    /// emits, plus simple `tag` / `.class` / `#id` and compounds of them.
    pub fn resolve_selector(&self, selector: &str) -> Option<NodeId> {
        let mut segments = Vec::new();
        for part in selector.split('>') {
            let part = part.trim();
            match Compound::parse(part) {
                Some(compound) => segments.push(compound),
                None => {
                    debug!(selector, segment = part, "unsupported selector segment");
                    return None;
                }
            }
        }
        if segments.is_empty() {
            return None;
        }
        self.elements()
            .into_iter()
            .find(|id| self.matches_chain(*id, &segments))
    }

    fn matches_chain(&self, id: NodeId, segments: &[Compound]) -> bool {
        let (last, ancestors) = segments.split_last().expect("segments are non-empty");
        if !self.matches_compound(id, last) {
            return false;
        }
        let mut current = id;
        for segment in ancestors.iter().rev() {
            let Some(parent) = self.parent(current) else {
                return false;
            };
            if !self.matches_compound(parent, segment) {
                return false;
            }
            current = parent;
        }
        true
    }

    fn matches_compound(&self, id: NodeId, compound: &Compound) -> bool {
        let Some(data) = self.element(id) else {
            return false;
        };
        if let Some(tag) = &compound.tag {
            if data.tag != *tag {
                return false;
            }
        }
        if let Some(wanted) = &compound.id {
            if self.element_id(id) != Some(wanted.as_str()) {
                return false;
            }
        }
        for class in &compound.classes {
            if !self.has_class(id, class) {
                return false;
            }
        }
        if let Some(nth) = compound.nth_of_type {
            let index = match self.parent(id) {
                Some(parent) => self.type_index(parent, id, &data.tag),
                None => 1,
            };
            if index != nth {
                return false;
            }
        }
        true
    }
}

/// One compound segment of a selector.
#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    nth_of_type: Option<usize>,
}

impl Compound {
    fn parse(input: &str) -> Option<Self> {
        if input.is_empty() {
            return None;
        }
        let mut compound = Compound::default();
        let mut rest = input;

        let tag_len = name_length(rest);
        if tag_len > 0 {
            compound.tag = Some(rest[..tag_len].to_ascii_lowercase());
            rest = &rest[tag_len..];
        }

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('#') {
                let len = name_length(after);
                if len == 0 {
                    return None;
                }
                compound.id = Some(after[..len].to_string());
                rest = &after[len..];
            } else if let Some(after) = rest.strip_prefix('.') {
                let len = name_length(after);
                if len == 0 {
                    return None;
                }
                compound.classes.push(after[..len].to_string());
                rest = &after[len..];
            } else if let Some(after) = rest.strip_prefix(":nth-of-type(") {
                let close = after.find(')')?;
                let nth: usize = after[..close].parse().ok()?;
                compound.nth_of_type = Some(nth);
                rest = &after[close + 1..];
            } else {
                return None;
            }
        }
        Some(compound)
    }
}

fn name_length(input: &str) -> usize {
    input
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_')
        .count()
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
