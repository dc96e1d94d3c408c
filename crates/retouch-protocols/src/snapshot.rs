//! Element snapshots: the immutable captured description of a document
//! node at one instant.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;

/// The fixed subset of computed style properties extracted into
/// [`ComputedStyle::extracted`].
pub const EXTRACTED_STYLE_PROPERTIES: [&str; 6] = [
    "font-size",
    "color",
    "background-color",
    "border",
    "padding",
    "margin",
];

/// Computed style at capture time: the full declaration text plus the
/// extracted fixed subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputedStyle {
    /// Full computed declaration text, as the host reports it.
    pub raw: String,
    /// Extracted subset keyed by property name.
    pub extracted: BTreeMap<String, String>,
}

/// Best-effort framework introspection result.
///
/// Present only when the host page exposes a recognized component-tree
/// marker on the node; absent on any access error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkState {
    pub props: serde_json::Value,
    pub state: serde_json::Value,
    pub component_name: String,
}

/// Immutable snapshot of a document node, created once per selection.
///
/// The `markup` field exactly reproduces the node's serialized form at
/// capture time. It becomes stale the instant the document mutates and
/// is only used for best-effort re-identification at apply time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Serialized outer structure of the node at capture time.
    pub markup: String,
    /// Trimmed visible text.
    pub text: String,
    /// Lowercase tag name.
    pub tag_name: String,
    /// `id` attribute, if any.
    pub id: Option<String>,
    /// Class set.
    pub classes: BTreeSet<String>,
    /// All attributes, name → value.
    pub attributes: BTreeMap<String, String>,
    /// Computed style at capture time.
    pub computed_style: ComputedStyle,
    /// Bounding box in viewport coordinates at capture time.
    pub geometry: BoundingBox,
    /// Framework introspection, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework_state: Option<FrameworkState>,
    /// URL of the page the node was captured from.
    pub page_url: String,
    /// Capture instant.
    pub captured_at: DateTime<Utc>,
    /// Free-text instruction, attached after the user types a request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_instruction: Option<String>,
}

impl ElementSnapshot {
    /// Attach the user's free-text instruction, consuming the snapshot.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.user_instruction = Some(instruction.into());
        self
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
