//! Selection controller: the Idle / Armed / Dragging state machine.

use std::fmt;

use tracing::debug;

use retouch_dom::{Document, NodeId};
use retouch_protocols::{BoundingBox, Point};

use crate::events::{PointerButton, PointerEvent};

/// Class marking a current-frame drag candidate.
pub const HIGHLIGHT_CLASS: &str = "retouch-candidate";

/// Id of the translucent armed-mode overlay element.
pub const OVERLAY_ID: &str = "retouch-overlay";

/// Id of the live drag rectangle element.
pub const DRAG_RECT_ID: &str = "retouch-drag-rect";

/// Form controls whose native interaction is never hijacked.
const INTERACTIVE_TAGS: [&str; 4] = ["input", "textarea", "button", "select"];

/// Selection-mode state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// No listeners attached, cursor normal.
    Idle,
    /// Pick mode active: overlay shown, cursor changed.
    Armed,
    /// A drag rectangle is live.
    Dragging,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Idle => write!(f, "idle"),
            SelectionMode::Armed => write!(f, "armed"),
            SelectionMode::Dragging => write!(f, "dragging"),
        }
    }
}

/// Owned selection state, one value per gesture.
#[derive(Debug, Clone)]
pub struct SelectionSession {
    pub mode: SelectionMode,
    /// Drag origin, valid only in Dragging.
    pub anchor: Option<Point>,
    /// Nodes currently intersecting the drag rectangle, document order.
    pub candidates: Vec<NodeId>,
}

impl SelectionSession {
    fn idle() -> Self {
        Self {
            mode: SelectionMode::Idle,
            anchor: None,
            candidates: Vec::new(),
        }
    }
}

/// Drives [`SelectionSession`] transitions and their document side
/// effects (overlay, cursor, candidate highlights, drag rectangle).
pub struct SelectionController {
    session: SelectionSession,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionController {
    /// Create a controller in Idle.
    pub fn new() -> Self {
        Self {
            session: SelectionSession::idle(),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> SelectionMode {
        self.session.mode
    }

    /// Whether pick mode is active (Armed or mid-drag).
    pub fn is_enabled(&self) -> bool {
        self.session.mode != SelectionMode::Idle
    }

    /// Current candidate set (empty outside Dragging).
    pub fn candidates(&self) -> &[NodeId] {
        &self.session.candidates
    }

    /// Flip Idle ↔ Armed. Returns the new enabled state.
    pub fn toggle(&mut self, doc: &mut Document) -> bool {
        if self.is_enabled() {
            self.disarm(doc);
            false
        } else {
            self.arm(doc);
            true
        }
    }

    fn arm(&mut self, doc: &mut Document) {
        debug!("selection mode armed");
        self.session = SelectionSession {
            mode: SelectionMode::Armed,
            anchor: None,
            candidates: Vec::new(),
        };
        doc.set_style_property(doc.root(), "cursor", "crosshair");
        if doc.resolve_selector(&format!("#{OVERLAY_ID}")).is_none() {
            let overlay = doc.create_element("div");
            doc.set_attribute(overlay, "id", OVERLAY_ID);
            doc.set_attribute(
                overlay,
                "style",
                "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
                 background: rgba(0, 122, 204, 0.1); z-index: 9998; pointer-events: none",
            );
            doc.append_child(doc.root(), overlay);
        }
    }

    fn disarm(&mut self, doc: &mut Document) {
        debug!("selection mode disarmed");
        self.clear_highlights(doc);
        self.remove_drag_rect(doc);
        doc.remove_style_property(doc.root(), "cursor");
        if let Some(overlay) = doc.resolve_selector(&format!("#{OVERLAY_ID}")) {
            doc.remove_subtree(overlay);
        }
        self.session = SelectionSession::idle();
    }

    /// Primary-button pointer-down in Armed starts a drag, unless the
    /// pointer is over an interactive control (those keep their native
    /// behavior). Any other button or modifier combination falls
    /// through untouched.
    pub fn pointer_down(&mut self, doc: &mut Document, event: PointerEvent) {
        if self.session.mode != SelectionMode::Armed {
            return;
        }
        if event.button != PointerButton::Primary || event.modifiers.any() {
            return;
        }
        if let Some(target) = doc.hit_test(event.position) {
            if is_interactive(doc, target) {
                debug!(%target, "pointer over interactive control, falling through");
                return;
            }
        }
        self.session.mode = SelectionMode::Dragging;
        self.session.anchor = Some(event.position);
        self.session.candidates.clear();

        let rect = doc.create_element("div");
        doc.set_attribute(rect, "id", DRAG_RECT_ID);
        doc.set_attribute(
            rect,
            "style",
            "position: fixed; border: 1px dashed rgba(0, 122, 204, 0.9); \
             background: rgba(0, 122, 204, 0.15); z-index: 9999; pointer-events: none",
        );
        doc.append_child(doc.root(), rect);
        position_drag_rect(doc, event.position, event.position);
    }

    /// Recompute the rectangle and re-evaluate the candidate set.
    /// Previous highlights are cleared first, so only current-frame
    /// candidates stay marked.
    pub fn pointer_move(&mut self, doc: &mut Document, event: PointerEvent) {
        if self.session.mode != SelectionMode::Dragging {
            return;
        }
        let Some(anchor) = self.session.anchor else {
            return;
        };
        let rect = position_drag_rect(doc, anchor, event.position);
        self.clear_highlights(doc);
        self.session.candidates = intersecting_elements(doc, &rect);
        for candidate in self.session.candidates.clone() {
            doc.add_class(candidate, HIGHLIGHT_CLASS);
        }
    }

    /// End the drag: pick the candidate with the greatest intersection
    /// area against the final rectangle (ties favor document order),
    /// clear the rectangle and highlights, and return to Armed. A drag
    /// with zero candidates selects nothing.
    pub fn pointer_up(&mut self, doc: &mut Document, event: PointerEvent) -> Option<NodeId> {
        if self.session.mode != SelectionMode::Dragging {
            return None;
        }
        let Some(anchor) = self.session.anchor.take() else {
            return None;
        };
        let rect = BoundingBox::from_corners(anchor, event.position);

        self.clear_highlights(doc);
        self.remove_drag_rect(doc);
        self.session.candidates.clear();
        self.session.mode = SelectionMode::Armed;

        let mut best: Option<(NodeId, f64)> = None;
        for id in intersecting_elements(doc, &rect) {
            let area = doc.bounds(id).intersection_area(&rect);
            // Strictly-greater keeps the earliest element on ties.
            if best.map(|(_, best_area)| area > best_area).unwrap_or(true) {
                best = Some((id, area));
            }
        }
        let chosen = best.map(|(id, _)| id);
        match chosen {
            Some(id) => debug!(%id, "drag selected element"),
            None => debug!("drag ended with no candidates"),
        }
        chosen
    }

    fn remove_drag_rect(&self, doc: &mut Document) {
        if let Some(id) = doc.resolve_selector(&format!("#{DRAG_RECT_ID}")) {
            doc.remove_subtree(id);
        }
    }

    fn clear_highlights(&self, doc: &mut Document) {
        for id in doc.elements() {
            doc.remove_class(id, HIGHLIGHT_CLASS);
        }
    }
}

fn position_drag_rect(doc: &mut Document, anchor: Point, current: Point) -> BoundingBox {
    let rect = BoundingBox::from_corners(anchor, current);
    if let Some(id) = doc.resolve_selector(&format!("#{DRAG_RECT_ID}")) {
        doc.set_style_property(id, "top", &format!("{}px", rect.top));
        doc.set_style_property(id, "left", &format!("{}px", rect.left));
        doc.set_style_property(id, "width", &format!("{}px", rect.width));
        doc.set_style_property(id, "height", &format!("{}px", rect.height));
    }
    rect
}

/// Every element whose bounds intersect the rectangle, document order.
fn intersecting_elements(doc: &Document, rect: &BoundingBox) -> Vec<NodeId> {
    doc.elements()
        .into_iter()
        .filter(|id| doc.bounds(*id).intersects(rect))
        .collect()
}

fn is_interactive(doc: &Document, id: NodeId) -> bool {
    let Some(data) = doc.element(id) else {
        return false;
    };
    if INTERACTIVE_TAGS.contains(&data.tag.as_str()) {
        return true;
    }
    doc.attribute(id, "contenteditable")
        .map(|v| v != "false")
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "select_tests.rs"]
mod tests;
