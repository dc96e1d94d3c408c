//! AI-path replacement: re-identify the captured node and splice the
//! returned fragment in its place.

use tracing::debug;

use retouch_dom::{Document, NodeId};
use retouch_protocols::error::ApplyError;
use retouch_protocols::ElementSnapshot;

/// A successfully applied replacement, ready to persist.
#[derive(Debug, Clone)]
pub struct AppliedReplacement {
    /// The node now occupying the original's position.
    pub node: NodeId,
    /// Best-effort selector of the original node, computed before the
    /// replacement so replay re-targets the same position.
    pub selector: String,
    /// Canonical serialized form of the replacement element.
    pub markup: String,
}

/// Replace the snapshot's node with the first element parsed from
/// `replacement`.
///
/// Re-identification is an exact serialized-markup equality scan over
/// every element in document order; the first match wins. There is
/// deliberately no id- or selector-based lookup: the node may have no
/// unique selector, and when several nodes share identical markup the
/// first-match ambiguity is accepted. On any failure the document is
/// left untouched.
pub fn apply_replacement(
    doc: &mut Document,
    snapshot: &ElementSnapshot,
    replacement: &str,
) -> Result<AppliedReplacement, ApplyError> {
    let target = doc
        .elements()
        .into_iter()
        .find(|id| doc.outer_markup(*id) == snapshot.markup)
        .ok_or(ApplyError::StaleSnapshot)?;

    let selector = doc.best_effort_selector(target);

    let roots = doc
        .parse_fragment(replacement)
        .map_err(|e| ApplyError::EmptyOrInvalidMarkup(e.to_string()))?;
    let Some(first) = roots.iter().copied().find(|id| doc.element(*id).is_some()) else {
        for id in roots {
            doc.remove_subtree(id);
        }
        return Err(ApplyError::EmptyOrInvalidMarkup(
            "fragment contains no elements".to_string(),
        ));
    };

    let discarded = roots.len() - 1;
    if discarded > 0 {
        debug!(discarded, "discarding trailing fragment nodes");
    }
    for id in roots.into_iter().filter(|id| *id != first) {
        doc.remove_subtree(id);
    }

    let markup = doc.outer_markup(first);
    doc.replace_node(target, first);
    debug!(selector = %selector, "replacement applied");

    Ok(AppliedReplacement {
        node: first,
        selector,
        markup,
    })
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod tests;
