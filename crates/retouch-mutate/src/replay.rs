//! Replay of persisted mutations on page load.

use tracing::debug;

use retouch_dom::Document;
use retouch_store::PersistedMutation;

/// Replay every persisted mutation against the current document.
///
/// Each mutation resolves its stored selector; when it matches, the
/// node is replaced with the first element parsed from the stored
/// markup. Unmatched selectors and undecodable markup are silently
/// skipped: no error, no pruning. Returns how many mutations applied.
pub fn reapply_all(doc: &mut Document, mutations: &[PersistedMutation]) -> usize {
    let mut applied = 0;
    for mutation in mutations {
        let Some(target) = doc.resolve_selector(&mutation.selector) else {
            debug!(selector = %mutation.selector, "selector unmatched, skipping");
            continue;
        };
        let roots = match doc.parse_fragment(&mutation.markup) {
            Ok(roots) => roots,
            Err(e) => {
                debug!(selector = %mutation.selector, error = %e, "stored markup unparseable, skipping");
                continue;
            }
        };
        let Some(first) = roots.iter().copied().find(|id| doc.element(*id).is_some()) else {
            for id in roots {
                doc.remove_subtree(id);
            }
            debug!(selector = %mutation.selector, "stored markup has no element, skipping");
            continue;
        };
        for id in roots.into_iter().filter(|id| *id != first) {
            doc.remove_subtree(id);
        }
        doc.replace_node(target, first);
        applied += 1;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Document {
        let mut doc = Document::new("https://example.com/");
        let nodes = doc
            .parse_fragment("<h1 id=\"title\">Old Title</h1><p>body</p>")
            .unwrap();
        for node in nodes {
            doc.append_child(doc.root(), node);
        }
        doc
    }

    #[test]
    fn test_replay_applies_matching_selector() {
        let mut doc = page();
        let mutations = vec![PersistedMutation::new("#title", "<h1 id=\"title\">New Title</h1>")];

        assert_eq!(reapply_all(&mut doc, &mutations), 1);
        let markup = doc.outer_markup(doc.root());
        assert!(markup.contains("New Title"));
        assert!(!markup.contains("Old Title"));
    }

    #[test]
    fn test_replay_is_stable_across_loads() {
        // Load N applies; load N+1 replays the same stored mutation
        // against a fresh document unchanged.
        let mutations = vec![PersistedMutation::new("#title", "<h1 id=\"title\">New Title</h1>")];

        let mut load_n = page();
        reapply_all(&mut load_n, &mutations);
        let mut load_n1 = page();
        reapply_all(&mut load_n1, &mutations);

        assert_eq!(
            load_n.outer_markup(load_n.root()),
            load_n1.outer_markup(load_n1.root())
        );
    }

    #[test]
    fn test_unmatched_selector_is_silently_skipped() {
        let mut doc = page();
        let before = doc.outer_markup(doc.root());
        let mutations = vec![PersistedMutation::new("#gone", "<p>x</p>")];

        assert_eq!(reapply_all(&mut doc, &mutations), 0);
        assert_eq!(doc.outer_markup(doc.root()), before);
    }

    #[test]
    fn test_bad_stored_markup_is_skipped() {
        let mut doc = page();
        let before = doc.outer_markup(doc.root());
        let mutations = vec![
            PersistedMutation::new("#title", "<div><span>broken</div>"),
            PersistedMutation::new("#title", "no element here"),
        ];

        assert_eq!(reapply_all(&mut doc, &mutations), 0);
        assert_eq!(doc.outer_markup(doc.root()), before);
    }

    #[test]
    fn test_replay_applies_multiple_mutations() {
        let mut doc = page();
        let mutations = vec![
            PersistedMutation::new("#title", "<h1 id=\"title\">T</h1>"),
            PersistedMutation::new("p", "<p class=\"note\">edited</p>"),
        ];

        assert_eq!(reapply_all(&mut doc, &mutations), 2);
        let markup = doc.outer_markup(doc.root());
        assert!(markup.contains("<h1 id=\"title\">T</h1>"));
        assert!(markup.contains("<p class=\"note\">edited</p>"));
    }
}
