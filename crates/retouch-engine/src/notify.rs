//! On-page notice rendering.

use retouch_dom::Document;
use retouch_protocols::{Notice, NoticeLevel};

/// Id of the transient notice element. At most one exists at a time;
/// a new notice replaces the previous one.
pub const NOTICE_ID: &str = "retouch-notice";

/// Render a notice into the document, replacing any previous notice
/// element.
pub fn show_notice(doc: &mut Document, notice: &Notice) {
    if let Some(existing) = doc.resolve_selector(&format!("#{NOTICE_ID}")) {
        doc.remove_subtree(existing);
    }
    let level = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "success",
        NoticeLevel::Error => "error",
    };
    let element = doc.create_element("div");
    doc.set_attribute(element, "id", NOTICE_ID);
    doc.set_attribute(element, "class", &format!("retouch-notice retouch-notice-{level}"));
    doc.set_attribute(
        element,
        "style",
        "position: fixed; top: 70px; right: 20px; background: #333; color: white; \
         padding: 12px 16px; border-radius: 6px; z-index: 10001; max-width: 300px",
    );
    let text = doc.create_text(&notice.message);
    doc.append_child(element, text);
    let root = doc.root();
    doc.append_child(root, element);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_is_rendered_into_document() {
        let mut doc = Document::new("https://example.com/");
        show_notice(&mut doc, &Notice::error("element not found"));

        let notice = doc.resolve_selector(&format!("#{NOTICE_ID}")).unwrap();
        assert_eq!(doc.inner_text(notice), "element not found");
        assert!(doc.has_class(notice, "retouch-notice-error"));
    }

    #[test]
    fn test_new_notice_replaces_previous() {
        let mut doc = Document::new("https://example.com/");
        show_notice(&mut doc, &Notice::info("first"));
        show_notice(&mut doc, &Notice::success("second"));

        let notices: Vec<_> = doc
            .elements()
            .into_iter()
            .filter(|id| doc.attribute(*id, "id") == Some(NOTICE_ID))
            .collect();
        assert_eq!(notices.len(), 1);
        assert_eq!(doc.inner_text(notices[0]), "second");
        assert!(doc.has_class(notices[0], "retouch-notice-success"));
    }
}
