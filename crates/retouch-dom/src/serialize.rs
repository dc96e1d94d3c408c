//! Markup serialization.
//!
//! The serializer defines the canonical markup form: lowercase tags,
//! double-quoted attributes in source order, `&`/`<`/`>` escaped in
//! text and `&`/`"` in attribute values, void elements without a close
//! tag. The fragment parser accepts exactly this language.

use crate::document::Document;
use crate::node::{is_void_element, Node, NodeId};

impl Document {
    /// Serialized outer structure of a node.
    pub fn outer_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialized children of an element.
    pub fn inner_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_node(*child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.node(id) {
            Some(Node::Text(text)) => out.push_str(&escape_text(text)),
            Some(Node::Element(data)) => {
                out.push('<');
                out.push_str(&data.tag);
                for (name, value) in &data.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(value));
                    out.push('"');
                }
                out.push('>');
                if is_void_element(&data.tag) {
                    return;
                }
                for child in &data.children {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(&data.tag);
                out.push('>');
            }
            None => {}
        }
    }
}

pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outer_markup_nested() {
        let mut doc = Document::new("https://example.com/");
        let div = doc.create_element("div");
        doc.set_attribute(div, "id", "card");
        doc.set_attribute(div, "class", "box primary");
        let p = doc.create_element("p");
        doc.append_child(doc.root(), div);
        doc.append_child(div, p);
        let text = doc.create_text("Hello");
        doc.append_child(p, text);

        assert_eq!(
            doc.outer_markup(div),
            "<div id=\"card\" class=\"box primary\"><p>Hello</p></div>"
        );
    }

    #[test]
    fn test_void_element_has_no_close_tag() {
        let mut doc = Document::new("https://example.com/");
        let img = doc.create_element("img");
        doc.set_attribute(img, "src", "a.png");
        doc.append_child(doc.root(), img);

        assert_eq!(doc.outer_markup(img), "<img src=\"a.png\">");
    }

    #[test]
    fn test_text_escaping() {
        let mut doc = Document::new("https://example.com/");
        let p = doc.create_element("p");
        doc.append_child(doc.root(), p);
        let text = doc.create_text("1 < 2 & 3 > 2");
        doc.append_child(p, text);

        assert_eq!(doc.outer_markup(p), "<p>1 &lt; 2 &amp; 3 &gt; 2</p>");
    }

    #[test]
    fn test_attribute_escaping() {
        let mut doc = Document::new("https://example.com/");
        let div = doc.create_element("div");
        doc.set_attribute(div, "title", "say \"hi\" & bye");
        doc.append_child(doc.root(), div);

        assert_eq!(
            doc.outer_markup(div),
            "<div title=\"say &quot;hi&quot; &amp; bye\"></div>"
        );
    }

    #[test]
    fn test_inner_markup() {
        let mut doc = Document::new("https://example.com/");
        let div = doc.create_element("div");
        doc.append_child(doc.root(), div);
        let text = doc.create_text("a");
        doc.append_child(div, text);
        let br = doc.create_element("br");
        doc.append_child(div, br);

        assert_eq!(doc.inner_markup(div), "a<br>");
    }
}
