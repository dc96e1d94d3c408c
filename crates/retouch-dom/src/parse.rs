//! Fragment parsing.
//!
//! Accepts the canonical subset the serializer emits (plus the small
//! liberties a mediator takes: single-quoted or unquoted attribute
//! values, self-closing syntax, comments). Parsed nodes are allocated
//! detached in the document arena; on error everything allocated by
//! the failed parse is freed again.

use crate::document::Document;
use crate::error::DomError;
use crate::node::{is_void_element, NodeId};

impl Document {
    /// Parse a markup fragment into detached nodes, returning the
    /// top-level node ids in order.
    ///
    /// A fragment with no elements (empty input, bare text) is not a
    /// parse error; callers that require an element decide what an
    /// element-free fragment means.
    pub fn parse_fragment(&mut self, input: &str) -> Result<Vec<NodeId>, DomError> {
        let mut parser = Parser {
            doc: self,
            bytes: input.as_bytes(),
            pos: 0,
            created: Vec::new(),
        };
        match parser.parse_nodes(None) {
            Ok(nodes) => Ok(nodes),
            Err(err) => {
                let created = std::mem::take(&mut parser.created);
                for id in created {
                    parser.doc.remove_subtree(id);
                }
                Err(err)
            }
        }
    }
}

struct Parser<'a> {
    doc: &'a mut Document,
    bytes: &'a [u8],
    pos: usize,
    created: Vec<NodeId>,
}

impl Parser<'_> {
    fn eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.bytes[self.pos..].starts_with(prefix.as_bytes())
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), DomError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(DomError::parse(
                self.pos,
                format!("expected '{}'", byte as char),
            ))
        }
    }

    fn parse_nodes(&mut self, parent_tag: Option<&str>) -> Result<Vec<NodeId>, DomError> {
        let mut nodes = Vec::new();
        loop {
            if self.eof() {
                return match parent_tag {
                    Some(tag) => Err(DomError::parse(
                        self.pos,
                        format!("unexpected end of input, expected </{tag}>"),
                    )),
                    None => Ok(nodes),
                };
            }
            if self.starts_with("</") {
                let offset = self.pos;
                self.pos += 2;
                let name = self.parse_name(offset)?;
                self.skip_whitespace();
                self.expect(b'>')?;
                return match parent_tag {
                    Some(tag) if tag == name => Ok(nodes),
                    Some(tag) => Err(DomError::parse(
                        offset,
                        format!("mismatched close tag </{name}>, expected </{tag}>"),
                    )),
                    None => Err(DomError::parse(
                        offset,
                        format!("unexpected close tag </{name}>"),
                    )),
                };
            }
            if self.starts_with("<!--") {
                self.skip_comment()?;
            } else if self.starts_with("<!") {
                self.skip_declaration()?;
            } else if self.peek() == Some(b'<') {
                nodes.push(self.parse_element()?);
            } else {
                nodes.push(self.parse_text());
            }
        }
    }

    fn parse_element(&mut self) -> Result<NodeId, DomError> {
        self.expect(b'<')?;
        let name_offset = self.pos;
        let tag = self.parse_name(name_offset)?;
        let id = self.doc.create_element(&tag);
        self.created.push(id);

        let mut self_closed = false;
        loop {
            self.skip_whitespace();
            if self.starts_with("/>") {
                self.pos += 2;
                self_closed = true;
                break;
            }
            if self.peek() == Some(b'>') {
                self.pos += 1;
                break;
            }
            let attr_offset = self.pos;
            let name = self.parse_name(attr_offset)?;
            self.skip_whitespace();
            let value = if self.peek() == Some(b'=') {
                self.pos += 1;
                self.skip_whitespace();
                self.parse_attribute_value()?
            } else {
                String::new()
            };
            self.doc.set_attribute(id, &name, &value);
        }

        if self_closed || is_void_element(&tag) {
            return Ok(id);
        }

        let children = self.parse_nodes(Some(&tag))?;
        for child in children {
            self.doc.append_child(id, child);
        }
        Ok(id)
    }

    fn parse_name(&mut self, offset: usize) -> Result<String, DomError> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'-' || b == b'_') {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(DomError::parse(offset, "expected a name"));
        }
        // Names are ASCII by construction of the loop above.
        Ok(String::from_utf8_lossy(&self.bytes[start..self.pos]).to_ascii_lowercase())
    }

    fn parse_attribute_value(&mut self) -> Result<String, DomError> {
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.pos += 1;
                let start = self.pos;
                while let Some(b) = self.peek() {
                    if b == quote {
                        let raw = &self.bytes[start..self.pos];
                        self.pos += 1;
                        return Ok(unescape(raw));
                    }
                    self.pos += 1;
                }
                Err(DomError::parse(start, "unterminated attribute value"))
            }
            Some(_) => {
                let start = self.pos;
                while matches!(self.peek(), Some(b) if !b.is_ascii_whitespace() && b != b'>' && b != b'/')
                {
                    self.pos += 1;
                }
                if self.pos == start {
                    return Err(DomError::parse(start, "expected an attribute value"));
                }
                Ok(unescape(&self.bytes[start..self.pos]))
            }
            None => Err(DomError::parse(self.pos, "expected an attribute value")),
        }
    }

    fn parse_text(&mut self) -> NodeId {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b != b'<') {
            self.pos += 1;
        }
        let id = self.doc.create_text(unescape(&self.bytes[start..self.pos]));
        self.created.push(id);
        id
    }

    fn skip_comment(&mut self) -> Result<(), DomError> {
        let offset = self.pos;
        self.pos += 4;
        while self.pos < self.bytes.len() {
            if self.starts_with("-->") {
                self.pos += 3;
                return Ok(());
            }
            self.pos += 1;
        }
        Err(DomError::parse(offset, "unterminated comment"))
    }

    fn skip_declaration(&mut self) -> Result<(), DomError> {
        let offset = self.pos;
        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'>' {
                return Ok(());
            }
        }
        Err(DomError::parse(offset, "unterminated declaration"))
    }
}

/// Decode the entity subset the serializer emits; unknown entities pass
/// through verbatim.
fn unescape(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let mut out = String::with_capacity(text.len());
    let mut rest = text.as_ref();
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];
        let known = [
            ("&amp;", '&'),
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&quot;", '"'),
            ("&apos;", '\''),
            ("&#39;", '\''),
        ];
        match known.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
