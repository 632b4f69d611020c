use crate::document::{Document, NodeKind};
use crate::text::char_slice;
use crate::types::NodeKey;
use html_escape::{encode_double_quoted_attribute, encode_text};

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

impl Document {
    /// Concatenated text of every text node in `node` (inclusive).
    pub fn text_content(&self, node: NodeKey) -> String {
        match self.kind(node) {
            Some(NodeKind::Text { text }) | Some(NodeKind::Comment { text }) => text.clone(),
            Some(_) => self
                .text_nodes(node)
                .into_iter()
                .filter_map(|t| self.text(t))
                .collect(),
            None => String::new(),
        }
    }

    pub fn inner_html(&self, node: NodeKey) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.write_node(*child, &mut out);
        }
        out
    }

    pub fn outer_html(&self, node: NodeKey) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    pub(crate) fn write_node(&self, node: NodeKey, out: &mut String) {
        match self.kind(node) {
            Some(NodeKind::Element { .. }) => {
                self.write_open_tag(node, out);
                for child in self.children(node) {
                    self.write_node(*child, out);
                }
                self.write_close_tag(node, out);
            }
            Some(NodeKind::Text { text }) => out.push_str(&encode_text(text)),
            Some(NodeKind::Comment { text }) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            Some(NodeKind::Document) | Some(NodeKind::Fragment) => {
                for child in self.children(node) {
                    self.write_node(*child, out);
                }
            }
            None => {}
        }
    }

    pub(crate) fn write_open_tag(&self, node: NodeKey, out: &mut String) {
        let Some(NodeKind::Element { name, attributes }) = self.kind(node) else {
            return;
        };
        out.push('<');
        out.push_str(name);
        for (key, value) in attributes {
            out.push(' ');
            out.push_str(key);
            if let Some(value) = value {
                out.push_str("=\"");
                out.push_str(&encode_double_quoted_attribute(value));
                out.push('"');
            }
        }
        out.push('>');
    }

    pub(crate) fn write_close_tag(&self, node: NodeKey, out: &mut String) {
        let Some(name) = self.element_name(node) else {
            return;
        };
        if VOID_ELEMENTS.contains(&name) {
            return;
        }
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }

    /// Writes the characters `from..to` of a text or comment node.
    pub(crate) fn write_character_data(
        &self,
        node: NodeKey,
        from: usize,
        to: usize,
        out: &mut String,
    ) {
        match self.kind(node) {
            Some(NodeKind::Text { text }) => out.push_str(&encode_text(char_slice(text, from, to))),
            Some(NodeKind::Comment { text }) => {
                out.push_str("<!--");
                out.push_str(char_slice(text, from, to));
                out.push_str("-->");
            }
            _ => {}
        }
    }
}
