//! A selected region of the document, independent of range family.

use crate::error::SelectionError;
use dom::{
    BoundaryRange, Document, How, NativeRange, NodeKey, Position, RangeApi, RangeKind, TextRange,
};
use std::cmp::Ordering;

/// Id of the marker element used to splice content into legacy text ranges.
pub const PLACEHOLDER_ID: &str = "rangekit-replace-placeholder";

/// Wraps one native range and exposes the same operations for every
/// family. Spans do not follow tree mutations made through other means;
/// re-read the selection after changing the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    native: NativeRange,
}

/// What to put in place of a span's content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Node(NodeKey),
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<NodeKey> for Content {
    fn from(node: NodeKey) -> Self {
        Content::Node(node)
    }
}

/// Element to wrap a span's content in: a new one by tag name, or an
/// existing node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Wrapper {
    Tag(String),
    Node(NodeKey),
}

impl From<&str> for Wrapper {
    fn from(tag: &str) -> Self {
        Wrapper::Tag(tag.to_string())
    }
}

impl From<NodeKey> for Wrapper {
    fn from(node: NodeKey) -> Self {
        Wrapper::Node(node)
    }
}

impl Span {
    pub fn new(native: NativeRange) -> Self {
        Self { native }
    }

    /// Selects `node`, or only what is inside it when `contents_only`.
    pub fn from_node(
        doc: &Document,
        api: RangeApi,
        node: NodeKey,
        contents_only: bool,
    ) -> Result<Self, SelectionError> {
        Ok(Self::new(NativeRange::for_node(doc, api, node, contents_only)?))
    }

    /// The body, collapsed to its start.
    pub fn default_for(doc: &Document, api: RangeApi) -> Self {
        let native = match api {
            RangeApi::Standard => {
                let body = doc.body();
                let at = match doc.parent(body) {
                    Some(parent) => Position::new(parent, doc.index_in_parent(body).unwrap_or(0)),
                    None => Position::new(body, 0),
                };
                NativeRange::Standard(BoundaryRange::collapsed_at(at))
            }
            RangeApi::Legacy => NativeRange::LegacyText(TextRange::collapsed_at(0)),
        };
        Self::new(native)
    }

    pub fn kind(&self) -> RangeKind {
        self.native.kind()
    }

    pub fn native(&self) -> &NativeRange {
        &self.native
    }

    pub(crate) fn native_mut(&mut self) -> &mut NativeRange {
        &mut self.native
    }

    pub fn into_native(self) -> NativeRange {
        self.native
    }

    // ---- queries --------------------------------------------------------

    pub fn get_text(&self, doc: &Document) -> Result<String, SelectionError> {
        match &self.native {
            NativeRange::Standard(range) => Ok(range.to_string(doc)),
            NativeRange::LegacyText(range) => Ok(range.text(doc)),
            NativeRange::LegacyItem(_) => Err(self.native.unsupported("get_text").into()),
        }
    }

    /// Markup of the covered content; elements cut by the span are closed
    /// around the covered part.
    pub fn get_html(&self, doc: &Document) -> Result<String, SelectionError> {
        match &self.native {
            NativeRange::Standard(range) => Ok(range.markup(doc)),
            NativeRange::LegacyText(range) => Ok(range.html_text(doc)),
            NativeRange::LegacyItem(_) => Err(self.native.unsupported("get_html").into()),
        }
    }

    /// A detached fragment holding a deep copy of the covered content.
    pub fn clone_contents(&self, doc: &mut Document) -> Result<NodeKey, SelectionError> {
        match &self.native {
            NativeRange::Standard(range) => Ok(range.clone_contents(doc)?),
            NativeRange::LegacyText(range) => Ok(range.to_boundaries(doc).clone_contents(doc)?),
            NativeRange::LegacyItem(_) => Err(self.native.unsupported("clone_contents").into()),
        }
    }

    pub fn is_collapsed(&self) -> Result<bool, SelectionError> {
        match &self.native {
            NativeRange::Standard(range) => Ok(range.collapsed()),
            NativeRange::LegacyText(range) => {
                Ok(range.compare_end_points(How::StartToEnd, range) == Ordering::Equal)
            }
            NativeRange::LegacyItem(_) => Err(self.native.unsupported("is_collapsed").into()),
        }
    }

    /// Narrowest node holding the whole span. Control ranges cannot answer
    /// that directly and fall back to the parent of their first item.
    pub fn containing_node(&self, doc: &Document) -> Option<NodeKey> {
        match self.native.common_ancestor(doc) {
            Ok(node) => node,
            Err(err) => {
                log::trace!(target: "selection.span", "containing_node fallback: {err}");
                match &self.native {
                    NativeRange::LegacyItem(items) => items.item(0).and_then(|i| doc.parent(i)),
                    _ => None,
                }
            }
        }
    }

    /// Whether the span lies entirely inside `node`.
    pub fn is_in(&self, doc: &Document, node: NodeKey) -> bool {
        self.containing_node(doc)
            .is_some_and(|contain| doc.ancestors(contain).any(|n| n == node))
    }

    /// Both boundary pairs coincide. Accepts a span or a bare native range.
    pub fn equals<R: AsRef<NativeRange> + ?Sized>(&self, other: &R) -> bool {
        self.native.native_equals(other.as_ref())
    }

    // ---- mutators -------------------------------------------------------

    pub fn collapse(&mut self, to_start: bool) -> Result<(), SelectionError> {
        let unsupported = self.native.unsupported("collapse");
        match &mut self.native {
            NativeRange::Standard(range) => range.collapse(to_start),
            NativeRange::LegacyText(range) => range.collapse(to_start),
            NativeRange::LegacyItem(_) => return Err(unsupported.into()),
        }
        Ok(())
    }

    /// Deletes the covered content and puts `content` in its place. A
    /// collapsed span ends up collapsed after the new content; otherwise it
    /// covers exactly the new content. Returns the inserted node (for a
    /// fragment, the now-empty fragment).
    pub fn replace_with(
        &mut self,
        doc: &mut Document,
        content: impl Into<Content>,
    ) -> Result<NodeKey, SelectionError> {
        if self.kind() == RangeKind::LegacyItem {
            return Err(self.native.unsupported("replace_with").into());
        }
        let collapsed = self.is_collapsed()?;
        let node = match content.into() {
            Content::Text(text) => doc.create_text(&text),
            Content::Node(node) => node,
        };
        let (first, last) = if doc.is_fragment(node) {
            (doc.first_child(node), doc.last_child(node))
        } else {
            (Some(node), Some(node))
        };

        match &mut self.native {
            NativeRange::Standard(range) => {
                range.delete_contents(doc)?;
                range.insert_node(doc, node)?;
                if let Some(last) = last {
                    range.set_end_after(doc, last)?;
                }
                if collapsed {
                    range.collapse(false);
                }
            }
            NativeRange::LegacyText(range) => {
                let placeholder = range.paste_marker(doc, PLACEHOLDER_ID)?;
                doc.replace_child(node, placeholder)?;
                if let Some(first) = first {
                    range.set_end_point(How::StartToStart, &TextRange::for_node(doc, first)?);
                }
                if let Some(last) = last {
                    range.set_end_point(How::EndToEnd, &TextRange::for_node(doc, last)?);
                }
                if collapsed {
                    range.collapse(false);
                }
            }
            NativeRange::LegacyItem(_) => {}
        }
        log::debug!(target: "selection.span", "replaced span content with {node:?}");
        Ok(node)
    }

    /// Moves a copy of the covered content into `wrapper` and replaces the
    /// span with it. Returns the wrapper.
    pub fn wrap_with(
        &mut self,
        doc: &mut Document,
        wrapper: impl Into<Wrapper>,
    ) -> Result<NodeKey, SelectionError> {
        let wrapper = match wrapper.into() {
            Wrapper::Tag(tag) => doc.create_element(&tag),
            Wrapper::Node(node) => node,
        };
        let contents = self.clone_contents(doc)?;
        doc.append_child(wrapper, contents)?;
        self.replace_with(doc, wrapper)
    }
}

impl AsRef<NativeRange> for Span {
    fn as_ref(&self) -> &NativeRange {
        &self.native
    }
}

impl From<NativeRange> for Span {
    fn from(native: NativeRange) -> Self {
        Self::new(native)
    }
}
