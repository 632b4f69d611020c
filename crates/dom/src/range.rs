//! Boundary-point ranges (the standard range family).
//!
//! Ranges are plain values: they do not observe the tree. A caller that
//! mutates the document through something other than the range itself must
//! rebuild its ranges afterwards.

use crate::document::Document;
use crate::error::DomError;
use crate::native::How;
use crate::text::char_slice;
use crate::types::{NodeKey, Position};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryRange {
    start: Position,
    end: Position,
}

/// Children of the common ancestor split by how the range covers them.
struct Partition {
    first_partial: Option<NodeKey>,
    contained: Vec<NodeKey>,
    last_partial: Option<NodeKey>,
}

impl BoundaryRange {
    /// Builds a range from two points already in document order.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn collapsed_at(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Selects `node` itself, as a child of its parent.
    pub fn select_node(doc: &Document, node: NodeKey) -> Result<Self, DomError> {
        let parent = doc.parent(node).ok_or(DomError::NoParent(node))?;
        let index = doc.index_in_parent(node).ok_or(DomError::NoParent(node))?;
        Ok(Self::new(
            Position::new(parent, index),
            Position::new(parent, index + 1),
        ))
    }

    /// Selects everything inside `node`.
    pub fn select_node_contents(doc: &Document, node: NodeKey) -> Result<Self, DomError> {
        if !doc.contains_key(node) {
            return Err(DomError::UnknownNode(node));
        }
        Ok(Self::new(
            Position::new(node, 0),
            Position::new(node, doc.node_length(node)),
        ))
    }

    /// Start boundary point.
    pub fn start(&self) -> Position {
        self.start
    }

    /// End boundary point; never before the start.
    pub fn end(&self) -> Position {
        self.end
    }

    pub fn collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Moves the start; an end that would precede it collapses onto it.
    pub fn set_start(&mut self, doc: &Document, pos: Position) -> Result<(), DomError> {
        doc.check_position(pos)?;
        self.start = pos;
        if doc.compare_points(pos, self.end) == Ordering::Greater {
            self.end = pos;
        }
        Ok(())
    }

    /// Moves the end; a start that would follow it collapses onto it.
    pub fn set_end(&mut self, doc: &Document, pos: Position) -> Result<(), DomError> {
        doc.check_position(pos)?;
        self.end = pos;
        if doc.compare_points(pos, self.start) == Ordering::Less {
            self.start = pos;
        }
        Ok(())
    }

    /// Puts the end right after `node` in its parent.
    pub fn set_end_after(&mut self, doc: &Document, node: NodeKey) -> Result<(), DomError> {
        let parent = doc.parent(node).ok_or(DomError::NoParent(node))?;
        let index = doc.index_in_parent(node).ok_or(DomError::NoParent(node))?;
        self.set_end(doc, Position::new(parent, index + 1))
    }

    /// Collapses onto the start, or onto the end when `to_start` is false.
    pub fn collapse(&mut self, to_start: bool) {
        if to_start {
            self.end = self.start;
        } else {
            self.start = self.end;
        }
    }

    /// Nearest node containing both boundary containers.
    pub fn common_ancestor(&self, doc: &Document) -> Option<NodeKey> {
        doc.common_ancestor(self.start.container, self.end.container)
    }

    /// Compares one of our endpoints with one of `other`'s. The first half
    /// of `how` names our endpoint, the second half names theirs.
    pub fn compare_boundary_points(
        &self,
        doc: &Document,
        how: How,
        other: &BoundaryRange,
    ) -> Ordering {
        let (ours, theirs) = match how {
            How::StartToStart => (self.start, other.start),
            How::StartToEnd => (self.start, other.end),
            How::EndToStart => (self.end, other.start),
            How::EndToEnd => (self.end, other.end),
        };
        doc.compare_points(ours, theirs)
    }

    fn before(doc: &Document, a: Position, b: Position) -> bool {
        doc.compare_points(a, b) == Ordering::Less
    }

    /// A node is contained when both of its edges fall strictly inside us.
    fn contains_node(&self, doc: &Document, node: NodeKey) -> bool {
        Self::before(doc, self.start, Position::new(node, 0))
            && Self::before(doc, Position::new(node, doc.node_length(node)), self.end)
    }

    fn partition(&self, doc: &Document, common: NodeKey) -> Partition {
        let (start, end) = (self.start.container, self.end.container);
        let child_of_common =
            |from: NodeKey| doc.ancestors(from).find(|n| doc.parent(*n) == Some(common));
        Partition {
            first_partial: if doc.contains(start, end) {
                None
            } else {
                child_of_common(start)
            },
            contained: doc
                .children(common)
                .iter()
                .copied()
                .filter(|c| self.contains_node(doc, *c))
                .collect(),
            last_partial: if doc.contains(end, start) {
                None
            } else {
                child_of_common(end)
            },
        }
    }

    /// Text covered by the range, partial text nodes included.
    pub fn to_string(&self, doc: &Document) -> String {
        let mut out = String::new();
        if self.collapsed() {
            return out;
        }
        let Some(common) = self.common_ancestor(doc) else {
            return out;
        };
        for text in doc.text_nodes(common) {
            let len = doc.text_len(text);
            let from = if self.start.container == text {
                self.start.offset
            } else if doc.compare_points(self.start, Position::new(text, 0)) != Ordering::Greater {
                0
            } else {
                len
            };
            let to = if self.end.container == text {
                self.end.offset
            } else if doc.compare_points(self.end, Position::new(text, len)) != Ordering::Less {
                len
            } else {
                0
            };
            if let Some(data) = doc.text(text) {
                out.push_str(char_slice(data, from, to));
            }
        }
        out
    }

    /// Markup of the covered content. Partially covered elements are
    /// closed around the part that is inside the range.
    pub fn markup(&self, doc: &Document) -> String {
        let mut out = String::new();
        self.write_markup(doc, &mut out);
        out
    }

    fn write_markup(&self, doc: &Document, out: &mut String) {
        if self.collapsed() {
            return;
        }
        let (start, end) = (self.start, self.end);
        if start.container == end.container && doc.is_character_data(start.container) {
            doc.write_character_data(start.container, start.offset, end.offset, out);
            return;
        }
        let Some(common) = self.common_ancestor(doc) else {
            return;
        };
        let parts = self.partition(doc, common);
        if let Some(first) = parts.first_partial {
            if doc.is_character_data(first) {
                doc.write_character_data(first, start.offset, doc.node_length(first), out);
            } else {
                doc.write_open_tag(first, out);
                Self::new(start, Position::new(first, doc.node_length(first))).write_markup(doc, out);
                doc.write_close_tag(first, out);
            }
        }
        for node in parts.contained {
            doc.write_node(node, out);
        }
        if let Some(last) = parts.last_partial {
            if doc.is_character_data(last) {
                doc.write_character_data(last, 0, end.offset, out);
            } else {
                doc.write_open_tag(last, out);
                Self::new(Position::new(last, 0), end).write_markup(doc, out);
                doc.write_close_tag(last, out);
            }
        }
    }

    /// Deep copy of the covered content in a new detached fragment.
    pub fn clone_contents(&self, doc: &mut Document) -> Result<NodeKey, DomError> {
        let fragment = doc.create_fragment();
        if self.collapsed() {
            return Ok(fragment);
        }
        let (start, end) = (self.start, self.end);
        if start.container == end.container && doc.is_character_data(start.container) {
            let clone = Self::clone_character_data(doc, start.container, start.offset, end.offset)?;
            doc.append_child(fragment, clone)?;
            return Ok(fragment);
        }
        let Some(common) = self.common_ancestor(doc) else {
            return Ok(fragment);
        };
        let parts = self.partition(doc, common);
        if let Some(first) = parts.first_partial {
            let clone = if doc.is_character_data(first) {
                let len = doc.node_length(first);
                Self::clone_character_data(doc, first, start.offset, len)?
            } else {
                let shell = doc.clone_node(first, false)?;
                let inner = Self::new(start, Position::new(first, doc.node_length(first)))
                    .clone_contents(doc)?;
                doc.append_child(shell, inner)?;
                shell
            };
            doc.append_child(fragment, clone)?;
        }
        for node in parts.contained {
            let clone = doc.clone_node(node, true)?;
            doc.append_child(fragment, clone)?;
        }
        if let Some(last) = parts.last_partial {
            let clone = if doc.is_character_data(last) {
                Self::clone_character_data(doc, last, 0, end.offset)?
            } else {
                let shell = doc.clone_node(last, false)?;
                let inner = Self::new(Position::new(last, 0), end).clone_contents(doc)?;
                doc.append_child(shell, inner)?;
                shell
            };
            doc.append_child(fragment, clone)?;
        }
        Ok(fragment)
    }

    fn clone_character_data(
        doc: &mut Document,
        node: NodeKey,
        from: usize,
        to: usize,
    ) -> Result<NodeKey, DomError> {
        let data = doc
            .text(node)
            .map(|t| char_slice(t, from, to).to_string())
            .ok_or(DomError::NotCharacterData(node))?;
        let clone = doc.clone_node(node, false)?;
        doc.set_text(clone, &data)?;
        Ok(clone)
    }

    /// Removes the covered content and collapses onto the gap it leaves.
    pub fn delete_contents(&mut self, doc: &mut Document) -> Result<(), DomError> {
        if self.collapsed() {
            return Ok(());
        }
        let (start, end) = (self.start, self.end);
        if start.container == end.container && doc.is_character_data(start.container) {
            doc.delete_text(start.container, start.offset, end.offset)?;
            self.end = start;
            return Ok(());
        }
        let Some(common) = self.common_ancestor(doc) else {
            return Ok(());
        };

        let to_remove: Vec<NodeKey> = doc
            .descendants(common)
            .into_iter()
            .filter(|n| {
                self.contains_node(doc, *n)
                    && !doc.parent(*n).is_some_and(|p| self.contains_node(doc, p))
            })
            .collect();

        let collapse_to = if doc.contains(start.container, end.container) {
            start
        } else {
            let mut reference = start.container;
            while let Some(parent) = doc.parent(reference) {
                if doc.contains(parent, end.container) {
                    break;
                }
                reference = parent;
            }
            let parent = doc.parent(reference).ok_or(DomError::NoParent(reference))?;
            let index = doc.index_in_parent(reference).unwrap_or(0);
            Position::new(parent, index + 1)
        };

        log::trace!(
            target: "dom.range",
            "delete_contents: removing {} subtrees, collapsing to {collapse_to:?}",
            to_remove.len()
        );

        if doc.is_character_data(start.container) {
            let len = doc.node_length(start.container);
            doc.delete_text(start.container, start.offset, len)?;
        }
        for node in to_remove {
            doc.remove(node)?;
        }
        if doc.is_character_data(end.container) {
            doc.delete_text(end.container, 0, end.offset)?;
        }
        self.start = collapse_to;
        self.end = collapse_to;
        Ok(())
    }

    /// Inserts `node` at the start point. A text start container is split
    /// first. A collapsed range grows to cover the inserted node.
    pub fn insert_node(&mut self, doc: &mut Document, node: NodeKey) -> Result<(), DomError> {
        let start = self.start;
        let (parent, mut reference) = if doc.is_text(start.container) {
            let parent = doc
                .parent(start.container)
                .ok_or(DomError::NoParent(start.container))?;
            let tail = doc.split_text(start.container, start.offset)?;
            if self.end.container == start.container && self.end.offset > start.offset {
                self.end = Position::new(tail, self.end.offset - start.offset);
            }
            (parent, Some(tail))
        } else if doc.is_character_data(start.container) {
            return Err(DomError::InvalidChild(start.container));
        } else {
            (start.container, doc.child_at(start.container, start.offset))
        };
        if reference == Some(node) {
            reference = doc.next_sibling(node);
        }
        doc.remove(node)?;

        let inserted = if doc.is_fragment(node) {
            doc.child_count(node)
        } else {
            1
        };
        let index = match reference {
            Some(r) => doc.index_in_parent(r).unwrap_or(0),
            None => doc.child_count(parent),
        };
        doc.insert_before(parent, node, reference)?;
        if self.collapsed() {
            self.end = Position::new(parent, index + inserted);
        }
        Ok(())
    }
}
