//! Element equivalence: does a span delimit exactly one element's content?
//!
//! Boundary ranges can express the same visual selection in several ways.
//! A span that starts at the end of a text node is visually identical to
//! one that starts at the following element, and a span sitting on
//! `<p>`'s child boundaries covers the same content as one running from
//! offset 0 of its first text node to the end of its last. The search
//! below finds an element on each edge, then looks for the smallest node
//! whose first-child chain reaches the left edge and whose last-child chain
//! reaches the right edge.

use crate::span::Span;
use dom::{BoundaryRange, Document, How, NativeRange, NodeKey, Position, TextRange};
use std::cmp::Ordering;

impl Span {
    /// Returns the element whose content this span covers, if any.
    ///
    /// With `normalize`, the span's boundaries snap onto the text edges of
    /// the elements found on either side, even when no single element
    /// matches. With `outermost`, a match is promoted through sole-child
    /// parents; reaching `outermost` returns it, otherwise the first match
    /// stands.
    pub fn is_element(
        &mut self,
        doc: &Document,
        normalize: bool,
        outermost: Option<NodeKey>,
    ) -> Option<NodeKey> {
        match self.native_mut() {
            NativeRange::LegacyItem(items) => items.item(0),
            NativeRange::LegacyText(range) => legacy_element(doc, range),
            NativeRange::Standard(range) => {
                if range.collapsed() {
                    return None;
                }
                let found = standard_element(doc, range, normalize)?;
                match outermost {
                    Some(bound) => Some(promote_to(doc, found, bound)),
                    None => Some(found),
                }
            }
        }
    }
}

fn legacy_element(doc: &Document, range: &TextRange) -> Option<NodeKey> {
    let element = range.parent_element(doc);
    let covering = TextRange::for_node(doc, element).ok()?;
    let same = range.compare_end_points(How::StartToStart, &covering) == Ordering::Equal
        && range.compare_end_points(How::EndToEnd, &covering) == Ordering::Equal;
    same.then_some(element)
}

fn standard_element(doc: &Document, range: &mut BoundaryRange, normalize: bool) -> Option<NodeKey> {
    let (start, end) = (range.start(), range.end());
    let whole_container = start.container == end.container
        && start.offset == 0
        && end.offset == doc.child_count(start.container)
        && !doc.is_character_data(start.container);

    let (left, right) = if whole_container {
        // Never snapped, so the span still equals a fresh node-contents span.
        (Some(start.container), Some(start.container))
    } else {
        let left = left_edge(doc, start).map(|n| innermost(doc, n, Document::first_child));
        let right = right_edge(doc, end).map(|n| innermost(doc, n, Document::last_child));
        if normalize {
            snap(doc, range, left, right);
        }
        (left, right)
    };
    log::trace!(target: "selection.span", "is_element edges: left={left:?} right={right:?}");

    let (left, right) = (left?, right?);
    if !doc.is_element(left) || !doc.is_element(right) {
        return None;
    }
    common_edge(doc, left, right)
}

fn left_edge(doc: &Document, start: Position) -> Option<NodeKey> {
    let container = start.container;
    if doc.is_text(container) {
        if start.offset == doc.text_len(container) {
            let mut node = Some(container);
            while let Some(current) = node {
                if let Some(next) = doc.next_sibling(current) {
                    return doc.is_element(next).then_some(next);
                }
                node = doc.parent(current);
            }
            None
        } else if start.offset == 0 && doc.previous_sibling(container).is_none() {
            doc.parent(container)
        } else {
            None
        }
    } else if doc.is_character_data(container) {
        None
    } else {
        let child = doc.child_at(container, start.offset)?;
        if doc.is_element(child) {
            Some(child)
        } else if doc.previous_sibling(child).is_none() {
            doc.parent(child)
        } else {
            None
        }
    }
}

fn right_edge(doc: &Document, end: Position) -> Option<NodeKey> {
    let container = end.container;
    if doc.is_text(container) {
        if end.offset == 0 {
            let mut node = Some(container);
            while let Some(current) = node {
                if let Some(previous) = doc.previous_sibling(current) {
                    return doc.is_element(previous).then_some(previous);
                }
                node = doc.parent(current);
            }
            None
        } else if end.offset == doc.text_len(container) && doc.next_sibling(container).is_none() {
            doc.parent(container)
        } else {
            None
        }
    } else if doc.is_character_data(container) {
        None
    } else {
        let child = doc.child_at(container, end.offset.saturating_sub(1))?;
        if doc.is_element(child) {
            Some(child)
        } else if doc.next_sibling(child).is_none() {
            doc.parent(child)
        } else {
            None
        }
    }
}

// Follows first (or last) children down while they are elements.
fn innermost(
    doc: &Document,
    mut node: NodeKey,
    edge_child: fn(&Document, NodeKey) -> Option<NodeKey>,
) -> NodeKey {
    while let Some(child) = edge_child(doc, node).filter(|c| doc.is_element(*c)) {
        node = child;
    }
    node
}

fn snap(doc: &Document, range: &mut BoundaryRange, left: Option<NodeKey>, right: Option<NodeKey>) {
    if let Some(first) = left
        .and_then(|l| doc.first_child(l))
        .filter(|c| doc.is_text(*c))
    {
        if let Err(err) = range.set_start(doc, Position::new(first, 0)) {
            log::warn!(target: "selection.span", "could not snap start: {err}");
        }
    }
    if let Some(last) = right
        .and_then(|r| doc.last_child(r))
        .filter(|c| doc.is_text(*c))
    {
        if let Err(err) = range.set_end(doc, Position::new(last, doc.text_len(last))) {
            log::warn!(target: "selection.span", "could not snap end: {err}");
        }
    }
}

fn is_first_child(doc: &Document, node: NodeKey) -> bool {
    doc.parent(node)
        .is_some_and(|p| doc.first_child(p) == Some(node) && doc.is_element(p))
}

fn is_last_child(doc: &Document, node: NodeKey) -> bool {
    doc.parent(node)
        .is_some_and(|p| doc.last_child(p) == Some(node) && doc.is_element(p))
}

// Smallest element whose first-child chain reaches `left` and whose
// last-child chain reaches `right`.
fn common_edge(doc: &Document, left: NodeKey, right: NodeKey) -> Option<NodeKey> {
    let mut left_edge = left;
    loop {
        let mut right_edge = right;
        loop {
            if left_edge == right_edge {
                return Some(left_edge);
            }
            if !is_last_child(doc, right_edge) {
                break;
            }
            right_edge = doc.parent(right_edge)?;
        }
        if !is_first_child(doc, left_edge) {
            return None;
        }
        left_edge = doc.parent(left_edge)?;
    }
}

fn promote_to(doc: &Document, found: NodeKey, outermost: NodeKey) -> NodeKey {
    let mut current = found;
    loop {
        if current == outermost {
            return current;
        }
        match doc.parent(current) {
            Some(parent) if doc.children(parent) == [current] && doc.is_element(parent) => {
                current = parent;
            }
            _ => return found,
        }
    }
}
