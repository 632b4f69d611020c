//! Arena-backed content tree.
//!
//! Nodes are never freed: a key stays valid after its node is detached, the
//! same way script code keeps a handle to a removed element. Structural
//! mutations reject cycles, non-branch parents and stale keys.

use crate::error::DomError;
use crate::text::{byte_offset, char_len};
use crate::types::{NodeKey, NodeType, Position};
use std::cmp::Ordering;
use std::sync::Arc;

pub struct Document {
    nodes: Vec<NodeRecord>,
    root: NodeKey,
    document_element: NodeKey,
    body: NodeKey,
}

#[derive(Clone)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

#[derive(Clone)]
pub(crate) enum NodeKind {
    Document,
    Element {
        name: Arc<str>,
        attributes: Vec<(Arc<str>, Option<String>)>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
    Fragment,
}

impl NodeKind {
    fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Document => NodeType::Document,
            NodeKind::Element { .. } => NodeType::Element,
            NodeKind::Text { .. } => NodeType::Text,
            NodeKind::Comment { .. } => NodeType::Comment,
            NodeKind::Fragment => NodeType::Fragment,
        }
    }

    fn element(name: &str) -> Self {
        NodeKind::Element {
            name: Arc::from(name.to_ascii_lowercase()),
            attributes: Vec::new(),
        }
    }
}

impl Document {
    /// Creates `#document > html > body`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeKey::INVALID,
            document_element: NodeKey::INVALID,
            body: NodeKey::INVALID,
        };
        let root = doc.alloc(NodeKind::Document);
        let html = doc.alloc(NodeKind::element("html"));
        let body = doc.alloc(NodeKind::element("body"));
        doc.link(root, html);
        doc.link(html, body);
        doc.root = root;
        doc.document_element = html;
        doc.body = body;
        doc
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn document_element(&self) -> NodeKey {
        self.document_element
    }

    pub fn body(&self) -> NodeKey {
        self.body
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeKey {
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeKey(self.nodes.len() as u32)
    }

    // Only used while building the skeleton, where both keys are fresh.
    fn link(&mut self, parent: NodeKey, child: NodeKey) {
        if let Some(record) = self.record_mut(child) {
            record.parent = Some(parent);
        }
        if let Some(record) = self.record_mut(parent) {
            record.children.push(child);
        }
    }

    fn record(&self, key: NodeKey) -> Option<&NodeRecord> {
        if key == NodeKey::INVALID {
            return None;
        }
        self.nodes.get(key.0 as usize - 1)
    }

    fn record_mut(&mut self, key: NodeKey) -> Option<&mut NodeRecord> {
        if key == NodeKey::INVALID {
            return None;
        }
        self.nodes.get_mut(key.0 as usize - 1)
    }

    fn live(&self, key: NodeKey) -> Result<&NodeRecord, DomError> {
        self.record(key).ok_or(DomError::UnknownNode(key))
    }

    fn live_mut(&mut self, key: NodeKey) -> Result<&mut NodeRecord, DomError> {
        self.record_mut(key).ok_or(DomError::UnknownNode(key))
    }

    pub(crate) fn kind(&self, node: NodeKey) -> Option<&NodeKind> {
        self.record(node).map(|r| &r.kind)
    }

    // ---- creation -------------------------------------------------------

    /// Allocates a detached element with no attributes.
    pub fn create_element(&mut self, name: &str) -> NodeKey {
        self.alloc(NodeKind::element(name))
    }

    /// Allocates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeKey {
        self.alloc(NodeKind::Text {
            text: text.to_string(),
        })
    }

    /// Allocates a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeKey {
        self.alloc(NodeKind::Comment {
            text: text.to_string(),
        })
    }

    /// Allocates an empty fragment. Inserting it moves its children.
    pub fn create_fragment(&mut self) -> NodeKey {
        self.alloc(NodeKind::Fragment)
    }

    // ---- node inspection ------------------------------------------------

    /// Whether `node` was allocated by this document.
    pub fn contains_key(&self, node: NodeKey) -> bool {
        self.record(node).is_some()
    }

    /// `None` for keys this document never allocated.
    pub fn node_type(&self, node: NodeKey) -> Option<NodeType> {
        self.record(node).map(|r| r.kind.node_type())
    }

    pub fn is_element(&self, node: NodeKey) -> bool {
        self.node_type(node) == Some(NodeType::Element)
    }

    pub fn is_text(&self, node: NodeKey) -> bool {
        self.node_type(node) == Some(NodeType::Text)
    }

    pub fn is_fragment(&self, node: NodeKey) -> bool {
        self.node_type(node) == Some(NodeType::Fragment)
    }

    pub fn is_character_data(&self, node: NodeKey) -> bool {
        self.node_type(node)
            .is_some_and(NodeType::is_character_data)
    }

    /// Tag name of an element; `None` for other nodes.
    pub fn element_name(&self, node: NodeKey) -> Option<&str> {
        match self.kind(node)? {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Attribute value, matched ASCII case-insensitively.
    pub fn attribute(&self, node: NodeKey, name: &str) -> Option<&str> {
        match self.kind(node)? {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .and_then(|(_, v)| v.as_deref()),
            _ => None,
        }
    }

    /// Sets or adds an attribute. Fails on non-elements.
    pub fn set_attribute(
        &mut self,
        node: NodeKey,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        match &mut self.live_mut(node)?.kind {
            NodeKind::Element { attributes, .. } => {
                if let Some(slot) = attributes
                    .iter_mut()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                {
                    slot.1 = Some(value.to_string());
                } else {
                    attributes.push((Arc::from(name), Some(value.to_string())));
                }
                Ok(())
            }
            _ => Err(DomError::NotABranch(node)),
        }
    }

    /// Character data of a text or comment node.
    pub fn text(&self, node: NodeKey) -> Option<&str> {
        match self.kind(node)? {
            NodeKind::Text { text } | NodeKind::Comment { text } => Some(text),
            _ => None,
        }
    }

    /// Character count of a text or comment node; `0` for anything else.
    pub fn text_len(&self, node: NodeKey) -> usize {
        self.text(node).map(char_len).unwrap_or(0)
    }

    /// The DOM "length": characters for character data, children otherwise.
    pub fn node_length(&self, node: NodeKey) -> usize {
        match self.kind(node) {
            Some(NodeKind::Text { text }) | Some(NodeKind::Comment { text }) => char_len(text),
            Some(_) => self.child_count(node),
            None => 0,
        }
    }

    /// Replaces the character data of a text or comment node.
    pub fn set_text(&mut self, node: NodeKey, value: &str) -> Result<(), DomError> {
        match &mut self.live_mut(node)?.kind {
            NodeKind::Text { text } | NodeKind::Comment { text } => {
                text.clear();
                text.push_str(value);
                Ok(())
            }
            _ => Err(DomError::NotCharacterData(node)),
        }
    }

    /// Removes the characters in `from..to` from a text or comment node.
    pub fn delete_text(&mut self, node: NodeKey, from: usize, to: usize) -> Result<(), DomError> {
        let length = self.node_length(node);
        if from > length || to > length {
            return Err(DomError::OffsetOutOfBounds {
                node,
                offset: from.max(to),
                length,
            });
        }
        match &mut self.live_mut(node)?.kind {
            NodeKind::Text { text } | NodeKind::Comment { text } => {
                if from < to {
                    let lo = byte_offset(text, from);
                    let hi = byte_offset(text, to);
                    text.replace_range(lo..hi, "");
                }
                Ok(())
            }
            _ => Err(DomError::NotCharacterData(node)),
        }
    }

    /// Splits a text node at `offset`; the tail becomes a new sibling
    /// placed right after the original when it is attached.
    pub fn split_text(&mut self, node: NodeKey, offset: usize) -> Result<NodeKey, DomError> {
        let data = match &self.live(node)?.kind {
            NodeKind::Text { text } => text.clone(),
            _ => return Err(DomError::NotCharacterData(node)),
        };
        let length = char_len(&data);
        if offset > length {
            return Err(DomError::OffsetOutOfBounds {
                node,
                offset,
                length,
            });
        }
        let split = byte_offset(&data, offset);
        self.set_text(node, &data[..split])?;
        let tail = self.create_text(&data[split..]);
        if let Some(parent) = self.parent(node) {
            let next = self.next_sibling(node);
            self.insert_before(parent, tail, next)?;
        }
        Ok(tail)
    }

    // ---- navigation -----------------------------------------------------

    /// Parent of `node`, or `None` when detached or a root.
    pub fn parent(&self, node: NodeKey) -> Option<NodeKey> {
        self.record(node)?.parent
    }

    /// Children in order. Empty for leaves and unknown keys.
    pub fn children(&self, node: NodeKey) -> &[NodeKey] {
        self.record(node)
            .map(|r| r.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn child_count(&self, node: NodeKey) -> usize {
        self.children(node).len()
    }

    /// Child at `index`, if there is one.
    pub fn child_at(&self, node: NodeKey, index: usize) -> Option<NodeKey> {
        self.children(node).get(index).copied()
    }

    pub fn first_child(&self, node: NodeKey) -> Option<NodeKey> {
        self.children(node).first().copied()
    }

    pub fn last_child(&self, node: NodeKey) -> Option<NodeKey> {
        self.children(node).last().copied()
    }

    /// Position of `node` among its parent's children.
    pub fn index_in_parent(&self, node: NodeKey) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|k| *k == node)
    }

    pub fn previous_sibling(&self, node: NodeKey) -> Option<NodeKey> {
        let parent = self.parent(node)?;
        let index = self.index_in_parent(node)?;
        index
            .checked_sub(1)
            .and_then(|i| self.child_at(parent, i))
    }

    pub fn next_sibling(&self, node: NodeKey) -> Option<NodeKey> {
        let parent = self.parent(node)?;
        let index = self.index_in_parent(node)?;
        self.child_at(parent, index + 1)
    }

    /// Walks from `node` (inclusive) up to its root.
    pub fn ancestors(&self, node: NodeKey) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.record(node).map(|_| node),
        }
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn contains(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        self.ancestors(node).any(|n| n == ancestor)
    }

    /// Nearest inclusive ancestor shared by `a` and `b`.
    pub fn common_ancestor(&self, a: NodeKey, b: NodeKey) -> Option<NodeKey> {
        let chain: Vec<NodeKey> = self.ancestors(a).collect();
        self.ancestors(b).find(|n| chain.contains(n))
    }

    /// Descendants of `node` in tree order, excluding `node`.
    pub fn descendants(&self, node: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeKey> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Text nodes of `root` (inclusive) in tree order.
    pub fn text_nodes(&self, root: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        if self.is_text(root) {
            out.push(root);
        }
        out.extend(
            self.descendants(root)
                .into_iter()
                .filter(|n| self.is_text(*n)),
        );
        out
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeKey> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.attribute(*n, "id") == Some(id))
    }

    /// Orders two boundary points in tree order.
    pub fn compare_points(&self, a: Position, b: Position) -> Ordering {
        if a.container == b.container {
            return a.offset.cmp(&b.offset);
        }
        let mut ka = self.index_path(a.container);
        ka.push(a.offset);
        let mut kb = self.index_path(b.container);
        kb.push(b.offset);
        ka.cmp(&kb)
    }

    // Child indices from the root down to `node`. A boundary point inside
    // child `i` sorts after `(parent, i)` because its path is longer.
    fn index_path(&self, node: NodeKey) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            path.push(self.index_in_parent(current).unwrap_or(0));
            current = parent;
        }
        path.reverse();
        path
    }

    pub fn check_position(&self, pos: Position) -> Result<(), DomError> {
        self.live(pos.container)?;
        let length = self.node_length(pos.container);
        if pos.offset > length {
            return Err(DomError::OffsetOutOfBounds {
                node: pos.container,
                offset: pos.offset,
                length,
            });
        }
        Ok(())
    }

    // ---- mutation -------------------------------------------------------

    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Inserts `child` before `before` (or last when `None`). A fragment
    /// contributes its children and is left empty; an attached node moves.
    pub fn insert_before(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        before: Option<NodeKey>,
    ) -> Result<(), DomError> {
        if !self.live(parent)?.kind.node_type().allows_children() {
            return Err(DomError::NotABranch(parent));
        }
        if matches!(self.live(child)?.kind, NodeKind::Document) {
            return Err(DomError::InvalidChild(child));
        }
        if self.contains(child, parent) {
            return Err(DomError::Cycle { parent, child });
        }
        let mut before = before;
        if before == Some(child) {
            before = self.next_sibling(child);
        }
        if let Some(reference) = before {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    child: reference,
                });
            }
        }

        let moved = if self.is_fragment(child) {
            std::mem::take(&mut self.live_mut(child)?.children)
        } else {
            self.detach(child);
            vec![child]
        };
        for node in &moved {
            if let Some(record) = self.record_mut(*node) {
                record.parent = Some(parent);
            }
        }
        let siblings = &mut self.live_mut(parent)?.children;
        let index = match before {
            Some(reference) => siblings
                .iter()
                .position(|k| *k == reference)
                .ok_or(DomError::NotAChild {
                    parent,
                    child: reference,
                })?,
            None => siblings.len(),
        };
        siblings.splice(index..index, moved);
        Ok(())
    }

    /// Detaches `node` from its parent. Detached nodes stay addressable.
    pub fn remove(&mut self, node: NodeKey) -> Result<(), DomError> {
        self.live(node)?;
        self.detach(node);
        Ok(())
    }

    fn detach(&mut self, node: NodeKey) {
        let Some(parent) = self.record_mut(node).and_then(|r| r.parent.take()) else {
            return;
        };
        if let Some(record) = self.record_mut(parent) {
            record.children.retain(|k| *k != node);
        }
    }

    /// Puts `new` where `old` is and detaches `old`.
    pub fn replace_child(&mut self, new: NodeKey, old: NodeKey) -> Result<(), DomError> {
        let parent = self.parent(old).ok_or(DomError::NoParent(old))?;
        if new == old {
            return Ok(());
        }
        self.insert_before(parent, new, Some(old))?;
        self.detach(old);
        Ok(())
    }

    /// Copies `node` (and its subtree when `deep`) into a detached node.
    pub fn clone_node(&mut self, node: NodeKey, deep: bool) -> Result<NodeKey, DomError> {
        let kind = self.live(node)?.kind.clone();
        let copy = self.alloc(kind);
        if deep {
            let children = self.children(node).to_vec();
            for child in children {
                let child_copy = self.clone_node(child, true)?;
                self.append_child(copy, child_copy)?;
            }
        }
        Ok(copy)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeKey>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}
