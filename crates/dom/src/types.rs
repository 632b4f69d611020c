/// Opaque identity of a node within one [`Document`](crate::Document).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

impl NodeKey {
    /// Reserved sentinel; never handed out by a document.
    pub const INVALID: NodeKey = NodeKey(0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    Element,
    Text,
    Comment,
    Fragment,
}

impl NodeType {
    /// Whether nodes of this type may hold children.
    pub fn allows_children(self) -> bool {
        matches!(
            self,
            NodeType::Document | NodeType::Element | NodeType::Fragment
        )
    }

    pub fn is_character_data(self) -> bool {
        matches!(self, NodeType::Text | NodeType::Comment)
    }
}

/// A boundary point: a container plus a child index (branch containers) or a
/// character index (character data containers).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub container: NodeKey,
    pub offset: usize,
}

impl Position {
    #[inline]
    pub const fn new(container: NodeKey, offset: usize) -> Self {
        Self { container, offset }
    }
}
