use crate::NodeKey;
use crate::native::RangeKind;

/// Structural failures reported by [`Document`](crate::Document) mutations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeKey),
    #[error("node {0:?} cannot have children")]
    NotABranch(NodeKey),
    #[error("node {0:?} cannot be inserted into a tree")]
    InvalidChild(NodeKey),
    #[error("inserting {child:?} into {parent:?} would create a cycle")]
    Cycle { parent: NodeKey, child: NodeKey },
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeKey, child: NodeKey },
    #[error("node {0:?} has no parent")]
    NoParent(NodeKey),
    #[error("node {0:?} is not character data")]
    NotCharacterData(NodeKey),
    #[error("offset {offset} is out of bounds for {node:?} (length {length})")]
    OffsetOutOfBounds {
        node: NodeKey,
        offset: usize,
        length: usize,
    },
    #[error("node {0:?} is not inside the document body")]
    NotInBody(NodeKey),
}

/// Failures of a native range operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// The range family has no such operation (e.g. text of a control range).
    #[error("`{op}` is not supported by {kind} ranges")]
    Unsupported { kind: RangeKind, op: &'static str },
    #[error(transparent)]
    Dom(#[from] DomError),
}
