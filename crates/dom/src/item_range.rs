use crate::types::NodeKey;

/// A legacy control range: an ordered set of selected elements (images,
/// form controls) rather than a span of text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemRange {
    items: Vec<NodeKey>,
}

impl ItemRange {
    pub fn new(items: Vec<NodeKey>) -> Self {
        Self { items }
    }

    pub fn item(&self, index: usize) -> Option<NodeKey> {
        self.items.get(index).copied()
    }

    pub fn items(&self) -> &[NodeKey] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
