//! The closed set of native range families a host can hand out.

use crate::document::Document;
use crate::error::{DomError, RangeError};
use crate::item_range::ItemRange;
use crate::range::BoundaryRange;
use crate::text_range::TextRange;
use crate::types::NodeKey;
use std::fmt;

/// Which family a native range belongs to, fixed when it is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RangeKind {
    /// Boundary-point ranges (container + offset).
    Standard,
    /// Legacy character-offset text ranges.
    LegacyText,
    /// Legacy control ranges holding selected elements.
    LegacyItem,
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RangeKind::Standard => "standard",
            RangeKind::LegacyText => "legacy text",
            RangeKind::LegacyItem => "legacy item",
        })
    }
}

/// The selection API family a host exposes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RangeApi {
    #[default]
    Standard,
    Legacy,
}

/// Endpoint pairing for comparisons and endpoint moves. The first half
/// names the endpoint of the range the method is called on, the second
/// half the endpoint of the argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum How {
    StartToStart,
    StartToEnd,
    EndToStart,
    EndToEnd,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NativeRange {
    Standard(BoundaryRange),
    LegacyText(TextRange),
    LegacyItem(ItemRange),
}

impl NativeRange {
    pub fn kind(&self) -> RangeKind {
        match self {
            NativeRange::Standard(_) => RangeKind::Standard,
            NativeRange::LegacyText(_) => RangeKind::LegacyText,
            NativeRange::LegacyItem(_) => RangeKind::LegacyItem,
        }
    }

    /// Builds a range over `node` in the host's family. Legacy text ranges
    /// always cover the node's text, so `contents_only` does not apply.
    pub fn for_node(
        doc: &Document,
        api: RangeApi,
        node: NodeKey,
        contents_only: bool,
    ) -> Result<Self, DomError> {
        match api {
            RangeApi::Standard if contents_only => Ok(NativeRange::Standard(
                BoundaryRange::select_node_contents(doc, node)?,
            )),
            RangeApi::Standard => Ok(NativeRange::Standard(BoundaryRange::select_node(
                doc, node,
            )?)),
            RangeApi::Legacy => Ok(NativeRange::LegacyText(TextRange::for_node(doc, node)?)),
        }
    }

    pub fn unsupported(&self, op: &'static str) -> RangeError {
        RangeError::Unsupported {
            kind: self.kind(),
            op,
        }
    }

    /// Same family and both boundary pairs coincide. Ranges of different
    /// families never compare equal.
    pub fn native_equals(&self, other: &NativeRange) -> bool {
        match (self, other) {
            (NativeRange::Standard(a), NativeRange::Standard(b)) => {
                a.start() == b.start() && a.end() == b.end()
            }
            (NativeRange::LegacyText(a), NativeRange::LegacyText(b)) => {
                a.start() == b.start() && a.end() == b.end()
            }
            (NativeRange::LegacyItem(a), NativeRange::LegacyItem(b)) => a == b,
            _ => false,
        }
    }

    /// Deepest node holding the whole range. Control ranges have no such
    /// query.
    pub fn common_ancestor(&self, doc: &Document) -> Result<Option<NodeKey>, RangeError> {
        match self {
            NativeRange::Standard(range) => Ok(range.common_ancestor(doc)),
            NativeRange::LegacyText(range) => Ok(Some(range.parent_element(doc))),
            NativeRange::LegacyItem(_) => Err(self.unsupported("common_ancestor")),
        }
    }
}

impl AsRef<NativeRange> for NativeRange {
    fn as_ref(&self) -> &NativeRange {
        self
    }
}

impl From<BoundaryRange> for NativeRange {
    fn from(range: BoundaryRange) -> Self {
        NativeRange::Standard(range)
    }
}

impl From<TextRange> for NativeRange {
    fn from(range: TextRange) -> Self {
        NativeRange::LegacyText(range)
    }
}

impl From<ItemRange> for NativeRange {
    fn from(range: ItemRange) -> Self {
        NativeRange::LegacyItem(range)
    }
}
