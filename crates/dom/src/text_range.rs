//! Legacy text ranges.
//!
//! A text range addresses the body as one stream of characters: every text
//! node under `<body>` in tree order, concatenated. Element boundaries have
//! no position of their own in that stream, so a range that covers all of
//! an element's text is indistinguishable from one sitting exactly on the
//! element. That is why these ranges are always "normalized".

use crate::document::Document;
use crate::error::DomError;
use crate::native::How;
use crate::range::BoundaryRange;
use crate::text::char_slice;
use crate::types::{NodeKey, Position};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextRange {
    start: usize,
    end: usize,
}

impl TextRange {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn collapsed_at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Covers the text of `node`. Text nodes and elements are both located
    /// by where their characters sit in the body stream.
    pub fn for_node(doc: &Document, node: NodeKey) -> Result<Self, DomError> {
        let body = doc.body();
        if !doc.contains(body, node) {
            return Err(DomError::NotInBody(node));
        }
        let start = stream_offset(doc, body, node);
        let len: usize = doc
            .text_nodes(node)
            .into_iter()
            .map(|t| doc.text_len(t))
            .sum();
        Ok(Self::new(start, start + len))
    }

    pub fn duplicate(&self) -> Self {
        *self
    }

    pub fn collapse(&mut self, to_start: bool) {
        if to_start {
            self.end = self.start;
        } else {
            self.start = self.end;
        }
    }

    pub fn compare_end_points(&self, how: How, other: &TextRange) -> Ordering {
        let (ours, theirs) = match how {
            How::StartToStart => (self.start, other.start),
            How::StartToEnd => (self.start, other.end),
            How::EndToStart => (self.end, other.start),
            How::EndToEnd => (self.end, other.end),
        };
        ours.cmp(&theirs)
    }

    /// Moves one of our endpoints onto one of `other`'s. Crossing the
    /// opposite endpoint collapses the range at the new point.
    pub fn set_end_point(&mut self, how: How, other: &TextRange) {
        let value = match how {
            How::StartToStart | How::EndToStart => other.start,
            How::StartToEnd | How::EndToEnd => other.end,
        };
        match how {
            How::StartToStart | How::StartToEnd => {
                self.start = value;
                self.end = self.end.max(value);
            }
            How::EndToStart | How::EndToEnd => {
                self.end = value;
                self.start = self.start.min(value);
            }
        }
    }

    pub fn move_start(&mut self, doc: &Document, chars: isize) {
        self.start = shift(self.start, chars, stream_len(doc));
        self.end = self.end.max(self.start);
    }

    pub fn move_end(&mut self, doc: &Document, chars: isize) {
        self.end = shift(self.end, chars, stream_len(doc));
        self.start = self.start.min(self.end);
    }

    pub fn text(&self, doc: &Document) -> String {
        let stream = doc.text_content(doc.body());
        char_slice(&stream, self.start, self.end).to_string()
    }

    pub fn html_text(&self, doc: &Document) -> String {
        self.to_boundaries(doc).markup(doc)
    }

    /// Deepest element whose text covers the whole range.
    pub fn parent_element(&self, doc: &Document) -> NodeKey {
        let mut current = doc.body();
        'descend: loop {
            for &child in doc.children(current) {
                if !doc.is_element(child) {
                    continue;
                }
                let Ok(span) = Self::for_node(doc, child) else {
                    continue;
                };
                if span.start <= self.start && self.end <= span.end {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// Maps the stream offsets back onto text node positions. On a seam
    /// between two text nodes the start lands in the later node and the end
    /// in the earlier one, so the boundaries stay inside the covered text. A
    /// collapsed range maps both points into the earlier node.
    pub fn to_boundaries(&self, doc: &Document) -> BoundaryRange {
        if self.start == self.end {
            let at = locate(doc, self.start, Seam::Before);
            return BoundaryRange::collapsed_at(at);
        }
        BoundaryRange::new(
            locate(doc, self.start, Seam::After),
            locate(doc, self.end, Seam::Before),
        )
    }

    /// Replaces the covered text with an empty `<span id=...>` and
    /// collapses onto it. Returns the marker element.
    pub fn paste_marker(&mut self, doc: &mut Document, id: &str) -> Result<NodeKey, DomError> {
        let mut range = self.to_boundaries(doc);
        range.delete_contents(doc)?;
        let marker = doc.create_element("span");
        doc.set_attribute(marker, "id", id)?;
        range.insert_node(doc, marker)?;
        *self = Self::collapsed_at(Self::for_node(doc, marker)?.start);
        Ok(marker)
    }
}

fn stream_len(doc: &Document) -> usize {
    doc.text_nodes(doc.body())
        .into_iter()
        .map(|t| doc.text_len(t))
        .sum()
}

fn shift(offset: usize, chars: isize, max: usize) -> usize {
    offset.saturating_add_signed(chars).min(max)
}

// Characters that precede `node` in the stream rooted at `root`.
fn stream_offset(doc: &Document, root: NodeKey, node: NodeKey) -> usize {
    if node == root {
        return 0;
    }
    let mut offset = 0;
    for current in doc.descendants(root) {
        if current == node {
            break;
        }
        if doc.is_text(current) {
            offset += doc.text_len(current);
        }
    }
    offset
}

// Which side of a seam between two text nodes an offset resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Seam {
    /// End of the earlier node.
    Before,
    /// Start of the later node.
    After,
}

// The text position at `offset`. Past the end of the stream this is the end
// of the last text node.
fn locate(doc: &Document, offset: usize, seam: Seam) -> Position {
    let body = doc.body();
    let mut seen = 0;
    let mut last = None;
    for text in doc.text_nodes(body) {
        let len = doc.text_len(text);
        let reached = match seam {
            Seam::Before => seen + len >= offset,
            Seam::After => seen + len > offset,
        };
        if reached {
            return Position::new(text, offset - seen);
        }
        seen += len;
        last = Some(Position::new(text, len));
    }
    last.unwrap_or(Position::new(body, 0))
}
