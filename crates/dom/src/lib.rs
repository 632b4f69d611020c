//! # dom
//!
//! A small arena-backed content tree plus the native range families a host
//! platform can expose over it:
//! - [`BoundaryRange`]: standard boundary-point ranges (container + offset)
//! - [`TextRange`]: legacy ranges addressing the body as a character stream
//! - [`ItemRange`]: legacy control ranges holding selected elements
//!
//! [`NativeRange`] is the closed union of the three; callers dispatch on
//! [`RangeKind`] instead of probing for capabilities.
//!
//! Node keys stay valid for the lifetime of the [`Document`]; detached
//! nodes can be re-inserted.

mod document;
mod error;
mod item_range;
mod native;
mod range;
mod serialize;
mod text;
mod text_range;
mod types;

pub use document::{Ancestors, Document};
pub use error::{DomError, RangeError};
pub use item_range::ItemRange;
pub use native::{How, NativeRange, RangeApi, RangeKind};
pub use range::BoundaryRange;
pub use text::{byte_offset, char_len, char_slice};
pub use text_range::TextRange;
pub use types::{NodeKey, NodeType, Position};
