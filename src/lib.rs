//! Selection spans over a content tree, independent of which native range
//! family the host exposes.
//!
//! ```
//! use rangekit::{RangeApi, SelectionManager, Window};
//!
//! let mut window = Window::new(RangeApi::Standard);
//! let body = window.document().body();
//! let p = window.document_mut().create_element("p");
//! let text = window.document_mut().create_text("hello");
//! window.document_mut().append_child(p, text).unwrap();
//! window.document_mut().append_child(body, p).unwrap();
//!
//! let mut manager = SelectionManager::new();
//! manager.select_inside(&mut window, p).unwrap();
//! assert_eq!(manager.get_text(&window).unwrap(), "hello");
//! assert_eq!(manager.is_element(&mut window, true, None), Some(p));
//! ```

pub use dom;
pub use platform;
pub use selection;

pub use dom::{Document, NativeRange, NodeKey, Position, RangeApi};
pub use platform::{InputEvent, InputKind, Window};
pub use selection::{SelectionConfig, SelectionError, SelectionManager, Span, with_default};
