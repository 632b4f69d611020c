//! Selection spans and selection change notifications.
//!
//! A [`Span`] wraps one native range of whichever family the host exposes
//! and answers the same questions for all of them: what text or markup it
//! covers, where it sits, and whether it is "really" a single element
//! ([`Span::is_element`]). A [`SelectionManager`] reads and installs the
//! host selection and tells listeners when the user changes it.

mod config;
mod equivalence;
mod error;
mod events;
mod global;
mod listeners;
mod manager;
mod span;

pub use config::SelectionConfig;
pub use dom::{How, RangeApi, RangeKind};
pub use error::SelectionError;
pub use events::{DirectEvents, EventsProvider, InputHandler, MissingEvents};
pub use global::with_default;
pub use listeners::{Listener, SelectionEvent};
pub use manager::{SelectTarget, SelectionManager};
pub use span::{Content, PLACEHOLDER_ID, Span, Wrapper};
