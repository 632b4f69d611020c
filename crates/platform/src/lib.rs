//! Host side of the selection library.
//!
//! The library never owns the document or the platform selection; it reads
//! and writes them through a [`Window`]. Input events reach it through
//! whatever dispatch substrate the host uses, and time through a [`Clock`].

mod clock;
mod input;
mod window;

pub use clock::{Clock, ManualClock, SystemClock};
pub use input::{InputEvent, InputKind};
pub use window::Window;
