use dom::{DomError, RangeError};

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Dom(#[from] DomError),
    /// The manager was built with [`MissingEvents`](crate::MissingEvents)
    /// and something tried to register or route input through it.
    #[error("no events provider installed: `{op}` was called on MissingEvents")]
    MissingEventsProvider { op: &'static str },
    #[error("invalid selection config: {0}")]
    Config(#[from] toml::de::Error),
}
