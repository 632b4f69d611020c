use crate::error::SelectionError;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Tuning for [`SelectionManager`](crate::SelectionManager).
///
/// ```toml
/// event_throttle_ms = 250
/// notify_deselection = false
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Minimum spacing between two processed selection checks. Signals that
    /// arrive sooner are coalesced into one trailing check.
    #[serde(rename = "event_throttle_ms", deserialize_with = "millis")]
    pub event_throttle: Duration,
    /// Before announcing a new selection, notify the previously selected
    /// node with an empty (collapsed) selection.
    pub notify_deselection: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            event_throttle: Duration::from_millis(250),
            notify_deselection: false,
        }
    }
}

impl SelectionConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, SelectionError> {
        Ok(toml::from_str(input)?)
    }
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}
