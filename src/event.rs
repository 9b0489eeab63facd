//! The shared event data model.
//!
//! A [`NormalizedEvent`] is the resolver's output and the reconciler's input:
//! by the time one exists, all timezone math is done and both instants are
//! UTC. A [`RemoteEvent`] is the slice of the provider's representation we
//! read back; it is never cached beyond a single call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Color identifiers accepted by the calendar provider.
pub const VALID_COLOR_IDS: [&str; 11] =
    ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11"];

/// A fully resolved event, ready to be written to the remote calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    /// Trimmed, non-empty title.
    pub summary: String,
    pub start_utc: DateTime<Utc>,
    /// Always strictly after `start_utc`.
    pub end_utc: DateTime<Utc>,
    /// One of [`VALID_COLOR_IDS`]; `None` means the provider default.
    pub color_id: Option<String>,
}

/// The subset of a remote calendar event this crate touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEvent {
    pub id: String,
    pub summary: String,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
}

pub fn is_valid_color_id(token: &str) -> bool {
    VALID_COLOR_IDS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_id_bounds() {
        assert!(is_valid_color_id("1"));
        assert!(is_valid_color_id("11"));
        assert!(!is_valid_color_id("0"));
        assert!(!is_valid_color_id("12"));
        assert!(!is_valid_color_id("01"));
        assert!(!is_valid_color_id("blue"));
    }
}
