//! Error types for slated.
//!
//! Errors fall into two families. Parse errors reject a single input line
//! with a reason the user can act on; they never abort the session. Remote
//! errors cover the calendar service and the lookup services; they fail the
//! one requested action and nothing else.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // --- parse errors ---
    #[error("invalid input format, expected: MM/DD HH:MMam/pm timezone event_name [color_id]")]
    TooFewTokens,

    #[error("could not parse '{0}' as a date")]
    InvalidDate(String),

    #[error("could not parse '{0}' as a time of day")]
    InvalidTime(String),

    #[error("unknown timezone '{token}', supported: {supported}")]
    UnknownTimezone { token: String, supported: String },

    #[error("could not find a place named '{0}'")]
    UnknownCity(String),

    #[error("no timezone found at coordinates ({lat}, {lon})")]
    NoZoneAtCoordinates { lat: f64, lon: f64 },

    #[error("expected 'date, time city, title' (three comma-separated parts), got {0}")]
    BadSegmentCount(usize),

    #[error("missing {0} in input")]
    Missing(&'static str),

    #[error("event name cannot be empty")]
    EmptyTitle,

    #[error("{0} is not a unique local time in {1} (daylight saving change)")]
    UnrepresentableLocalTime(String, String),

    // --- remote errors ---
    #[error("calendar request failed: HTTP {status} - {body}")]
    CalendarHttp { status: u16, body: String },

    #[error("calendar returned a malformed response: {0}")]
    MalformedResponse(String),

    #[error("lookup request failed: {0}")]
    Lookup(String),

    #[error("lookup timed out: {0}")]
    LookupTimeout(String),

    #[error("token refresh failed: {0}")]
    TokenRefresh(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// True for errors that reject the input line itself, as opposed to
    /// failures of a remote collaborator.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            Error::TooFewTokens
                | Error::InvalidDate(_)
                | Error::InvalidTime(_)
                | Error::UnknownTimezone { .. }
                | Error::UnknownCity(_)
                | Error::NoZoneAtCoordinates { .. }
                | Error::BadSegmentCount(_)
                | Error::Missing(_)
                | Error::EmptyTitle
                | Error::UnrepresentableLocalTime(_, _)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_are_recoverable() {
        assert!(Error::EmptyTitle.is_parse());
        assert!(Error::TooFewTokens.is_parse());
        assert!(Error::UnknownCity("atlantis".to_string()).is_parse());
        assert!(!Error::LookupTimeout("geocoder".to_string()).is_parse());
        assert!(
            !Error::CalendarHttp { status: 503, body: "unavailable".to_string() }.is_parse()
        );
    }

    #[test]
    fn test_messages_are_human_readable() {
        let err = Error::UnknownTimezone {
            token: "mars time".to_string(),
            supported: "toronto time, london time".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown timezone 'mars time', supported: toronto time, london time"
        );
    }
}
