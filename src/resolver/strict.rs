//! The strict-token grammar.
//!
//! Input shape: `MM/DD HH:MMam/pm timezone event_name [color_id]`, e.g.
//! `03/17 12:00pm toronto time team sync 5`. The timezone is an alias from a
//! fixed table; two-token aliases ("toronto time") are checked before
//! single-token ones. Everything after the alias up to an optional trailing
//! color id is the title.

use async_trait::async_trait;
use chrono::{Datelike, Duration, Local};

use super::timezone::AliasTable;
use super::{assemble_event, dates, split_trailing_color, InputGrammar};
use crate::error::{Error, Result};
use crate::event::NormalizedEvent;

pub struct StrictGrammar {
    default_year: i32,
    duration: Duration,
}

impl StrictGrammar {
    pub fn new() -> Self {
        Self::with_reference_year(Local::now().year())
    }

    /// Fix the year used for `MM/DD` dates. Tests inject this so resolution
    /// is deterministic.
    pub fn with_reference_year(year: i32) -> Self {
        Self { default_year: year, duration: Duration::hours(1) }
    }

    pub fn duration_minutes(mut self, minutes: i64) -> Self {
        self.duration = Duration::minutes(minutes);
        self
    }
}

impl Default for StrictGrammar {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputGrammar for StrictGrammar {
    async fn resolve(&self, raw_text: &str) -> Result<NormalizedEvent> {
        let lowered = raw_text.to_lowercase();
        let parts: Vec<&str> = lowered.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(Error::TooFewTokens);
        }

        let date = dates::parse_strict_date(parts[0], self.default_year)?;
        let time = dates::parse_strict_time(parts[1])?;

        let aliases = AliasTable::zone_aliases();
        let two_token = format!("{} {}", parts[2], parts[3]);
        let (zone, title_start) = if let Some(tz) = aliases.lookup(&two_token) {
            (tz, 4)
        } else if let Some(tz) = aliases.lookup(parts[2]) {
            (tz, 3)
        } else {
            return Err(Error::UnknownTimezone {
                token: parts[2].to_string(),
                supported: aliases.supported(),
            });
        };

        let (title_tokens, color_id) = split_trailing_color(&parts[title_start..]);
        assemble_event(date, time, zone, &title_tokens.join(" "), color_id, self.duration)
    }
}
