//! The flexible-date grammar.
//!
//! Input shape: `<date> <time> <city> <title> [color_id]`, where the date is
//! free-form and may span one to three tokens ("3/17", "march 17",
//! "20th march 2025"), the time is free-form ("9am", "15:00"), and the city
//! comes from a fixed alias table with two-word names ("new york") checked
//! before one-word names.

use async_trait::async_trait;
use chrono::{Datelike, Duration, Local};

use super::timezone::AliasTable;
use super::{assemble_event, dates, split_trailing_color, InputGrammar};
use crate::error::{Error, Result};
use crate::event::NormalizedEvent;

pub struct FlexibleGrammar {
    default_year: i32,
    duration: Duration,
}

impl FlexibleGrammar {
    pub fn new() -> Self {
        Self::with_reference_year(Local::now().year())
    }

    /// Fix the year used when the date omits one. Tests inject this so
    /// resolution is deterministic.
    pub fn with_reference_year(year: i32) -> Self {
        Self { default_year: year, duration: Duration::hours(1) }
    }

    pub fn duration_minutes(mut self, minutes: i64) -> Self {
        self.duration = Duration::minutes(minutes);
        self
    }
}

impl Default for FlexibleGrammar {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputGrammar for FlexibleGrammar {
    async fn resolve(&self, raw_text: &str) -> Result<NormalizedEvent> {
        let lowered = raw_text.to_lowercase();
        let parts: Vec<&str> = lowered.split_whitespace().collect();

        // Try the first one, two, then three tokens as a date; the shortest
        // successful span wins.
        let mut parsed = None;
        for span in 1..=parts.len().min(3) {
            let candidate = parts[..span].join(" ");
            if let Some(date) = dates::parse_flexible_date(&candidate, self.default_year) {
                parsed = Some((date, span));
                break;
            }
        }
        let (date, mut consumed) = parsed.ok_or_else(|| {
            Error::InvalidDate(parts.first().copied().unwrap_or_default().to_string())
        })?;

        let time_token = *parts.get(consumed).ok_or(Error::Missing("time"))?;
        let time = dates::parse_flexible_time(time_token)
            .ok_or_else(|| Error::InvalidTime(time_token.to_string()))?;
        consumed += 1;

        // City: two-token names checked first.
        let cities = AliasTable::city_aliases();
        let first = *parts.get(consumed).ok_or(Error::Missing("city"))?;
        let two_token = parts
            .get(consumed + 1)
            .and_then(|second| cities.lookup(&format!("{} {}", first, second)));
        let (zone, title_start) = if let Some(tz) = two_token {
            (tz, consumed + 2)
        } else if let Some(tz) = cities.lookup(first) {
            (tz, consumed + 1)
        } else {
            return Err(Error::UnknownTimezone {
                token: first.to_string(),
                supported: cities.supported(),
            });
        };

        let (title_tokens, color_id) = split_trailing_color(&parts[title_start..]);
        assemble_event(date, time, zone, &title_tokens.join(" "), color_id, self.duration)
    }
}
