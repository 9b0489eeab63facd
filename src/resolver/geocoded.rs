//! The geocoded grammar.
//!
//! Input shape: three comma-delimited segments, `date, time city, title`,
//! e.g. `20th march 2025, 11am jakarta, meeting with steve`. The city is
//! anything after the time token and may be any place the geocoder knows;
//! its coordinates are resolved to an IANA zone by the timezone lookup.

use async_trait::async_trait;
use chrono::{Datelike, Duration, Local};

use super::timezone::TimezoneResolver;
use super::{assemble_event, dates, split_trailing_color, InputGrammar};
use crate::error::{Error, Result};
use crate::event::NormalizedEvent;

pub struct GeocodedGrammar<R> {
    resolver: R,
    default_year: i32,
    duration: Duration,
}

impl<R: TimezoneResolver> GeocodedGrammar<R> {
    pub fn new(resolver: R) -> Self {
        Self::with_reference_year(resolver, Local::now().year())
    }

    /// Fix the year used when the date segment has no 4-digit year. Tests
    /// inject this so resolution is deterministic.
    pub fn with_reference_year(resolver: R, year: i32) -> Self {
        Self { resolver, default_year: year, duration: Duration::hours(1) }
    }

    pub fn duration_minutes(mut self, minutes: i64) -> Self {
        self.duration = Duration::minutes(minutes);
        self
    }
}

#[async_trait]
impl<R: TimezoneResolver> InputGrammar for GeocodedGrammar<R> {
    async fn resolve(&self, raw_text: &str) -> Result<NormalizedEvent> {
        let lowered = raw_text.to_lowercase();
        let segments: Vec<&str> = lowered.split(',').map(str::trim).collect();
        if segments.len() != 3 {
            return Err(Error::BadSegmentCount(segments.len()));
        }

        let date = dates::parse_flexible_date(segments[0], self.default_year)
            .ok_or_else(|| Error::InvalidDate(segments[0].to_string()))?;

        // Second segment: first token is the time, the rest names the city.
        let mut words = segments[1].split_whitespace();
        let time_token = words.next().ok_or(Error::Missing("time"))?;
        let time = dates::parse_flexible_time(time_token)
            .ok_or_else(|| Error::InvalidTime(time_token.to_string()))?;
        let city = words.collect::<Vec<_>>().join(" ");
        if city.is_empty() {
            return Err(Error::Missing("city"));
        }

        let zone = self.resolver.resolve_timezone(&city).await?;

        let title_tokens: Vec<&str> = segments[2].split_whitespace().collect();
        let (title_tokens, color_id) = split_trailing_color(&title_tokens);
        assemble_event(date, time, zone, &title_tokens.join(" "), color_id, self.duration)
    }
}
