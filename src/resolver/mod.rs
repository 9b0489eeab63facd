//! The temporal resolver: free-form text to a UTC event window.
//!
//! Three input grammars implement the same [`InputGrammar`] contract; the
//! active one is chosen from configuration. Whatever the grammar, the tail
//! end is identical: combine the parsed date and time into a naive local
//! timestamp, localize it in the resolved IANA zone (applying that zone's
//! DST rule for that calendar date), convert to UTC, and attach the window,
//! title and optional color.

pub mod dates;
pub mod flexible;
pub mod geocoded;
pub mod strict;
pub mod timezone;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::config::{Config, GrammarVariant};
use crate::error::{Error, Result};
use crate::event::{self, NormalizedEvent};
use crate::lookup::{OpenMeteoGeocoder, TimeApiZoneLookup};

pub use flexible::FlexibleGrammar;
pub use geocoded::GeocodedGrammar;
pub use strict::StrictGrammar;

/// One complete way of reading a raw line into a normalized event.
///
/// Resolution is all-or-nothing: on any error the input is rejected whole
/// and no partial event escapes.
#[async_trait]
pub trait InputGrammar: Send + Sync {
    async fn resolve(&self, raw_text: &str) -> Result<NormalizedEvent>;
}

/// Build the configured grammar.
pub fn create_grammar(config: &Config) -> Result<Box<dyn InputGrammar>> {
    let minutes = config.calendar.default_duration_minutes;
    Ok(match config.grammar.variant {
        GrammarVariant::Strict => Box::new(StrictGrammar::new().duration_minutes(minutes)),
        GrammarVariant::Flexible => Box::new(FlexibleGrammar::new().duration_minutes(minutes)),
        GrammarVariant::Geocoded => {
            let resolver = timezone::GeocodeResolver::new(
                OpenMeteoGeocoder::new(config.lookup.geocode_endpoint.as_str())?,
                TimeApiZoneLookup::new(config.lookup.timezone_endpoint.as_str())?,
            );
            Box::new(GeocodedGrammar::new(resolver).duration_minutes(minutes))
        }
    })
}

/// Shared tail of every grammar: localize, convert to UTC, validate title.
pub(crate) fn assemble_event(
    date: NaiveDate,
    time: NaiveTime,
    zone: Tz,
    title: &str,
    color_id: Option<String>,
    duration: Duration,
) -> Result<NormalizedEvent> {
    let summary = title.trim();
    if summary.is_empty() {
        return Err(Error::EmptyTitle);
    }

    let naive = date.and_time(time);
    // `single()` is None in the spring-forward gap; ambiguous fall-back
    // times also land here rather than silently picking an offset.
    let localized = zone.from_local_datetime(&naive).single().ok_or_else(|| {
        Error::UnrepresentableLocalTime(naive.to_string(), zone.name().to_string())
    })?;
    let start_utc = localized.with_timezone(&Utc);

    log::debug!("resolved '{}' to {} ({})", summary, start_utc, zone.name());

    Ok(NormalizedEvent {
        summary: summary.to_string(),
        start_utc,
        end_utc: start_utc + duration,
        color_id,
    })
}

/// Split an optional trailing color-id token off the title tokens.
pub(crate) fn split_trailing_color<'a>(tokens: &'a [&'a str]) -> (&'a [&'a str], Option<String>) {
    match tokens.split_last() {
        Some((last, rest)) if event::is_valid_color_id(last) => (rest, Some((*last).to_string())),
        _ => (tokens, None),
    }
}
