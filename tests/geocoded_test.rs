//! Geocoded grammar tests against in-memory lookup fakes.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use pretty_assertions::assert_eq;
use std::collections::HashMap;

use slated::error::{Error, Result};
use slated::lookup::{GeoLookupPort, TimezoneLookupPort};
use slated::resolver::timezone::GeocodeResolver;
use slated::resolver::{GeocodedGrammar, InputGrammar};

/// Fake geocoder with a fixed gazetteer.
struct FakeGeocoder {
    places: HashMap<&'static str, (f64, f64)>,
}

impl FakeGeocoder {
    fn new() -> Self {
        let places = HashMap::from([
            ("jakarta", (-6.2088, 106.8456)),
            ("toronto", (43.6532, -79.3832)),
            ("point nemo", (-48.8767, -123.3933)),
        ]);
        Self { places }
    }
}

#[async_trait]
impl GeoLookupPort for FakeGeocoder {
    async fn geocode(&self, place_name: &str) -> Result<(f64, f64)> {
        self.places
            .get(place_name)
            .copied()
            .ok_or_else(|| Error::UnknownCity(place_name.to_string()))
    }
}

/// Fake coordinate-to-zone lookup: east of Greenwich is Jakarta, west is
/// Toronto, and the open ocean has no zone at all.
struct FakeZoneLookup;

#[async_trait]
impl TimezoneLookupPort for FakeZoneLookup {
    async fn timezone_at(&self, lat: f64, lon: f64) -> Result<Tz> {
        if lat < -45.0 {
            return Err(Error::NoZoneAtCoordinates { lat, lon });
        }
        Ok(if lon > 0.0 { Tz::Asia__Jakarta } else { Tz::America__Toronto })
    }
}

fn grammar() -> GeocodedGrammar<GeocodeResolver<FakeGeocoder, FakeZoneLookup>> {
    let resolver = GeocodeResolver::new(FakeGeocoder::new(), FakeZoneLookup);
    GeocodedGrammar::with_reference_year(resolver, 2025)
}

#[tokio::test]
async fn test_geocoded_jakarta_meeting() {
    let event = grammar()
        .resolve("20th march 2025, 11am jakarta, meeting with steve")
        .await
        .unwrap();
    // 11:00 in Asia/Jakarta (UTC+7) is 04:00 UTC.
    assert_eq!(event.start_utc, Utc.with_ymd_and_hms(2025, 3, 20, 4, 0, 0).unwrap());
    assert_eq!(event.end_utc, Utc.with_ymd_and_hms(2025, 3, 20, 5, 0, 0).unwrap());
    assert_eq!(event.summary, "meeting with steve");
    assert_eq!(event.color_id, None);
}

#[tokio::test]
async fn test_geocoded_explicit_year_beats_reference_year() {
    let resolver = GeocodeResolver::new(FakeGeocoder::new(), FakeZoneLookup);
    let grammar = GeocodedGrammar::with_reference_year(resolver, 2020);
    let event = grammar
        .resolve("20th march 2025, 11am jakarta, meeting with steve")
        .await
        .unwrap();
    assert_eq!(event.start_utc, Utc.with_ymd_and_hms(2025, 3, 20, 4, 0, 0).unwrap());
}

#[tokio::test]
async fn test_geocoded_defaults_to_reference_year() {
    let event = grammar().resolve("20th march, 11am jakarta, sync").await.unwrap();
    assert_eq!(event.start_utc, Utc.with_ymd_and_hms(2025, 3, 20, 4, 0, 0).unwrap());
}

#[tokio::test]
async fn test_geocoded_multi_word_city() {
    // Everything after the time token names the city.
    let err = grammar().resolve("3/17, 9am point nemo, bottle toss").await.unwrap_err();
    assert!(matches!(err, Error::NoZoneAtCoordinates { .. }));
    assert!(err.is_parse());
}

#[tokio::test]
async fn test_geocoded_trailing_color_id() {
    let event = grammar().resolve("3/17, 9am toronto, team sync 5").await.unwrap();
    assert_eq!(event.summary, "team sync");
    assert_eq!(event.color_id, Some("5".to_string()));
    assert_eq!(event.start_utc, Utc.with_ymd_and_hms(2025, 3, 17, 13, 0, 0).unwrap());
}

#[tokio::test]
async fn test_geocoded_rejects_wrong_segment_count() {
    let err = grammar().resolve("3/17 9am toronto team sync").await.unwrap_err();
    assert!(matches!(err, Error::BadSegmentCount(1)));

    let err = grammar().resolve("3/17, 9am, toronto, team sync").await.unwrap_err();
    assert!(matches!(err, Error::BadSegmentCount(4)));
}

#[tokio::test]
async fn test_geocoded_rejects_unknown_city() {
    let err = grammar().resolve("3/17, 9am gotham, team sync").await.unwrap_err();
    assert!(matches!(err, Error::UnknownCity(_)));
    assert!(err.is_parse());
}

#[tokio::test]
async fn test_geocoded_rejects_missing_city() {
    let err = grammar().resolve("3/17, 9am, team sync").await.unwrap_err();
    assert!(matches!(err, Error::Missing("city")));
}

#[tokio::test]
async fn test_geocoded_rejects_empty_title() {
    let err = grammar().resolve("3/17, 9am toronto, ").await.unwrap_err();
    assert!(matches!(err, Error::EmptyTitle));
}
