//! External geocoding and coordinate-to-timezone lookups.
//!
//! Both services sit behind narrow async ports so the geocoded grammar can
//! be tested against in-memory fakes. The HTTP implementations carry an
//! explicit client timeout; a timed-out or failed call is a remote error,
//! while an empty result ("no such place", "open ocean") rejects the input.

use async_trait::async_trait;
use chrono_tz::Tz;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Bounded wait for either lookup service.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_GEOCODE_ENDPOINT: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_TIMEZONE_ENDPOINT: &str = "https://timeapi.io/api/TimeZone/coordinate";

#[async_trait]
pub trait GeoLookupPort: Send + Sync {
    /// Resolve a place name to (latitude, longitude).
    async fn geocode(&self, place_name: &str) -> Result<(f64, f64)>;
}

#[async_trait]
pub trait TimezoneLookupPort: Send + Sync {
    /// Resolve coordinates to the IANA timezone containing them.
    async fn timezone_at(&self, lat: f64, lon: f64) -> Result<Tz>;
}

fn lookup_error(service: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::LookupTimeout(service.to_string())
    } else {
        Error::Lookup(format!("{}: {}", service, err))
    }
}

/// Geocoder backed by the Open-Meteo geocoding API.
pub struct OpenMeteoGeocoder {
    client: Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    results: Option<Vec<GeocodeHit>>,
}

#[derive(Deserialize)]
struct GeocodeHit {
    latitude: f64,
    longitude: f64,
}

impl OpenMeteoGeocoder {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(LOOKUP_TIMEOUT).build()?;
        Ok(Self { client, endpoint: endpoint.into() })
    }
}

#[async_trait]
impl GeoLookupPort for OpenMeteoGeocoder {
    async fn geocode(&self, place_name: &str) -> Result<(f64, f64)> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| Error::Lookup(format!("bad geocode endpoint: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("name", place_name)
            .append_pair("count", "1")
            .append_pair("format", "json");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| lookup_error("geocoder", e))?;

        if !response.status().is_success() {
            return Err(Error::Lookup(format!(
                "geocoder returned HTTP {}",
                response.status()
            )));
        }

        let body: GeocodeResponse =
            response.json().await.map_err(|e| lookup_error("geocoder", e))?;

        let hit = body
            .results
            .and_then(|mut hits| if hits.is_empty() { None } else { Some(hits.remove(0)) })
            .ok_or_else(|| Error::UnknownCity(place_name.to_string()))?;

        debug!("geocoder: '{}' -> ({}, {})", place_name, hit.latitude, hit.longitude);
        Ok((hit.latitude, hit.longitude))
    }
}

/// Coordinate-to-zone lookup backed by the timeapi.io coordinate endpoint.
pub struct TimeApiZoneLookup {
    client: Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct ZoneResponse {
    #[serde(rename = "timeZone")]
    time_zone: Option<String>,
}

impl TimeApiZoneLookup {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(LOOKUP_TIMEOUT).build()?;
        Ok(Self { client, endpoint: endpoint.into() })
    }
}

#[async_trait]
impl TimezoneLookupPort for TimeApiZoneLookup {
    async fn timezone_at(&self, lat: f64, lon: f64) -> Result<Tz> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| Error::Lookup(format!("bad timezone endpoint: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("latitude", &lat.to_string())
            .append_pair("longitude", &lon.to_string());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| lookup_error("timezone lookup", e))?;

        if !response.status().is_success() {
            return Err(Error::Lookup(format!(
                "timezone lookup returned HTTP {}",
                response.status()
            )));
        }

        let body: ZoneResponse =
            response.json().await.map_err(|e| lookup_error("timezone lookup", e))?;

        let name = body
            .time_zone
            .ok_or(Error::NoZoneAtCoordinates { lat, lon })?;

        name.parse::<Tz>().map_err(|_| Error::NoZoneAtCoordinates { lat, lon })
    }
}
