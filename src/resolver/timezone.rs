//! Location-token to IANA timezone resolution.
//!
//! Every grammar funnels its location token through one
//! [`TimezoneResolver`]. The strict and flexible grammars use fixed alias
//! tables; the geocoded grammar composes the two lookup ports. Swapping the
//! strategy never touches the UTC-conversion code downstream.

use async_trait::async_trait;
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::lookup::{GeoLookupPort, TimezoneLookupPort};

#[async_trait]
pub trait TimezoneResolver: Send + Sync {
    /// Map a location token (alias, city name, ...) to an IANA timezone.
    async fn resolve_timezone(&self, location_token: &str) -> Result<Tz>;
}

// "<city> time" aliases, as the strict grammar expects them.
static ZONE_ALIASES: Lazy<BTreeMap<&'static str, Tz>> = Lazy::new(|| {
    BTreeMap::from([
        ("toronto time", Tz::America__Toronto),
        ("new york time", Tz::America__New_York),
        ("london time", Tz::Europe__London),
        ("tokyo time", Tz::Asia__Tokyo),
    ])
});

// Bare city names, as the flexible grammar expects them.
static CITY_ALIASES: Lazy<BTreeMap<&'static str, Tz>> = Lazy::new(|| {
    BTreeMap::from([
        ("toronto", Tz::America__Toronto),
        ("new york", Tz::America__New_York),
        ("london", Tz::Europe__London),
        ("tokyo", Tz::Asia__Tokyo),
        ("jakarta", Tz::Asia__Jakarta),
        ("los angeles", Tz::America__Los_Angeles),
        ("chicago", Tz::America__Chicago),
        ("berlin", Tz::Europe__Berlin),
        ("sydney", Tz::Australia__Sydney),
        ("singapore", Tz::Asia__Singapore),
    ])
});

/// A fixed alias table. Lookups are case-insensitive.
pub struct AliasTable {
    entries: &'static BTreeMap<&'static str, Tz>,
}

impl AliasTable {
    /// The strict grammar's table of `"<city> time"` aliases.
    pub fn zone_aliases() -> Self {
        Self { entries: &ZONE_ALIASES }
    }

    /// The flexible grammar's table of bare city names.
    pub fn city_aliases() -> Self {
        Self { entries: &CITY_ALIASES }
    }

    /// Probe a token window without committing to an error.
    pub fn lookup(&self, token: &str) -> Option<Tz> {
        self.entries.get(token.to_lowercase().as_str()).copied()
    }

    /// Comma-joined alias list for error messages.
    pub fn supported(&self) -> String {
        self.entries.keys().copied().collect::<Vec<_>>().join(", ")
    }
}

#[async_trait]
impl TimezoneResolver for AliasTable {
    async fn resolve_timezone(&self, location_token: &str) -> Result<Tz> {
        self.lookup(location_token).ok_or_else(|| Error::UnknownTimezone {
            token: location_token.to_string(),
            supported: self.supported(),
        })
    }
}

/// Resolves a city name via geocoding plus a coordinate-to-zone lookup.
pub struct GeocodeResolver<G, T> {
    geo: G,
    zones: T,
}

impl<G, T> GeocodeResolver<G, T> {
    pub fn new(geo: G, zones: T) -> Self {
        Self { geo, zones }
    }
}

#[async_trait]
impl<G, T> TimezoneResolver for GeocodeResolver<G, T>
where
    G: GeoLookupPort,
    T: TimezoneLookupPort,
{
    async fn resolve_timezone(&self, location_token: &str) -> Result<Tz> {
        let (lat, lon) = self.geo.geocode(location_token).await?;
        log::debug!("geocoded '{}' to ({}, {})", location_token, lat, lon);
        self.zones.timezone_at(lat, lon).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_alias_lookup() {
        let table = AliasTable::zone_aliases();
        assert_eq!(table.lookup("toronto time"), Some(Tz::America__Toronto));
        assert_eq!(table.lookup("Toronto Time"), Some(Tz::America__Toronto));
        assert_eq!(table.lookup("toronto"), None);
        assert_eq!(table.lookup("mars time"), None);
    }

    #[test]
    fn test_city_alias_lookup() {
        let table = AliasTable::city_aliases();
        assert_eq!(table.lookup("new york"), Some(Tz::America__New_York));
        assert_eq!(table.lookup("jakarta"), Some(Tz::Asia__Jakarta));
        assert_eq!(table.lookup("new york time"), None);
    }

    #[tokio::test]
    async fn test_unknown_alias_is_a_parse_error() {
        let err = AliasTable::zone_aliases().resolve_timezone("mars time").await.unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("toronto time"));
    }
}
