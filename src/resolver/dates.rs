//! Date and time token parsing.
//!
//! Two levels of strictness live here. The strict parsers accept exactly the
//! `MM/DD` and `HH:MMam/pm` shapes of the strict-token grammar. The flexible
//! parsers accept the free-form shapes the other grammars allow: numeric
//! dates with or without a year, month names with ordinal day suffixes
//! ("20th march 2025"), ISO dates, and 12- or 24-hour clock times.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

struct DatePatterns {
    // 2025-03-17
    iso: Regex,
    // 3/17, 03/17, 3/17/2025
    numeric: Regex,
    // 17 march, 20th march 2025
    day_month: Regex,
    // march 17, march 17th 2025, march 17, 2025
    month_day: Regex,
    // 9am, 12:30pm
    time_12h: Regex,
    // 15:00
    time_24h: Regex,
    // 12:00pm exactly (strict grammar)
    time_strict: Regex,
}

static PATTERNS: Lazy<DatePatterns> = Lazy::new(|| {
    const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";
    DatePatterns {
        iso: Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap(),
        numeric: Regex::new(r"^(\d{1,2})/(\d{1,2})(?:/(\d{2}|\d{4}))?$").unwrap(),
        day_month: Regex::new(&format!(
            r"^(\d{{1,2}})(?:st|nd|rd|th)?\s+({MONTHS})(?:\s+(\d{{4}}))?$"
        ))
        .unwrap(),
        month_day: Regex::new(&format!(
            r"^({MONTHS})\s+(\d{{1,2}})(?:st|nd|rd|th)?(?:,?\s+(\d{{4}}))?$"
        ))
        .unwrap(),
        time_12h: Regex::new(r"^(\d{1,2})(?::(\d{2}))?\s*([ap])\.?m\.?$").unwrap(),
        time_24h: Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap(),
        time_strict: Regex::new(r"^(\d{1,2}):(\d{2})(am|pm)$").unwrap(),
    }
});

fn month_name_to_number(name: &str) -> Option<u32> {
    match name {
        s if s.starts_with("jan") => Some(1),
        s if s.starts_with("feb") => Some(2),
        s if s.starts_with("mar") => Some(3),
        s if s.starts_with("apr") => Some(4),
        "may" => Some(5),
        s if s.starts_with("jun") => Some(6),
        s if s.starts_with("jul") => Some(7),
        s if s.starts_with("aug") => Some(8),
        s if s.starts_with("sep") => Some(9),
        s if s.starts_with("oct") => Some(10),
        s if s.starts_with("nov") => Some(11),
        s if s.starts_with("dec") => Some(12),
        _ => None,
    }
}

fn to_24_hour(hour: u32, meridiem: &str) -> Option<u32> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    Some(match (hour, meridiem) {
        (12, "a") => 0,
        (h, "a") => h,
        (12, "p") => 12,
        (h, "p") => h + 12,
        _ => return None,
    })
}

fn expand_year(captured: &str) -> i32 {
    // Two-digit years land in the 2000s.
    let y: i32 = captured.parse().unwrap_or(0);
    if captured.len() == 2 { 2000 + y } else { y }
}

/// Parse a free-form date expression, already lowercased and trimmed.
/// The year defaults to `default_year` when the expression omits one.
pub fn parse_flexible_date(text: &str, default_year: i32) -> Option<NaiveDate> {
    let p = &*PATTERNS;

    if let Some(caps) = p.iso.captures(text) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = p.numeric.captures(text) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year = caps.get(3).map_or(default_year, |m| expand_year(m.as_str()));
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = p.day_month.captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_name_to_number(&caps[2])?;
        let year = caps.get(3).map_or(default_year, |m| expand_year(m.as_str()));
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = p.month_day.captures(text) {
        let month = month_name_to_number(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let year = caps.get(3).map_or(default_year, |m| expand_year(m.as_str()));
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// Parse a free-form clock time ("9am", "12:30pm", "15:00"), lowercased.
pub fn parse_flexible_time(text: &str) -> Option<NaiveTime> {
    let p = &*PATTERNS;

    if let Some(caps) = p.time_12h.captures(text) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
        let hour = to_24_hour(hour, &caps[3])?;
        return NaiveTime::from_hms_opt(hour, minute, 0);
    }

    if let Some(caps) = p.time_24h.captures(text) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        return NaiveTime::from_hms_opt(hour, minute, 0);
    }

    None
}

/// Parse the strict grammar's `MM/DD` date token against a fixed year.
pub fn parse_strict_date(token: &str, year: i32) -> Result<NaiveDate> {
    let bad = || Error::InvalidDate(token.to_string());
    let (month_str, day_str) = token.split_once('/').ok_or_else(bad)?;
    let month: u32 = month_str.parse().map_err(|_| bad())?;
    let day: u32 = day_str.parse().map_err(|_| bad())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad)
}

/// Parse the strict grammar's `HH:MMam/pm` time token. Unlike the flexible
/// parser, the minutes are required: "12pm" is rejected, "12:00pm" is not.
pub fn parse_strict_time(token: &str) -> Result<NaiveTime> {
    let bad = || Error::InvalidTime(token.to_string());
    let caps = PATTERNS.time_strict.captures(token).ok_or_else(bad)?;
    let hour: u32 = caps[1].parse().map_err(|_| bad())?;
    let minute: u32 = caps[2].parse().map_err(|_| bad())?;
    let hour = to_24_hour(hour, &caps[3][..1]).ok_or_else(bad)?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(bad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_flexible_date_numeric() {
        assert_eq!(parse_flexible_date("3/17", 2025), Some(date(2025, 3, 17)));
        assert_eq!(parse_flexible_date("03/17", 2025), Some(date(2025, 3, 17)));
        assert_eq!(parse_flexible_date("3/17/2026", 2025), Some(date(2026, 3, 17)));
        assert_eq!(parse_flexible_date("3/17/26", 2025), Some(date(2026, 3, 17)));
        assert_eq!(parse_flexible_date("13/1", 2025), None);
    }

    #[test]
    fn test_flexible_date_month_names() {
        assert_eq!(parse_flexible_date("17 march", 2025), Some(date(2025, 3, 17)));
        assert_eq!(parse_flexible_date("20th march 2025", 2024), Some(date(2025, 3, 20)));
        assert_eq!(parse_flexible_date("march 17", 2025), Some(date(2025, 3, 17)));
        assert_eq!(parse_flexible_date("dec 1st 2030", 2025), Some(date(2030, 12, 1)));
        assert_eq!(parse_flexible_date("march", 2025), None);
    }

    #[test]
    fn test_flexible_date_iso() {
        assert_eq!(parse_flexible_date("2025-03-17", 2024), Some(date(2025, 3, 17)));
        assert_eq!(parse_flexible_date("2025-02-30", 2024), None);
    }

    #[test]
    fn test_flexible_time() {
        assert_eq!(parse_flexible_time("9am"), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(parse_flexible_time("12:30pm"), NaiveTime::from_hms_opt(12, 30, 0));
        assert_eq!(parse_flexible_time("12am"), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(parse_flexible_time("15:00"), NaiveTime::from_hms_opt(15, 0, 0));
        assert_eq!(parse_flexible_time("25:00"), None);
        assert_eq!(parse_flexible_time("steve"), None);
    }

    #[test]
    fn test_strict_date() {
        assert_eq!(parse_strict_date("03/17", 2025).unwrap(), date(2025, 3, 17));
        assert_eq!(parse_strict_date("3/17", 2025).unwrap(), date(2025, 3, 17));
        assert!(parse_strict_date("13/45", 2025).is_err());
        assert!(parse_strict_date("march", 2025).is_err());
    }

    #[test]
    fn test_strict_time_requires_minutes() {
        assert_eq!(parse_strict_time("12:00pm").unwrap(), NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(parse_strict_time("12:00am").unwrap(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(parse_strict_time("1:05pm").unwrap(), NaiveTime::from_hms_opt(13, 5, 0).unwrap());
        assert!(parse_strict_time("12pm").is_err());
        assert!(parse_strict_time("13:00pm").is_err());
        assert!(parse_strict_time("15:00").is_err());
    }
}
