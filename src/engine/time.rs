//! Clock time parsing for check-in/check-out values.
//!
//! Accepted encodings:
//! - `"HH:MM"`, `"HH:MM:SS"`, or a bare hour `"HH"`
//! - 12-hour `"hh:mm AM"` / `"hh:mm pm"`
//! - ISO datetime `"2025-06-02T09:05:00"` (with or without offset)
//! - `"YYYY-MM-DD HH:MM:SS"`
//!
//! Datetimes keep their wall-clock components; no timezone conversion happens.
//! Parsing never fails loudly: anything unrecognized is `None`.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Timelike};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Wall-clock time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    /// Build from components; `None` when out of range.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Parse any accepted encoding.
    pub fn parse(value: &str) -> Option<Self> {
        parse_time(value)
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    /// True for 00:00-11:59.
    pub fn is_before_noon(&self) -> bool {
        self.hour < 12
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Parse an optional time value. Missing or blank input is `None`.
pub fn parse_optional(value: Option<&str>) -> Option<ClockTime> {
    value.and_then(parse_time)
}

/// Parse a time value in any accepted encoding.
pub fn parse_time(value: &str) -> Option<ClockTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let upper = value.to_ascii_uppercase();
    if upper.contains("AM") || upper.contains("PM") {
        parse_twelve_hour(&upper)
    } else if value.contains('T') || value.contains(' ') {
        parse_datetime(value)
    } else {
        parse_clock(value)
    }
}

fn parse_twelve_hour(upper: &str) -> Option<ClockTime> {
    let is_pm = upper.contains("PM");
    let stripped = upper.replace("AM", "").replace("PM", "");
    // "2025-06-02 09:15 AM" keeps only the clock part
    let clock = stripped.split_whitespace().last()?;

    let (hour, minute) = split_clock(clock)?;
    if hour > 12 {
        return None;
    }
    let hour = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    ClockTime::new(hour, minute)
}

fn parse_datetime(value: &str) -> Option<ClockTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        let local = dt.naive_local();
        return ClockTime::new(local.hour(), local.minute());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .and_then(|dt| ClockTime::new(dt.hour(), dt.minute()))
}

fn parse_clock(value: &str) -> Option<ClockTime> {
    let (hour, minute) = split_clock(value)?;
    ClockTime::new(hour, minute)
}

/// Split `"H[:M[:...]]"` into hour and minute. Extra fields are ignored.
fn split_clock(value: &str) -> Option<(u32, u32)> {
    let mut parts = value.split(':');
    let hour = parts.next()?.trim().parse::<u32>().ok()?;
    let minute = match parts.next() {
        Some(m) => m.trim().parse::<u32>().ok()?,
        None => 0,
    };
    Some((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(value: &str) -> Option<(u32, u32)> {
        parse_time(value).map(|t| (t.hour, t.minute))
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_time(""), None);
        assert_eq!(parse_time("   "), None);
        assert_eq!(parse_optional(None), None);
    }

    #[test]
    fn test_twenty_four_hour_clock() {
        assert_eq!(hm("09:05"), Some((9, 5)));
        assert_eq!(hm("21:30:45"), Some((21, 30)));
        assert_eq!(hm("7"), Some((7, 0)));
    }

    #[test]
    fn test_twelve_hour_clock() {
        assert_eq!(hm("12:15 AM"), Some((0, 15)));
        assert_eq!(hm("12:40 pm"), Some((12, 40)));
        assert_eq!(hm("01:30 PM"), Some((13, 30)));
        assert_eq!(hm("9:05 am"), Some((9, 5)));
        assert_eq!(hm("2025-06-02 09:15 PM"), Some((21, 15)));
        assert_eq!(hm("13:00 PM"), None);
    }

    #[test]
    fn test_datetime_keeps_wall_clock() {
        assert_eq!(hm("2025-06-02T09:05:00"), Some((9, 5)));
        assert_eq!(hm("2025-06-02T09:05:00.123"), Some((9, 5)));
        assert_eq!(hm("2025-06-02T22:10:00+05:30"), Some((22, 10)));
        assert_eq!(hm("2025-06-02T06:45:00Z"), Some((6, 45)));
        assert_eq!(hm("2025-06-02 18:20:11"), Some((18, 20)));
        assert_eq!(hm("2025-06-02 18:20"), Some((18, 20)));
    }

    #[test]
    fn test_malformed_values() {
        assert_eq!(hm("nine:thirty"), None);
        assert_eq!(hm("09:xx"), None);
        assert_eq!(hm("25:00"), None);
        assert_eq!(hm("09:75"), None);
        assert_eq!(hm("2025-13-40T09:00:00"), None);
        assert_eq!(hm("not a time"), None);
    }

    #[test]
    fn test_minutes_and_display() {
        let t = ClockTime::new(13, 45).unwrap();
        assert_eq!(t.minutes(), 825);
        assert_eq!(t.to_string(), "13:45");
        assert!(!t.is_before_noon());
        assert!(ClockTime::new(24, 0).is_none());
    }
}
