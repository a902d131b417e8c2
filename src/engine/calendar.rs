//! Working-day calendar helpers.

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::Serialize;

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whole calendar month; `None` for an invalid year/month.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
        Some(Self { start, end })
    }

    /// Month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .unwrap_or(date);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the range. Empty when `end < start`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    /// Monday-Friday days in the range.
    pub fn working_days(&self) -> u32 {
        self.days().filter(|d| is_working_day(*d)).count() as u32
    }
}

/// Monday through Friday.
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Parse `"YYYY-MM"` into (year, month).
pub fn parse_month(value: &str) -> Option<(i32, u32)> {
    let (year, month) = value.trim().split_once('-')?;
    let year = year.parse().ok()?;
    let month = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1).map(|_| (year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekends_are_not_working_days() {
        // 2025-06-02 is a Monday
        assert!(is_working_day(date(2025, 6, 2)));
        assert!(is_working_day(date(2025, 6, 6)));
        assert!(!is_working_day(date(2025, 6, 7)));
        assert!(!is_working_day(date(2025, 6, 8)));
    }

    #[test]
    fn test_month_working_days() {
        assert_eq!(DateRange::month(2025, 6).unwrap().working_days(), 21);
        assert_eq!(DateRange::month(2024, 2).unwrap().working_days(), 21);
        assert_eq!(DateRange::month(2025, 2).unwrap().working_days(), 20);
        assert!(DateRange::month(2025, 13).is_none());
    }

    #[test]
    fn test_month_bounds() {
        let range = DateRange::month_of(date(2024, 2, 17));
        assert_eq!(range.start, date(2024, 2, 1));
        assert_eq!(range.end, date(2024, 2, 29));

        let december = DateRange::month(2025, 12).unwrap();
        assert_eq!(december.end, date(2025, 12, 31));
    }

    #[test]
    fn test_range_working_days() {
        // Mon 2025-01-06 to Sun 2025-01-12
        let week = DateRange::new(date(2025, 1, 6), date(2025, 1, 12));
        assert_eq!(week.working_days(), 5);

        let weekend = DateRange::new(date(2025, 1, 11), date(2025, 1, 12));
        assert_eq!(weekend.working_days(), 0);

        let inverted = DateRange::new(date(2025, 1, 12), date(2025, 1, 6));
        assert_eq!(inverted.working_days(), 0);
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-06"), Some((2025, 6)));
        assert_eq!(parse_month("2025-00"), None);
        assert_eq!(parse_month("June"), None);
    }
}
