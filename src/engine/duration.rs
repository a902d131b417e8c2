//! Worked-time calculations.

use super::time::{ClockTime, MINUTES_PER_DAY, parse_optional};

/// Worked minutes between two clock times.
///
/// A check-out earlier on the clock than the check-in wraps past midnight,
/// so the result is always in `0..MINUTES_PER_DAY`.
pub fn duration_between(check_in: ClockTime, check_out: ClockTime) -> u32 {
    let start = check_in.minutes();
    let end = check_out.minutes();
    if end < start {
        (MINUTES_PER_DAY - start) + end
    } else {
        end - start
    }
}

/// Worked minutes from raw check-in/check-out strings.
///
/// `None` when either value is missing or unparseable.
pub fn worked_minutes(check_in: Option<&str>, check_out: Option<&str>) -> Option<u32> {
    let start = parse_optional(check_in)?;
    let end = parse_optional(check_out)?;
    Some(duration_between(start, end))
}

/// Minutes worked beyond the standard day, if any were worked at all.
pub fn overtime_minutes(worked: Option<u32>, standard_minutes: u32) -> Option<u32> {
    worked.map(|w| w.saturating_sub(standard_minutes))
}
