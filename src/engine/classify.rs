//! Per-record attendance status classification.

use tracing::{debug, warn};

use super::duration::{overtime_minutes, worked_minutes};
use super::time::{ClockTime, MINUTES_PER_DAY, parse_optional, parse_time};
use crate::config::WorkPolicy;
use crate::models::attendance::{AttendanceStatus, ClassifiedRecord, RawAttendanceRecord};
use crate::models::shift::{ShiftConfig, ShiftWindow};

/// Parsed late and half-day cutoffs of the active shift, in aligned minutes.
#[derive(Debug, Clone, Copy)]
struct Thresholds {
    late: u32,
    half_day: u32,
    night: bool,
}

impl Thresholds {
    /// `None` when either threshold string is malformed.
    fn from_config(config: &ShiftConfig) -> Option<Self> {
        let window = config.active_window();
        let night = config.is_night();
        let late = parse_time(&window.late_threshold)?;
        let half_day = parse_time(&window.half_day_threshold)?;
        Some(Self {
            late: align(late, night),
            half_day: align(half_day, night),
            night,
        })
    }
}

/// Minutes on the shift's timeline.
///
/// On a night shift, times before noon belong to the shift that started the
/// previous evening and are pushed past midnight.
///
/// Each value is aligned on its own hour. Shifting the thresholds only when the
/// check-in falls before noon would put a 21:00 threshold at 2700 and classify a
/// 01:30 check-in (1570) as on time; aligning each value keeps 01:30 late.
fn align(time: ClockTime, night: bool) -> u32 {
    if night && time.is_before_noon() {
        time.minutes() + MINUTES_PER_DAY
    } else {
        time.minutes()
    }
}

fn load_thresholds(config: &ShiftConfig) -> Option<Thresholds> {
    let thresholds = Thresholds::from_config(config);
    if thresholds.is_none() {
        let ShiftWindow {
            late_threshold,
            half_day_threshold,
            ..
        } = config.active_window();
        warn!(
            "Malformed {:?} shift thresholds (late={late_threshold:?}, half_day={half_day_threshold:?}), classifying check-ins as present",
            config.active_shift
        );
    }
    thresholds
}

/// Upstream status that wins over time-based classification.
///
/// A generic "present" is only a placeholder and gets refined.
fn upstream_override(existing_status: Option<&str>) -> Option<AttendanceStatus> {
    let raw = existing_status?.trim();
    if raw.is_empty() {
        return None;
    }
    match AttendanceStatus::parse(raw) {
        AttendanceStatus::Present => None,
        status => Some(status),
    }
}

struct Outcome {
    status: AttendanceStatus,
    late_minutes: Option<u32>,
}

fn evaluate(check_in: Option<&str>, existing_status: Option<&str>, thresholds: Option<Thresholds>) -> Outcome {
    if let Some(status) = upstream_override(existing_status) {
        return Outcome {
            status,
            late_minutes: None,
        };
    }

    let Some(check_in) = parse_optional(check_in) else {
        return Outcome {
            status: AttendanceStatus::Absent,
            late_minutes: None,
        };
    };

    let Some(thresholds) = thresholds else {
        return Outcome {
            status: AttendanceStatus::Present,
            late_minutes: None,
        };
    };

    let at = align(check_in, thresholds.night);
    let status = if at > thresholds.half_day {
        AttendanceStatus::HalfDay
    } else if at > thresholds.late {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    };
    let late_minutes = (status != AttendanceStatus::Present).then(|| at.saturating_sub(thresholds.late));

    Outcome { status, late_minutes }
}

/// Decide the attendance status of one employee-day.
///
/// Rules, in order:
/// 1. a non-placeholder upstream status is returned as-is;
/// 2. a missing or unparseable check-in is `Absent`;
/// 3. the check-in is compared against the active shift's thresholds
///    (strictly after half-day → `HalfDay`, strictly after late → `Late`,
///    otherwise `Present`).
///
/// Malformed thresholds classify every check-in as `Present`. The check-out
/// does not influence the status.
pub fn classify(
    check_in: Option<&str>,
    _check_out: Option<&str>,
    existing_status: Option<&str>,
    config: &ShiftConfig,
) -> AttendanceStatus {
    let thresholds = if upstream_override(existing_status).is_some() {
        None
    } else {
        load_thresholds(config)
    };
    evaluate(check_in, existing_status, thresholds).status
}

fn build_record(record: &RawAttendanceRecord, thresholds: Option<Thresholds>, work: &WorkPolicy) -> ClassifiedRecord {
    let outcome = evaluate(
        record.check_in.as_deref(),
        record.existing_status.as_deref(),
        thresholds,
    );
    let worked = worked_minutes(record.check_in.as_deref(), record.check_out.as_deref());

    ClassifiedRecord {
        record: record.clone(),
        status: outcome.status,
        worked_minutes: worked,
        overtime_minutes: overtime_minutes(worked, work.standard_minutes),
        late_minutes: outcome.late_minutes,
    }
}

/// Classify one record and compute its worked time.
pub fn classify_record(record: &RawAttendanceRecord, config: &ShiftConfig, work: &WorkPolicy) -> ClassifiedRecord {
    build_record(record, load_thresholds(config), work)
}

/// Classify a batch against one shift snapshot.
pub fn classify_all(records: &[RawAttendanceRecord], config: &ShiftConfig, work: &WorkPolicy) -> Vec<ClassifiedRecord> {
    let thresholds = load_thresholds(config);
    let classified: Vec<_> = records.iter().map(|r| build_record(r, thresholds, work)).collect();
    debug!(
        "Classified {} records against the {:?} shift",
        classified.len(),
        config.active_shift
    );
    classified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shift::ActiveShift;
    use chrono::NaiveDate;

    fn day_config(late: &str, half_day: &str) -> ShiftConfig {
        let mut config = ShiftConfig::default();
        config.day_shift.late_threshold = late.to_string();
        config.day_shift.half_day_threshold = half_day.to_string();
        config
    }

    fn night_config(late: &str, half_day: &str) -> ShiftConfig {
        let mut config = ShiftConfig::default().with_active(ActiveShift::Night);
        config.night_shift.late_threshold = late.to_string();
        config.night_shift.half_day_threshold = half_day.to_string();
        config
    }

    #[test]
    fn test_on_time_late_half_day() {
        let config = day_config("09:00", "13:00");
        assert_eq!(classify(Some("08:55"), None, None, &config), AttendanceStatus::Present);
        assert_eq!(classify(Some("09:05"), None, None, &config), AttendanceStatus::Late);
        assert_eq!(classify(Some("13:45"), None, None, &config), AttendanceStatus::HalfDay);
    }

    #[test]
    fn test_threshold_boundaries_are_strict() {
        let config = day_config("09:00", "13:00");
        assert_eq!(classify(Some("09:00"), None, None, &config), AttendanceStatus::Present);
        assert_eq!(classify(Some("09:00:59"), None, None, &config), AttendanceStatus::Present);
        assert_eq!(classify(Some("13:00"), None, None, &config), AttendanceStatus::Late);
        assert_eq!(classify(Some("13:01"), None, None, &config), AttendanceStatus::HalfDay);
    }

    #[test]
    fn test_missing_check_in_is_absent() {
        let config = ShiftConfig::default();
        assert_eq!(classify(None, Some("17:00"), None, &config), AttendanceStatus::Absent);
        assert_eq!(classify(Some("garbage"), None, None, &config), AttendanceStatus::Absent);
        assert_eq!(classify(Some(""), None, Some("present"), &config), AttendanceStatus::Absent);
    }

    #[test]
    fn test_existing_status_override() {
        let config = day_config("09:00", "13:00");
        assert_eq!(
            classify(Some("09:15"), None, Some("On Leave"), &config),
            AttendanceStatus::OnLeave
        );
        assert_eq!(classify(None, None, Some("holiday"), &config), AttendanceStatus::Holiday);
        assert_eq!(
            classify(Some("08:00"), None, Some("Training"), &config),
            AttendanceStatus::Custom("Training".to_string())
        );
        assert_eq!(classify(Some("08:00"), None, Some("absent"), &config), AttendanceStatus::Absent);
    }

    #[test]
    fn test_present_placeholder_is_refined() {
        let config = day_config("09:00", "13:00");
        assert_eq!(classify(Some("09:30"), None, Some("PRESENT"), &config), AttendanceStatus::Late);
        assert_eq!(classify(Some("08:30"), None, Some("  "), &config), AttendanceStatus::Present);
    }

    #[test]
    fn test_night_shift_after_midnight() {
        let config = night_config("21:00", "23:59");
        // 01:30 sits at 1570 on the shift timeline, past 21:00 (1260)
        assert_eq!(classify(Some("01:30"), None, None, &config), AttendanceStatus::HalfDay);

        let config = night_config("21:00", "02:00");
        assert_eq!(classify(Some("01:30"), None, None, &config), AttendanceStatus::Late);
        assert_eq!(classify(Some("20:55"), None, None, &config), AttendanceStatus::Present);
        assert_eq!(classify(Some("21:10"), None, None, &config), AttendanceStatus::Late);
        assert_eq!(classify(Some("02:30"), None, None, &config), AttendanceStatus::HalfDay);
    }

    #[test]
    fn test_day_shift_morning_not_shifted() {
        let config = day_config("09:00", "13:00");
        assert_eq!(classify(Some("01:30"), None, None, &config), AttendanceStatus::Present);
    }

    #[test]
    fn test_malformed_threshold_defaults_to_present() {
        let config = day_config("nine", "13:00");
        assert_eq!(classify(Some("15:00"), None, None, &config), AttendanceStatus::Present);
        assert_eq!(classify(None, None, None, &config), AttendanceStatus::Absent);
    }

    #[test]
    fn test_classify_record_fields() {
        let config = day_config("09:00", "13:00");
        let work = WorkPolicy::default();
        let record = RawAttendanceRecord::new("e1", NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
            .with_check_in("09:20")
            .with_check_out("18:30");

        let classified = classify_record(&record, &config, &work);
        assert_eq!(classified.status, AttendanceStatus::Late);
        assert_eq!(classified.late_minutes, Some(20));
        assert_eq!(classified.worked_minutes, Some(550));
        assert_eq!(classified.overtime_minutes, Some(70));
        assert_eq!(classified.record, record);
    }

    #[test]
    fn test_classify_all_preserves_order() {
        let config = day_config("09:00", "13:00");
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let records = vec![
            RawAttendanceRecord::new("a", date).with_check_in("08:59"),
            RawAttendanceRecord::new("b", date),
            RawAttendanceRecord::new("c", date).with_check_in("14:00"),
        ];
        let statuses: Vec<_> = classify_all(&records, &config, &WorkPolicy::default())
            .into_iter()
            .map(|r| r.status)
            .collect();
        assert_eq!(
            statuses,
            vec![AttendanceStatus::Present, AttendanceStatus::Absent, AttendanceStatus::HalfDay]
        );
    }
}
