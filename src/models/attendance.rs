//! Attendance records and status values.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attendance status for one employee-day.
///
/// Upstream data spells statuses many ways ("present", "PRESENT", "half-day", "on_leave").
/// [`AttendanceStatus::parse`] is the only place raw strings are interpreted; anything it does
/// not recognize is kept verbatim as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttendanceStatus {
    Present,
    Late,
    HalfDay,
    Absent,
    OnLeave,
    Holiday,
    Custom(String),
}

impl AttendanceStatus {
    /// Parse an upstream status string, case-insensitive.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "present" | "p" | "on_duty" | "checked_in" => Self::Present,
            "late" => Self::Late,
            "half_day" | "halfday" | "half-day" | "half day" => Self::HalfDay,
            "absent" | "a" => Self::Absent,
            "leave" | "on_leave" | "on leave" | "on-leave" => Self::OnLeave,
            "holiday" => Self::Holiday,
            _ => Self::Custom(trimmed.to_string()),
        }
    }

    /// Machine key used for serialization and filters.
    pub fn key(&self) -> &str {
        match self {
            Self::Present => "present",
            Self::Late => "late",
            Self::HalfDay => "half_day",
            Self::Absent => "absent",
            Self::OnLeave => "on_leave",
            Self::Holiday => "holiday",
            Self::Custom(s) => s,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        match self {
            Self::Present => "Present",
            Self::Late => "Late",
            Self::HalfDay => "Half Day",
            Self::Absent => "Absent",
            Self::OnLeave => "On Leave",
            Self::Holiday => "Holiday",
            Self::Custom(s) => s,
        }
    }

    /// Attendance credit: full for present and late, half for a half day.
    pub fn credit(&self) -> f64 {
        match self {
            Self::Present | Self::Late => 1.0,
            Self::HalfDay => 0.5,
            _ => 0.0,
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for AttendanceStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<AttendanceStatus> for String {
    fn from(status: AttendanceStatus) -> Self {
        status.key().to_string()
    }
}

/// One employee-day observation as supplied by upstream data.
///
/// Decoding goes through a JSON object so records carrying several spellings
/// of one field (`employee_id` next to `user_id`) keep the first non-empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct RawAttendanceRecord {
    pub employee_id: String,
    pub date: NaiveDate,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    /// Prior classification from upstream ("leave", "holiday", ...).
    pub existing_status: Option<String>,
}

const EMPLOYEE_ID_KEYS: &[&str] = &["employee_id", "user_id", "employeeId"];
const DATE_KEYS: &[&str] = &["date", "attendance_date", "recorded_at"];
const CHECK_IN_KEYS: &[&str] = &[
    "check_in",
    "checkin",
    "checkIn",
    "checkin_time",
    "checkin_display",
    "check-in",
    "check_in_time",
];
const CHECK_OUT_KEYS: &[&str] = &[
    "check_out",
    "checkout",
    "checkOut",
    "checkout_time",
    "checkout_display",
    "check-out",
    "check_out_time",
];
const STATUS_KEYS: &[&str] = &["existing_status", "status", "existingStatus"];

impl TryFrom<Map<String, Value>> for RawAttendanceRecord {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let employee_id = first_id(&map, EMPLOYEE_ID_KEYS)?.ok_or("missing employee_id")?;
        let date = first_text(&map, DATE_KEYS)?.ok_or("missing date")?;

        Ok(Self {
            employee_id,
            date: parse_record_date(&date)?,
            check_in: first_text(&map, CHECK_IN_KEYS)?,
            check_out: first_text(&map, CHECK_OUT_KEYS)?,
            existing_status: first_text(&map, STATUS_KEYS)?,
        })
    }
}

/// Date-only values, or the date part of a datetime.
fn parse_record_date(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|e| match value.get(..10) {
            Some(prefix) if value.len() > 10 => NaiveDate::parse_from_str(prefix, "%Y-%m-%d"),
            _ => Err(e),
        })
        .map_err(|e| format!("invalid date {value:?}: {e}"))
}

impl RawAttendanceRecord {
    pub fn new(employee_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            check_in: None,
            check_out: None,
            existing_status: None,
        }
    }

    pub fn with_check_in(mut self, value: &str) -> Self {
        self.check_in = Some(value.to_string());
        self
    }

    pub fn with_check_out(mut self, value: &str) -> Self {
        self.check_out = Some(value.to_string());
        self
    }

    pub fn with_status(mut self, value: &str) -> Self {
        self.existing_status = Some(value.to_string());
        self
    }
}

/// Raw record plus its derived classification. Never written back to the raw data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    pub record: RawAttendanceRecord,
    pub status: AttendanceStatus,
    /// Minutes between check-in and check-out; absent without both times.
    pub worked_minutes: Option<u32>,
    /// Minutes beyond the standard working day.
    pub overtime_minutes: Option<u32>,
    /// Minutes past the late threshold for time-classified late/half-day records.
    pub late_minutes: Option<u32>,
}

impl ClassifiedRecord {
    pub fn employee_id(&self) -> &str {
        &self.record.employee_id
    }

    pub fn date(&self) -> NaiveDate {
        self.record.date
    }
}

/// First spelling among `keys` holding a non-empty value. Null and `""` fall through.
pub(crate) fn first_field<'a, 'k>(map: &'a Map<String, Value>, keys: &[&'k str]) -> Option<(&'k str, &'a Value)> {
    keys.iter().find_map(|&key| match map.get(key)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        value => Some((key, value)),
    })
}

/// First non-empty string field.
pub(crate) fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Result<Option<String>, String> {
    match first_field(map, keys) {
        None => Ok(None),
        Some((_, Value::String(s))) => Ok(Some(s.clone())),
        Some((key, other)) => Err(format!("{key} must be a string, got {other}")),
    }
}

/// First non-empty id field, given as a JSON string or number.
pub(crate) fn first_id(map: &Map<String, Value>, keys: &[&str]) -> Result<Option<String>, String> {
    match first_field(map, keys) {
        None => Ok(None),
        Some((_, Value::String(s))) => Ok(Some(s.clone())),
        Some((_, Value::Number(n))) => Ok(Some(n.to_string())),
        Some((key, other)) => Err(format!("{key} must be a string or number, got {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_spellings() {
        assert_eq!(AttendanceStatus::parse("PRESENT"), AttendanceStatus::Present);
        assert_eq!(AttendanceStatus::parse("half-day"), AttendanceStatus::HalfDay);
        assert_eq!(AttendanceStatus::parse("Half Day"), AttendanceStatus::HalfDay);
        assert_eq!(AttendanceStatus::parse("On Leave"), AttendanceStatus::OnLeave);
        assert_eq!(AttendanceStatus::parse("leave"), AttendanceStatus::OnLeave);
        assert_eq!(
            AttendanceStatus::parse(" Work From Home "),
            AttendanceStatus::Custom("Work From Home".to_string())
        );
    }

    #[test]
    fn test_status_credit() {
        assert_eq!(AttendanceStatus::Late.credit(), 1.0);
        assert_eq!(AttendanceStatus::HalfDay.credit(), 0.5);
        assert_eq!(AttendanceStatus::OnLeave.credit(), 0.0);
    }

    #[test]
    fn test_status_serializes_as_key() {
        let json = serde_json::to_string(&AttendanceStatus::HalfDay).unwrap();
        assert_eq!(json, "\"half_day\"");
        let back: AttendanceStatus = serde_json::from_str("\"ON_LEAVE\"").unwrap();
        assert_eq!(back, AttendanceStatus::OnLeave);
    }

    #[test]
    fn test_raw_record_aliases() {
        let json = r#"{"user_id": 42, "attendance_date": "2025-06-02", "checkin": "09:05", "status": "present"}"#;
        let record: RawAttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.employee_id, "42");
        assert_eq!(record.check_in.as_deref(), Some("09:05"));
        assert_eq!(record.check_out, None);
        assert_eq!(record.existing_status.as_deref(), Some("present"));
    }

    #[test]
    fn test_duplicate_spellings_keep_first() {
        let json = r#"{
            "employee_id": "e1",
            "user_id": "e1",
            "date": "2025-06-02",
            "check_in": "09:05",
            "checkin_time": "2025-06-02T09:05:00",
            "check_out": null,
            "checkout_time": "2025-06-02T18:00:00"
        }"#;
        let record: RawAttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.employee_id, "e1");
        assert_eq!(record.check_in.as_deref(), Some("09:05"));
        assert_eq!(record.check_out.as_deref(), Some("2025-06-02T18:00:00"));
    }

    #[test]
    fn test_empty_spelling_falls_through() {
        let json = r#"{"employee_id": "", "user_id": 7, "recorded_at": "2025-06-02T08:59:00Z", "checkin": ""}"#;
        let record: RawAttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.employee_id, "7");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert_eq!(record.check_in, None);
    }

    #[test]
    fn test_rejects_unusable_records() {
        let missing_date = r#"{"employee_id": "e1"}"#;
        assert!(serde_json::from_str::<RawAttendanceRecord>(missing_date).is_err());

        let bad_time = r#"{"employee_id": "e1", "date": "2025-06-02", "check_in": 905}"#;
        assert!(serde_json::from_str::<RawAttendanceRecord>(bad_time).is_err());

        let bad_id = r#"{"employee_id": true, "date": "2025-06-02"}"#;
        assert!(serde_json::from_str::<RawAttendanceRecord>(bad_id).is_err());
    }

    #[test]
    fn test_record_serializes_canonical_names() {
        let record = RawAttendanceRecord::new("e1", NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()).with_check_in("09:05");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["employee_id"], "e1");
        assert_eq!(json["check_in"], "09:05");

        let back: RawAttendanceRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
