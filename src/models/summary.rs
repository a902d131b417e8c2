//! Aggregated statistics and alerts.

use chrono::NaiveDate;
use serde::Serialize;

use super::attendance::AttendanceStatus;

/// Tally of records per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub present: u32,
    pub late: u32,
    pub half_day: u32,
    pub absent: u32,
    pub on_leave: u32,
    pub holiday: u32,
    pub custom: u32,
}

impl StatusCounts {
    /// Count one status.
    pub fn add(&mut self, status: &AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::HalfDay => self.half_day += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::OnLeave => self.on_leave += 1,
            AttendanceStatus::Holiday => self.holiday += 1,
            AttendanceStatus::Custom(_) => self.custom += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.present + self.late + self.half_day + self.absent + self.on_leave + self.holiday + self.custom
    }

    /// Days the employee showed up (present, late or half day).
    pub fn attended(&self) -> u32 {
        self.present + self.late + self.half_day
    }

    /// Weighted attendance: late counts in full, half days count half.
    pub fn credit(&self) -> f64 {
        f64::from(self.present + self.late) + 0.5 * f64::from(self.half_day)
    }
}

impl<'a> FromIterator<&'a AttendanceStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = &'a AttendanceStatus>>(iter: I) -> Self {
        let mut counts = Self::default();
        for status in iter {
            counts.add(status);
        }
        counts
    }
}

/// Dashboard statistics over a filtered record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub counts: StatusCounts,
    /// Monday-Friday days in the aggregation window.
    pub total_working_days: u32,
    pub present_days: u32,
    pub late_days: u32,
    pub half_days: u32,
    /// Working days minus attended days, floored at zero.
    pub absent_days: u32,
    pub attendance_percentage: u32,
    pub total_working_minutes: u64,
    pub average_working_minutes: f64,
    pub total_overtime_minutes: u64,
}

/// Report row for one employee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeSummary {
    pub employee_id: String,
    pub name: Option<String>,
    pub department: Option<String>,
    pub total_days: u32,
    pub counts: StatusCounts,
    pub total_working_minutes: u64,
    pub overtime_minutes: u64,
    pub late_minutes: u64,
    pub attendance_percentage: f64,
}

/// Report row for one department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentSummary {
    pub department: String,
    pub employees: usize,
    pub total_records: u32,
    pub counts: StatusCounts,
    pub attendance_percentage: f64,
}

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Danger,
    Warning,
}

/// What triggered an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertKind {
    /// Consecutive calendar days marked absent.
    AbsenceStreak {
        days: u32,
        from: NaiveDate,
        to: NaiveDate,
    },
    /// Late check-ins within the lookback window.
    FrequentLateness { count: u32, since: NaiveDate },
}

/// Advisory alert. Never blocks aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub employee_id: String,
    pub kind: AlertKind,
    pub message: String,
}
