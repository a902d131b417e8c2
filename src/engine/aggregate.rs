//! Dashboard aggregation over classified records.
//!
//! Every call is a fresh fold over the records it is given; nothing is cached
//! between calls.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::alerts::evaluate_alerts;
use super::calendar::DateRange;
use crate::config::AlertPolicy;
use crate::models::attendance::{AttendanceStatus, ClassifiedRecord};
use crate::models::employee::EmployeeDirectory;
use crate::models::summary::{Alert, AttendanceSummary, DepartmentSummary, EmployeeSummary, StatusCounts};

/// Department label for employees the directory does not know.
pub const UNASSIGNED_DEPARTMENT: &str = "Unassigned";

/// Record selection applied before folding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceFilter {
    pub department: Option<String>,
    pub employee_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

impl AttendanceFilter {
    /// Department and employee criteria only.
    pub fn matches_employee(&self, record: &ClassifiedRecord, directory: &dyn EmployeeDirectory) -> bool {
        if let Some(employee_id) = &self.employee_id
            && record.employee_id() != employee_id
        {
            return false;
        }
        if let Some(department) = &self.department
            && directory.department_of(record.employee_id()) != Some(department.as_str())
        {
            return false;
        }
        true
    }

    /// All criteria, with dates limited to `window`.
    pub fn matches(&self, record: &ClassifiedRecord, directory: &dyn EmployeeDirectory, window: &DateRange) -> bool {
        if !window.contains(record.date()) {
            return false;
        }
        if let Some(status) = &self.status
            && &record.status != status
        {
            return false;
        }
        self.matches_employee(record, directory)
    }

    /// Aggregation window: the filter's own dates, completed from `selected`.
    ///
    /// A lone bound outside the selected month is completed from its own month
    /// instead, so the window never inverts around it.
    pub fn window(&self, selected: DateRange) -> DateRange {
        let window = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => DateRange::new(start, end),
            (Some(start), None) if start <= selected.end => DateRange::new(start, selected.end),
            (Some(start), None) => DateRange::new(start, DateRange::month_of(start).end),
            (None, Some(end)) if end >= selected.start => DateRange::new(selected.start, end),
            (None, Some(end)) => DateRange::new(DateRange::month_of(end).start, end),
            (None, None) => selected,
        };
        if window.start > window.end {
            warn!(
                "Filter date range {} to {} is inverted, no records will match",
                window.start, window.end
            );
        }
        window
    }
}

/// Inputs to [`aggregate`] besides the records themselves.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Selected (year, month); defaults to the month of `today`.
    pub month: Option<(i32, u32)>,
    /// Reference date for the lateness lookback window.
    pub today: NaiveDate,
    pub alerts: AlertPolicy,
}

impl AggregateOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            month: None,
            today,
            alerts: AlertPolicy::default(),
        }
    }

    pub fn with_month(mut self, year: i32, month: u32) -> Self {
        self.month = Some((year, month));
        self
    }

    pub fn with_alerts(mut self, alerts: AlertPolicy) -> Self {
        self.alerts = alerts;
        self
    }

    /// The selected month as a date range.
    pub fn selected_month(&self) -> DateRange {
        self.month
            .and_then(|(year, month)| DateRange::month(year, month))
            .unwrap_or_else(|| DateRange::month_of(self.today))
    }
}

/// Complete aggregation output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceReport {
    pub window: DateRange,
    pub summary: AttendanceSummary,
    pub employees: Vec<EmployeeSummary>,
    pub departments: Vec<DepartmentSummary>,
    pub alerts: Vec<Alert>,
}

fn percentage(credit: f64, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        credit / f64::from(denominator) * 100.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fold records into dashboard statistics over `window`.
///
/// Records are expected to be filtered already; `window` only supplies the
/// working-day denominator. No records gives an all-zero summary.
pub fn summarize(records: &[&ClassifiedRecord], window: DateRange) -> AttendanceSummary {
    if records.is_empty() {
        return AttendanceSummary::default();
    }

    let counts: StatusCounts = records.iter().map(|r| &r.status).collect();
    let total_working_days = window.working_days();
    let attended = counts.attended();

    let total_working_minutes: u64 = records.iter().filter_map(|r| r.worked_minutes).map(u64::from).sum();
    let total_overtime_minutes: u64 = records.iter().filter_map(|r| r.overtime_minutes).map(u64::from).sum();

    let average_working_minutes = if attended == 0 {
        0.0
    } else {
        total_working_minutes as f64 / f64::from(attended)
    };

    AttendanceSummary {
        counts,
        total_working_days,
        present_days: counts.present,
        late_days: counts.late,
        half_days: counts.half_day,
        absent_days: total_working_days.saturating_sub(attended),
        attendance_percentage: percentage(counts.credit(), total_working_days).round() as u32,
        total_working_minutes,
        average_working_minutes,
        total_overtime_minutes,
    }
}

/// One report row per employee, ordered by employee id.
pub fn employee_summaries(records: &[&ClassifiedRecord], directory: &dyn EmployeeDirectory) -> Vec<EmployeeSummary> {
    let mut grouped: BTreeMap<&str, Vec<&ClassifiedRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.employee_id()).or_default().push(*record);
    }

    grouped
        .into_iter()
        .map(|(employee_id, rows)| {
            let counts: StatusCounts = rows.iter().map(|r| &r.status).collect();
            let total_days = counts.total();
            let sum = |field: fn(&ClassifiedRecord) -> Option<u32>| -> u64 {
                rows.iter().filter_map(|r| field(r)).map(u64::from).sum()
            };

            EmployeeSummary {
                employee_id: employee_id.to_string(),
                name: directory.display_name(employee_id).map(str::to_string),
                department: directory.department_of(employee_id).map(str::to_string),
                total_days,
                counts,
                total_working_minutes: sum(|r| r.worked_minutes),
                overtime_minutes: sum(|r| r.overtime_minutes),
                late_minutes: sum(|r| r.late_minutes),
                attendance_percentage: round2(percentage(counts.credit(), total_days)),
            }
        })
        .collect()
}

/// One report row per department, ordered by name.
pub fn department_summaries(
    records: &[&ClassifiedRecord],
    directory: &dyn EmployeeDirectory,
) -> Vec<DepartmentSummary> {
    let mut grouped: BTreeMap<&str, (BTreeSet<&str>, StatusCounts)> = BTreeMap::new();
    for record in records {
        let department = directory
            .department_of(record.employee_id())
            .unwrap_or(UNASSIGNED_DEPARTMENT);
        let (employees, counts) = grouped.entry(department).or_default();
        employees.insert(record.employee_id());
        counts.add(&record.status);
    }

    grouped
        .into_iter()
        .map(|(department, (employees, counts))| DepartmentSummary {
            department: department.to_string(),
            employees: employees.len(),
            total_records: counts.total(),
            counts,
            attendance_percentage: round2(percentage(counts.credit(), counts.total())),
        })
        .collect()
}

/// Filter, fold, and evaluate alerts in one pass over `records`.
///
/// Alerts look at every record of the selected employees (department and
/// employee criteria only) so streaks and lateness are not cut off by the
/// date or status filters.
pub fn aggregate(
    records: &[ClassifiedRecord],
    filter: &AttendanceFilter,
    directory: &dyn EmployeeDirectory,
    options: &AggregateOptions,
) -> AttendanceReport {
    let window = filter.window(options.selected_month());

    let selected: Vec<&ClassifiedRecord> = records
        .iter()
        .filter(|r| filter.matches(r, directory, &window))
        .collect();
    let subjects: Vec<&ClassifiedRecord> = records
        .iter()
        .filter(|r| filter.matches_employee(r, directory))
        .collect();

    debug!(
        "Aggregating {} of {} records over {} to {}",
        selected.len(),
        records.len(),
        window.start,
        window.end
    );

    AttendanceReport {
        window,
        summary: summarize(&selected, window),
        employees: employee_summaries(&selected, directory),
        departments: department_summaries(&selected, directory),
        alerts: evaluate_alerts(&subjects, directory, &options.alerts, options.today),
    }
}
