//! Advisory alerts: absence streaks and chronic lateness.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};

use super::time::parse_optional;
use crate::config::AlertPolicy;
use crate::models::attendance::{AttendanceStatus, ClassifiedRecord};
use crate::models::employee::EmployeeDirectory;
use crate::models::summary::{Alert, AlertKind, AlertSeverity};

fn display_name<'a>(directory: &'a dyn EmployeeDirectory, employee_id: &'a str) -> &'a str {
    directory.display_name(employee_id).unwrap_or(employee_id)
}

/// Split sorted, distinct dates into runs of consecutive calendar days.
fn consecutive_runs(dates: &BTreeSet<NaiveDate>) -> Vec<(NaiveDate, NaiveDate, u32)> {
    let mut runs = Vec::new();
    let mut current: Option<(NaiveDate, NaiveDate, u32)> = None;

    for &date in dates {
        current = match current {
            Some((start, end, len)) if end.succ_opt() == Some(date) => Some((start, date, len + 1)),
            Some(run) => {
                runs.push(run);
                Some((date, date, 1))
            }
            None => Some((date, date, 1)),
        };
    }
    runs.extend(current);
    runs
}

/// One alert per run of at least `policy.absence_streak_days` consecutive absent days.
pub fn absence_streak_alerts(
    records: &[&ClassifiedRecord],
    directory: &dyn EmployeeDirectory,
    policy: &AlertPolicy,
) -> Vec<Alert> {
    let mut absences: BTreeMap<&str, BTreeSet<NaiveDate>> = BTreeMap::new();
    for record in records.iter().filter(|r| r.status == AttendanceStatus::Absent) {
        absences.entry(record.employee_id()).or_default().insert(record.date());
    }

    let mut alerts = Vec::new();
    for (employee_id, dates) in &absences {
        for (from, to, days) in consecutive_runs(dates) {
            if days < policy.absence_streak_days {
                continue;
            }
            alerts.push(Alert {
                severity: AlertSeverity::Danger,
                employee_id: employee_id.to_string(),
                kind: AlertKind::AbsenceStreak { days, from, to },
                message: format!(
                    "{} has {days} consecutive absences ({from} to {to})",
                    display_name(directory, employee_id)
                ),
            });
        }
    }
    alerts
}

/// One alert per employee with at least `policy.lateness_min_count` check-ins
/// after the lateness cutoff within the trailing lookback window ending `today`.
pub fn lateness_alerts(
    records: &[&ClassifiedRecord],
    directory: &dyn EmployeeDirectory,
    policy: &AlertPolicy,
    today: NaiveDate,
) -> Vec<Alert> {
    let cutoff = policy.cutoff().minutes();
    let since = today
        .checked_sub_days(Days::new(u64::from(policy.lateness_lookback_days)))
        .unwrap_or(NaiveDate::MIN);

    let mut late_counts: BTreeMap<&str, u32> = BTreeMap::new();
    for record in records {
        let date = record.date();
        if date < since || date > today {
            continue;
        }
        let Some(check_in) = parse_optional(record.record.check_in.as_deref()) else {
            continue;
        };
        if check_in.minutes() > cutoff {
            *late_counts.entry(record.employee_id()).or_default() += 1;
        }
    }

    late_counts
        .into_iter()
        .filter(|(_, count)| *count >= policy.lateness_min_count)
        .map(|(employee_id, count)| Alert {
            severity: AlertSeverity::Warning,
            employee_id: employee_id.to_string(),
            kind: AlertKind::FrequentLateness { count, since },
            message: format!(
                "{} has {count} late check-ins in the last {} days",
                display_name(directory, employee_id),
                policy.lateness_lookback_days
            ),
        })
        .collect()
}

/// Both alert kinds, absence streaks first.
pub fn evaluate_alerts(
    records: &[&ClassifiedRecord],
    directory: &dyn EmployeeDirectory,
    policy: &AlertPolicy,
    today: NaiveDate,
) -> Vec<Alert> {
    let mut alerts = absence_streak_alerts(records, directory, policy);
    alerts.extend(lateness_alerts(records, directory, policy, today));
    alerts
}
