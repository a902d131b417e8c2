//! Attendance classification and aggregation engine.
//!
//! Data flows leaf-first: raw records are parsed ([`time`]), classified against
//! one shift snapshot ([`classify`]), timed ([`duration`]), and folded into
//! dashboard statistics and alerts ([`aggregate`], [`alerts`]). Every stage is a
//! pure function of its inputs.
//!
//! # Example
//!
//! ```
//! use attendance_engine::config::AppConfig;
//! use attendance_engine::engine::{AggregateOptions, AttendanceFilter, process};
//! use attendance_engine::models::{EmptyDirectory, RawAttendanceRecord};
//! use chrono::NaiveDate;
//!
//! let config = AppConfig::default();
//! let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
//! let records = vec![RawAttendanceRecord::new("e1", day).with_check_in("09:05")];
//!
//! let processed = process(
//!     &records,
//!     &config.shift,
//!     &config.work,
//!     &AttendanceFilter::default(),
//!     &EmptyDirectory,
//!     &AggregateOptions::new(day),
//! );
//! assert_eq!(processed.report.summary.present_days, 1);
//! ```

pub mod aggregate;
pub mod alerts;
pub mod calendar;
pub mod classify;
pub mod duration;
pub mod time;


pub use aggregate::{AggregateOptions, AttendanceFilter, AttendanceReport, aggregate};
pub use calendar::DateRange;
pub use classify::{classify, classify_all, classify_record};
pub use duration::worked_minutes;
pub use time::{ClockTime, parse_time};

use serde::Serialize;

use crate::config::WorkPolicy;
use crate::models::attendance::{ClassifiedRecord, RawAttendanceRecord};
use crate::models::employee::EmployeeDirectory;
use crate::models::shift::ShiftConfig;

/// Classified records together with the report built from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedAttendance {
    pub records: Vec<ClassifiedRecord>,
    pub report: AttendanceReport,
}

/// Run the whole pipeline against one shift snapshot.
pub fn process(
    records: &[RawAttendanceRecord],
    shift: &ShiftConfig,
    work: &WorkPolicy,
    filter: &AttendanceFilter,
    directory: &dyn EmployeeDirectory,
    options: &AggregateOptions,
) -> ProcessedAttendance {
    let classified = classify_all(records, shift, work);
    let report = aggregate(&classified, filter, directory, options);
    ProcessedAttendance {
        records: classified,
        report,
    }
}
