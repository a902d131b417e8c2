//! Data models for attendance records, shifts, employees, and summaries.

pub mod attendance;
pub mod employee;
pub mod shift;
pub mod summary;

pub use attendance::{AttendanceStatus, ClassifiedRecord, RawAttendanceRecord};
pub use employee::{Employee, EmployeeDirectory, EmptyDirectory, Roster};
pub use shift::{ActiveShift, ShiftConfig, ShiftWindow};
pub use summary::{Alert, AlertKind, AlertSeverity, AttendanceSummary, DepartmentSummary, EmployeeSummary, StatusCounts};
