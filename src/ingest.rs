//! JSON ingestion for attendance records and the employee roster.
//!
//! Input is either a bare array or an API envelope with the array under
//! `data` or `records`. Elements are decoded one by one; a malformed element
//! is logged and skipped so it never blocks the rest.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::models::attendance::RawAttendanceRecord;
use crate::models::employee::Employee;

/// Pull the element array out of a bare array or an envelope object.
fn element_array(root: Value) -> Result<Vec<Value>> {
    match root {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("data").or_else(|| map.remove("records")) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(AppError::parse("expected an array under \"data\" or \"records\"")),
        },
        _ => Err(AppError::parse("expected a JSON array or object")),
    }
}

fn parse_each<T: DeserializeOwned>(content: &str, kind: &str) -> Result<Vec<T>> {
    let items = element_array(serde_json::from_str(content)?)?;
    let total = items.len();

    let parsed: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<T>(item) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Skipping {kind} #{idx}: {e}");
                None
            }
        })
        .collect();

    debug!("Parsed {} of {total} {kind} entries", parsed.len());
    Ok(parsed)
}

/// Parse attendance records from JSON text.
pub fn parse_records(content: &str) -> Result<Vec<RawAttendanceRecord>> {
    parse_each(content, "attendance record")
}

/// Parse roster entries from JSON text.
pub fn parse_roster(content: &str) -> Result<Vec<Employee>> {
    parse_each(content, "employee")
}

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(AppError::not_found(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Load attendance records from a JSON file.
pub fn load_records(path: &Path) -> Result<Vec<RawAttendanceRecord>> {
    parse_records(&read_file(path)?)
}

/// Load the employee roster from a JSON file.
pub fn load_roster(path: &Path) -> Result<Vec<Employee>> {
    parse_roster(&read_file(path)?)
}
