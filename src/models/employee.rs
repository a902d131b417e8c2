//! Employee roster and department lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::attendance::{first_id, first_text};

/// Employee entry from the host's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Employee {
    pub id: String,
    pub name: Option<String>,
    pub department: Option<String>,
}

impl TryFrom<Map<String, Value>> for Employee {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: first_id(&map, &["id", "_id", "employee_id", "user_id"])?.ok_or("missing employee id")?,
            name: first_text(&map, &["name", "full_name", "employee_name", "user_name"])?,
            department: first_text(&map, &["department", "department_name"])?,
        })
    }
}

/// Employee → department/name lookup used by filters and alerts.
pub trait EmployeeDirectory {
    /// Department the employee belongs to, if known.
    fn department_of(&self, employee_id: &str) -> Option<&str>;

    /// Display name for alert messages.
    fn display_name(&self, _employee_id: &str) -> Option<&str> {
        None
    }
}

/// Directory with no entries. Department filters never match.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyDirectory;

impl EmployeeDirectory for EmptyDirectory {
    fn department_of(&self, _employee_id: &str) -> Option<&str> {
        None
    }
}

/// Plain employee id → department map.
impl EmployeeDirectory for HashMap<String, String> {
    fn department_of(&self, employee_id: &str) -> Option<&str> {
        self.get(employee_id).map(String::as_str)
    }
}

/// Indexed employee roster.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    employees: HashMap<String, Employee>,
}

impl Roster {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees: employees.into_iter().map(|e| (e.id.clone(), e)).collect(),
        }
    }

    pub fn get(&self, employee_id: &str) -> Option<&Employee> {
        self.employees.get(employee_id)
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

impl EmployeeDirectory for Roster {
    fn department_of(&self, employee_id: &str) -> Option<&str> {
        self.get(employee_id).and_then(|e| e.department.as_deref())
    }

    fn display_name(&self, employee_id: &str) -> Option<&str> {
        self.get(employee_id).and_then(|e| e.name.as_deref())
    }
}
