//! Shift schedule configuration.

use serde::{Deserialize, Serialize};

/// Which configured shift governs classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveShift {
    #[default]
    Day,
    Night,
}

impl ActiveShift {
    /// Parse a shift name ("day" / "night"), case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Some(Self::Day),
            "night" => Some(Self::Night),
            _ => None,
        }
    }
}

/// One configured work period.
///
/// All times are `"HH:MM"` clock strings. `end_time` may be earlier than
/// `start_time` for shifts that run past midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub start_time: String,
    pub end_time: String,
    /// Check-in strictly after this is late.
    pub late_threshold: String,
    /// Check-in strictly after this is a half day.
    pub half_day_threshold: String,
}

impl ShiftWindow {
    pub fn new(start: &str, end: &str, late: &str, half_day: &str) -> Self {
        Self {
            start_time: start.to_string(),
            end_time: end.to_string(),
            late_threshold: late.to_string(),
            half_day_threshold: half_day.to_string(),
        }
    }

    /// Default 09:00-18:00 day shift.
    pub fn default_day() -> Self {
        Self::new("09:00", "18:00", "09:15", "13:00")
    }

    /// Default 21:00-06:00 night shift.
    pub fn default_night() -> Self {
        Self::new("21:00", "06:00", "21:15", "01:00")
    }
}

/// Shift schedule: a day window, a night window, and the active selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftConfig {
    pub day_shift: ShiftWindow,
    pub night_shift: ShiftWindow,
    pub active_shift: ActiveShift,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            day_shift: ShiftWindow::default_day(),
            night_shift: ShiftWindow::default_night(),
            active_shift: ActiveShift::Day,
        }
    }
}

impl ShiftConfig {
    /// The window selected by `active_shift`.
    pub fn active_window(&self) -> &ShiftWindow {
        match self.active_shift {
            ActiveShift::Day => &self.day_shift,
            ActiveShift::Night => &self.night_shift,
        }
    }

    pub fn is_night(&self) -> bool {
        self.active_shift == ActiveShift::Night
    }

    /// Same schedule with a different active shift.
    pub fn with_active(mut self, active: ActiveShift) -> Self {
        self.active_shift = active;
        self
    }
}
