//! Configuration management module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::engine::time::{ClockTime, parse_time};
use crate::models::shift::{ShiftConfig, ShiftWindow};

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub shift: ShiftConfig,
    #[serde(default)]
    pub alerts: AlertPolicy,
    #[serde(default)]
    pub work: WorkPolicy,
}

/// Alert thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertPolicy {
    /// Consecutive absent days that raise an alert (default: 3).
    pub absence_streak_days: u32,
    /// Check-ins after this clock time count toward the lateness alert (default: 09:30).
    ///
    /// Independent of the shift late threshold.
    pub lateness_cutoff: String,
    /// Trailing window for the lateness alert in days (default: 30).
    pub lateness_lookback_days: u32,
    /// Late check-ins within the window that raise an alert (default: 5).
    pub lateness_min_count: u32,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            absence_streak_days: 3,
            lateness_cutoff: "09:30".to_string(),
            lateness_lookback_days: 30,
            lateness_min_count: 5,
        }
    }
}

impl AlertPolicy {
    /// Parsed lateness cutoff, falling back to 09:30 when malformed.
    pub fn cutoff(&self) -> ClockTime {
        parse_time(&self.lateness_cutoff).unwrap_or(ClockTime { hour: 9, minute: 30 })
    }
}

/// Working-day policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkPolicy {
    /// Standard working minutes per day; anything beyond is overtime (default: 480).
    pub standard_minutes: u32,
}

impl Default for WorkPolicy {
    fn default() -> Self {
        Self { standard_minutes: 480 }
    }
}

impl AppConfig {
    /// Get config file path in the platform config directory.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "attendance-engine")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => ConfigLoadResult::Loaded(config),
                Err(e) => ConfigLoadResult::Invalid(e),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Parse and validate TOML content.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str::<AppConfig>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Shift thresholds are only checked for plausibility and logged; the
    /// classifier applies whatever schedule it is given.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alerts.absence_streak_days < 2 {
            return Err(ConfigError::Validation(
                "Absence streak must be at least 2 days".to_string(),
            ));
        }
        if self.alerts.lateness_lookback_days < 1 {
            return Err(ConfigError::Validation(
                "Lateness lookback must be at least 1 day".to_string(),
            ));
        }
        if self.alerts.lateness_min_count < 1 {
            return Err(ConfigError::Validation(
                "Lateness alert count must be at least 1".to_string(),
            ));
        }
        if parse_time(&self.alerts.lateness_cutoff).is_none() {
            return Err(ConfigError::Validation(format!(
                "Invalid lateness cutoff: {}",
                self.alerts.lateness_cutoff
            )));
        }
        if self.work.standard_minutes == 0 {
            return Err(ConfigError::Validation(
                "Standard working minutes must be greater than 0".to_string(),
            ));
        }

        check_shift_window("day_shift", &self.shift.day_shift, false);
        check_shift_window("night_shift", &self.shift.night_shift, true);
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Log shift windows that will not classify the way they read.
fn check_shift_window(name: &str, window: &ShiftWindow, overnight: bool) {
    let fields = [
        ("start_time", &window.start_time),
        ("end_time", &window.end_time),
        ("late_threshold", &window.late_threshold),
        ("half_day_threshold", &window.half_day_threshold),
    ];
    for (field, value) in fields {
        if parse_time(value).is_none() {
            warn!("{name}.{field} is not a valid clock time: {value:?}");
        }
    }

    let align = |t: ClockTime| {
        if overnight && t.is_before_noon() {
            t.minutes() + 24 * 60
        } else {
            t.minutes()
        }
    };
    if let (Some(late), Some(half)) = (parse_time(&window.late_threshold), parse_time(&window.half_day_threshold))
        && align(half) <= align(late)
    {
        warn!(
            "{name}: half-day threshold {} is not after late threshold {}",
            window.half_day_threshold, window.late_threshold
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shift::ActiveShift;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml() {
        let content = r#"
            [shift]
            active_shift = "night"

            [shift.day_shift]
            start_time = "08:00"
            end_time = "17:00"
            late_threshold = "08:10"
            half_day_threshold = "12:00"

            [alerts]
            lateness_min_count = 3

            [work]
            standard_minutes = 450
        "#;
        let config = AppConfig::from_toml(content).unwrap();
        assert_eq!(config.shift.active_shift, ActiveShift::Night);
        assert_eq!(config.shift.day_shift.late_threshold, "08:10");
        assert_eq!(config.shift.night_shift, ShiftWindow::default_night());
        assert_eq!(config.alerts.lateness_min_count, 3);
        assert_eq!(config.alerts.absence_streak_days, 3);
        assert_eq!(config.work.standard_minutes, 450);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_threshold_is_accepted() {
        let mut config = AppConfig::default();
        config.shift.day_shift.late_threshold = "nine".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_alert_bounds() {
        let mut config = AppConfig::default();
        config.alerts.absence_streak_days = 1;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.alerts.lateness_cutoff = "half past nine".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.work.standard_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_alert_cutoff_fallback() {
        let policy = AlertPolicy {
            lateness_cutoff: "bogus".to_string(),
            ..AlertPolicy::default()
        };
        assert_eq!(policy.cutoff(), ClockTime { hour: 9, minute: 30 });
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("attendance-engine-config-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut config = AppConfig::default();
        config.shift.active_shift = ActiveShift::Night;
        config.save(&path).unwrap();

        match AppConfig::try_load(&path) {
            ConfigLoadResult::Loaded(loaded) => assert_eq!(loaded, config),
            other => panic!("unexpected load result: {other:?}"),
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("definitely/not/here/config.toml");
        assert!(matches!(AppConfig::try_load(path), ConfigLoadResult::Missing));
    }
}
