//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! policy from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::LeaveType;

use super::types::{EngineConfig, HolidayCalendar, HolidaySeed};

/// Loads and provides access to engine policy.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── policy.yaml     # Leave defaults and dashboard settings
/// └── holidays.yaml   # Optional holiday calendar to seed
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
/// use attendance_engine::models::LeaveType;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Casual allowance: {}", loader.default_allowance(LeaveType::Casual));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
    holidays: Vec<HolidaySeed>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// `policy.yaml` is required; `holidays.yaml` is optional.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - `policy.yaml` is missing
    /// - Any file contains invalid YAML
    /// - The policy contains a negative allowance or a zero activity limit
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let config = Self::load_yaml::<EngineConfig>(&path.join("policy.yaml"))?;
        Self::validate(&config, &path.join("policy.yaml"))?;

        let holidays_path = path.join("holidays.yaml");
        let holidays = if holidays_path.exists() {
            Self::load_yaml::<HolidayCalendar>(&holidays_path)?.holidays
        } else {
            Vec::new()
        };

        Ok(Self { config, holidays })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            config,
            holidays: Vec::new(),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(config: &EngineConfig, path: &Path) -> EngineResult<()> {
        for leave_type in LeaveType::ALL {
            if config.leave.defaults.for_type(leave_type) < Decimal::ZERO {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!("{} allowance must not be negative", leave_type),
                });
            }
        }
        if config.dashboard.recent_activity_limit == 0 {
            return Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: "recent_activity_limit must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the holiday calendar to seed, possibly empty.
    pub fn holidays(&self) -> &[HolidaySeed] {
        &self.holidays
    }

    /// Gets the policy default allowance for a leave type.
    pub fn default_allowance(&self, leave_type: LeaveType) -> Decimal {
        self.config.leave.defaults.for_type(leave_type)
    }

    /// Gets the number of entries kept in the dashboard activity feed.
    pub fn recent_activity_limit(&self) -> usize {
        self.config.dashboard.recent_activity_limit
    }
}
