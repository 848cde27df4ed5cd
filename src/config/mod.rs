//! Configuration loading and management for the engine.
//!
//! This module loads leave policy and dashboard settings from YAML files,
//! plus an optional holiday calendar, and reads server settings from the
//! environment.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Feed length: {}", config.recent_activity_limit());
//! ```

mod loader;
mod settings;
mod types;

pub use loader::ConfigLoader;
pub use settings::ServerSettings;
pub use types::{
    DashboardPolicy, EngineConfig, HolidayCalendar, HolidaySeed, LeaveDefaults, LeavePolicy,
};
