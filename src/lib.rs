//! Attendance & Leave Accounting Engine
//!
//! This crate tracks employee punch-in/punch-out attendance, derives leave
//! balances from request history, drives the leave request lifecycle, and
//! aggregates organization-wide dashboard metrics.
//!
//! # Example
//!
//! ```
//! use attendance_engine::config::ConfigLoader;
//! use attendance_engine::engine::Engine;
//! use attendance_engine::store::MemoryStore;
//!
//! let engine = Engine::new(MemoryStore::new(), ConfigLoader::default());
//! assert_eq!(engine.config().recent_activity_limit(), 10);
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;
