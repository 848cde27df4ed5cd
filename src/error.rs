//! Error types for the Attendance & Leave Accounting Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition an engine operation can reject.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::LeaveStatus;
use crate::store::StoreError;

/// The main error type for the engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::NoOpenPunch {
///     employee_id: "emp_001".to_string(),
/// };
/// assert_eq!(error.to_string(), "No active punch-in found for employee emp_001");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A date range or month did not describe a valid span.
    #[error("Invalid range: {message}")]
    InvalidRange {
        /// A description of what made the range invalid.
        message: String,
    },

    /// A leave range contained no working days.
    #[error("Range {start} to {end} contains no working days (weekends/holidays only)")]
    EmptyRange {
        /// First day of the requested range.
        start: NaiveDate,
        /// Last day of the requested range.
        end: NaiveDate,
    },

    /// A leave request overlaps an existing pending or approved request.
    #[error("Leave dates conflict with existing leave request {conflicting_id}")]
    DateConflict {
        /// The request the new range collides with.
        conflicting_id: String,
    },

    /// The requested working days exceed the remaining allowance.
    #[error("Insufficient {leave_type} leave balance: requested {requested}, remaining {remaining}")]
    InsufficientBalance {
        /// The leave type being requested.
        leave_type: String,
        /// Working days requested.
        requested: Decimal,
        /// Days still available before the request.
        remaining: Decimal,
    },

    /// A punch-in was attempted while an open record exists.
    #[error("Employee {employee_id} is already punched in")]
    AlreadyOpen {
        /// The employee holding the open record.
        employee_id: String,
    },

    /// A punch-out was attempted with no open record for today.
    #[error("No active punch-in found for employee {employee_id}")]
    NoOpenPunch {
        /// The employee without an open record.
        employee_id: String,
    },

    /// A referenced record does not exist or does not belong to the caller.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record (e.g. "Leave request").
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// A lifecycle transition was attempted from a terminal state.
    #[error("Only pending leave requests can be {action}; request {leave_id} is {status}")]
    InvalidTransition {
        /// The request being transitioned.
        leave_id: String,
        /// The attempted action ("approved", "rejected", "cancelled").
        action: &'static str,
        /// The current status of the request.
        status: LeaveStatus,
    },

    /// The caller's role does not permit the operation.
    #[error("Role '{role}' is not permitted to {operation}")]
    Unauthorized {
        /// The caller's role.
        role: String,
        /// The operation that was refused.
        operation: &'static str,
    },

    /// Caller input was incomplete or malformed.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// The record store failed to read or write a collection.
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    /// The blocking task running an operation panicked or was cancelled.
    #[error("Engine task failed: {message}")]
    TaskFailed {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
