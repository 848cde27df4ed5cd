//! Core data models for the Attendance & Leave Accounting Engine.
//!
//! This module contains all the domain records and views used throughout the engine.

mod attendance;
mod dashboard;
mod employee;
mod leave;
mod user;

pub use attendance::{
    AttendanceAdminRecord, AttendanceFilter, AttendanceRecord, AttendanceReportRow,
    AttendanceStatus,
};
pub use dashboard::{ActivityType, DashboardActivity, DashboardSummary};
pub use employee::{Employee, EmployeeInput, EmployeeSummary};
pub use leave::{
    Holiday, LeaveAllowance, LeaveApplication, LeaveBalance, LeaveRequest, LeaveStatus, LeaveType,
};
pub use user::{Caller, Role, User};
