//! Employee directory model and related types.
//!
//! This module defines the [`Employee`] record together with the compact
//! [`EmployeeSummary`] view embedded in admin listings and the dashboard feed.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents an employee in the organization's directory.
///
/// Attendance records and leave requests refer to employees by `id` only;
/// deleting an employee does not cascade to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee. Assigned by the store when empty.
    #[serde(default)]
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email, unique across the directory.
    pub email: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Job title.
    #[serde(default)]
    pub position: String,
    /// Department the employee belongs to.
    #[serde(default)]
    pub department: String,
    /// Salary, kept for directory display only.
    #[serde(default)]
    pub salary: Decimal,
    /// The login linked to this employee profile, if one was created.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Inactive employees are excluded from dashboard attendance metrics.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// The date the employee joined.
    #[serde(default = "today")]
    pub joining_date: NaiveDate,
}

fn default_active() -> bool {
    true
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl Employee {
    /// Returns "First Last", trimmed when either part is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::{Employee, EmployeeInput};
    /// use chrono::NaiveDate;
    ///
    /// let input = EmployeeInput {
    ///     first_name: "Ada".to_string(),
    ///     last_name: "Lovelace".to_string(),
    ///     email: "ada@example.com".to_string(),
    ///     phone: String::new(),
    ///     position: "Engineer".to_string(),
    ///     department: "R&D".to_string(),
    ///     salary: Default::default(),
    /// };
    /// let employee = Employee::from_input(input, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    /// assert_eq!(employee.full_name(), "Ada Lovelace");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Builds a new, unsaved employee from directory input.
    pub fn from_input(input: EmployeeInput, joining_date: NaiveDate) -> Self {
        Self {
            id: String::new(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            position: input.position,
            department: input.department,
            salary: input.salary,
            user_id: None,
            is_active: true,
            joining_date,
        }
    }

    /// Overwrites the editable directory fields, leaving identity and links intact.
    pub fn apply_input(&mut self, input: EmployeeInput) {
        self.first_name = input.first_name;
        self.last_name = input.last_name;
        self.email = input.email;
        self.phone = input.phone;
        self.position = input.position;
        self.department = input.department;
        self.salary = input.salary;
    }

    /// Returns the compact view used in listings and activity feeds.
    pub fn summary(&self) -> EmployeeSummary {
        EmployeeSummary {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            department: self.department.clone(),
            position: self.position.clone(),
        }
    }
}

/// Directory fields accepted when creating or updating an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeInput {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Job title.
    pub position: String,
    /// Department.
    pub department: String,
    /// Salary.
    #[serde(default)]
    pub salary: Decimal,
}

/// Compact employee view attached to attendance listings and dashboard entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    /// Employee identifier.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Department.
    pub department: String,
    /// Job title.
    pub position: String,
}
