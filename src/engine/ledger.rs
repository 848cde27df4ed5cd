//! Leave ledger: allowance lookup, consumption accounting, balances.
//!
//! Balances are never stored. They are derived on every call from the
//! allowance overrides and the full request history, so approving or
//! rejecting a request needs no separate ledger update.

use rust_decimal::Decimal;

use crate::config::LeaveDefaults;
use crate::models::{LeaveAllowance, LeaveBalance, LeaveRequest, LeaveType};

/// A read-only view over allowances and requests for computing balances.
///
/// # Example
///
/// ```
/// use attendance_engine::config::LeaveDefaults;
/// use attendance_engine::engine::LeaveLedger;
/// use attendance_engine::models::LeaveType;
/// use rust_decimal::Decimal;
///
/// let defaults = LeaveDefaults::default();
/// let ledger = LeaveLedger::new(&defaults, &[], &[]);
/// assert_eq!(ledger.remaining("emp_1", LeaveType::Casual), Decimal::new(12, 0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LeaveLedger<'a> {
    defaults: &'a LeaveDefaults,
    allowances: &'a [LeaveAllowance],
    requests: &'a [LeaveRequest],
}

impl<'a> LeaveLedger<'a> {
    /// Creates a ledger view.
    pub fn new(
        defaults: &'a LeaveDefaults,
        allowances: &'a [LeaveAllowance],
        requests: &'a [LeaveRequest],
    ) -> Self {
        Self {
            defaults,
            allowances,
            requests,
        }
    }

    /// The employee's override for `leave_type`, else the policy default.
    pub fn total_allowance(&self, employee_id: &str, leave_type: LeaveType) -> Decimal {
        self.allowances
            .iter()
            .find(|a| a.employee_id == employee_id && a.leave_type == leave_type)
            .map(|a| a.total)
            .unwrap_or_else(|| self.defaults.for_type(leave_type))
    }

    /// Days held by the employee's pending and approved requests of `leave_type`.
    pub fn consumed_or_reserved(&self, employee_id: &str, leave_type: LeaveType) -> Decimal {
        self.requests
            .iter()
            .filter(|r| {
                r.employee_id == employee_id && r.leave_type == leave_type && r.status.holds_days()
            })
            .map(|r| r.total_days)
            .sum()
    }

    /// `max(0, total_allowance - consumed_or_reserved)`.
    pub fn remaining(&self, employee_id: &str, leave_type: LeaveType) -> Decimal {
        let remaining = self.total_allowance(employee_id, leave_type)
            - self.consumed_or_reserved(employee_id, leave_type);
        remaining.max(Decimal::ZERO)
    }

    /// The full balance row for one leave type.
    pub fn balance(&self, employee_id: &str, leave_type: LeaveType) -> LeaveBalance {
        LeaveBalance {
            leave_type,
            total: self.total_allowance(employee_id, leave_type),
            used: self.consumed_or_reserved(employee_id, leave_type),
            remaining: self.remaining(employee_id, leave_type),
        }
    }

    /// Balance rows for every leave type, casual first.
    pub fn balances(&self, employee_id: &str) -> Vec<LeaveBalance> {
        LeaveType::ALL
            .iter()
            .map(|t| self.balance(employee_id, *t))
            .collect()
    }
}
