//! Leave lifecycle: apply, cancel, approve, reject, and leave queries.
//!
//! A request starts `Pending` and moves exactly once to `Approved`,
//! `Rejected`, or `Cancelled`. Balances are read through [`LeaveLedger`]
//! so a transition never needs a second write.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::Engine;
use super::calendar::{holiday_set, ranges_overlap, working_days};
use super::ledger::LeaveLedger;
use crate::config::HolidaySeed;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Caller, Holiday, LeaveAllowance, LeaveApplication, LeaveBalance, LeaveRequest, LeaveStatus,
    Role,
};
use crate::store::RecordStore;

impl<S: RecordStore> Engine<S> {
    /// Files a leave request for the caller.
    ///
    /// Checks run in order and the first failure wins:
    ///
    /// 1. [`EngineError::InvalidRange`] when start is after end
    /// 2. [`EngineError::EmptyRange`] when the range has no working days
    /// 3. [`EngineError::DateConflict`] when a pending or approved request of
    ///    any type overlaps the range
    /// 4. [`EngineError::InsufficientBalance`] when the working days exceed the
    ///    remaining balance before this request is added
    pub fn apply(
        &self,
        caller: &Caller,
        application: LeaveApplication,
        now: NaiveDateTime,
    ) -> EngineResult<LeaveRequest> {
        caller.require(&[Role::Staff], "apply for leave")?;
        let employee = self.employee_for_user(&caller.user_id)?;

        self.locks.with_lock(&employee.id, || -> EngineResult<_> {
            let holidays = holiday_set(&self.store.get_all::<Holiday>()?);
            let days = working_days(application.start_date, application.end_date, &holidays)?;
            if days.is_empty() {
                return Err(EngineError::EmptyRange {
                    start: application.start_date,
                    end: application.end_date,
                });
            }

            let requests: Vec<LeaveRequest> = self.store.get_all()?;
            if let Some(conflict) = requests.iter().find(|r| {
                r.employee_id == employee.id
                    && r.status.holds_days()
                    && ranges_overlap(
                        r.start_date,
                        r.end_date,
                        application.start_date,
                        application.end_date,
                    )
            }) {
                return Err(EngineError::DateConflict {
                    conflicting_id: conflict.id.clone(),
                });
            }

            let allowances: Vec<LeaveAllowance> = self.store.get_all()?;
            let ledger = LeaveLedger::new(
                &self.config.config().leave.defaults,
                &allowances,
                &requests,
            );
            let requested = Decimal::from(days.len());
            let remaining = ledger.remaining(&employee.id, application.leave_type);
            if requested > remaining {
                return Err(EngineError::InsufficientBalance {
                    leave_type: application.leave_type.to_string(),
                    requested,
                    remaining,
                });
            }

            let request = self.store.add(LeaveRequest {
                id: String::new(),
                employee_id: employee.id.clone(),
                user_id: caller.user_id.clone(),
                leave_type: application.leave_type,
                start_date: application.start_date,
                end_date: application.end_date,
                total_days: requested,
                status: LeaveStatus::Pending,
                reason: application.reason,
                attachment_name: application.attachment_name,
                attachment_base64: application.attachment_base64,
                applied_at: now,
                reviewed_by: None,
                reviewed_at: None,
                review_notes: None,
            })?;

            info!(
                employee_id = %employee.id,
                leave_id = %request.id,
                leave_type = %request.leave_type,
                total_days = %request.total_days,
                "Leave applied"
            );
            Ok(request)
        })
    }

    /// Withdraws one of the caller's pending requests.
    ///
    /// A request owned by someone else is reported as not found.
    pub fn cancel(&self, caller: &Caller, leave_id: &str) -> EngineResult<LeaveRequest> {
        caller.require(&[Role::Staff], "cancel leave")?;
        let employee = self.employee_for_user(&caller.user_id)?;

        self.locks.with_lock(&employee.id, || -> EngineResult<_> {
            let request = self
                .store
                .get_by_id::<LeaveRequest>(leave_id)?
                .filter(|r| r.employee_id == employee.id)
                .ok_or_else(|| leave_not_found(leave_id))?;
            ensure_pending(&request, "cancelled")?;

            let cancelled = self
                .store
                .update::<LeaveRequest, _>(leave_id, |r| r.status = LeaveStatus::Cancelled)?
                .ok_or_else(|| leave_not_found(leave_id))?;
            info!(employee_id = %employee.id, leave_id = %leave_id, "Leave cancelled");
            Ok(cancelled)
        })
    }

    /// Approves a pending request.
    pub fn approve(
        &self,
        caller: &Caller,
        leave_id: &str,
        notes: Option<String>,
        now: NaiveDateTime,
    ) -> EngineResult<LeaveRequest> {
        self.review(caller, leave_id, LeaveStatus::Approved, notes, now)
    }

    /// Rejects a pending request.
    pub fn reject(
        &self,
        caller: &Caller,
        leave_id: &str,
        notes: Option<String>,
        now: NaiveDateTime,
    ) -> EngineResult<LeaveRequest> {
        self.review(caller, leave_id, LeaveStatus::Rejected, notes, now)
    }

    fn review(
        &self,
        caller: &Caller,
        leave_id: &str,
        outcome: LeaveStatus,
        notes: Option<String>,
        now: NaiveDateTime,
    ) -> EngineResult<LeaveRequest> {
        let action = match outcome {
            LeaveStatus::Approved => "approved",
            _ => "rejected",
        };
        caller.require(Role::REVIEWERS, "review leave requests")?;

        let owner = self
            .store
            .get_by_id::<LeaveRequest>(leave_id)?
            .ok_or_else(|| leave_not_found(leave_id))?
            .employee_id;

        self.locks.with_lock(&owner, || -> EngineResult<_> {
            let request = self
                .store
                .get_by_id::<LeaveRequest>(leave_id)?
                .ok_or_else(|| leave_not_found(leave_id))?;
            ensure_pending(&request, action)?;

            let reviewed = self
                .store
                .update::<LeaveRequest, _>(leave_id, |r| {
                    r.status = outcome;
                    r.reviewed_by = Some(caller.user_id.clone());
                    r.reviewed_at = Some(now);
                    r.review_notes = notes;
                })?
                .ok_or_else(|| leave_not_found(leave_id))?;

            info!(
                employee_id = %owner,
                leave_id = %leave_id,
                reviewer = %caller.user_id,
                status = %reviewed.status,
                "Leave reviewed"
            );
            Ok(reviewed)
        })
    }

    /// The caller's requests, newest application first.
    pub fn history(&self, caller: &Caller) -> EngineResult<Vec<LeaveRequest>> {
        caller.require(&[Role::Staff], "view leave history")?;
        let employee = self.employee_for_user(&caller.user_id)?;

        let mut requests: Vec<LeaveRequest> = self
            .store
            .get_all::<LeaveRequest>()?
            .into_iter()
            .filter(|r| r.employee_id == employee.id)
            .collect();
        requests.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(requests)
    }

    /// The caller's balance row per leave type.
    pub fn balances(&self, caller: &Caller) -> EngineResult<Vec<LeaveBalance>> {
        caller.require(&[Role::Staff], "view leave balance")?;
        let employee = self.employee_for_user(&caller.user_id)?;

        let allowances: Vec<LeaveAllowance> = self.store.get_all()?;
        let requests: Vec<LeaveRequest> = self.store.get_all()?;
        let ledger = LeaveLedger::new(
            &self.config.config().leave.defaults,
            &allowances,
            &requests,
        );
        Ok(ledger.balances(&employee.id))
    }

    /// Lists requests across the organization, optionally by status.
    pub fn list_requests(
        &self,
        caller: &Caller,
        status: Option<LeaveStatus>,
    ) -> EngineResult<Vec<LeaveRequest>> {
        caller.require(Role::REVIEWERS, "list leave requests")?;
        let mut requests: Vec<LeaveRequest> = self
            .store
            .get_all::<LeaveRequest>()?
            .into_iter()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .collect();
        requests.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(requests)
    }

    /// Holidays ordered by date.
    pub fn holidays(&self, caller: &Caller) -> EngineResult<Vec<Holiday>> {
        caller.require(Role::ALL, "view holidays")?;
        let mut holidays: Vec<Holiday> = self.store.get_all()?;
        holidays.sort_by_key(|h| h.date);
        Ok(holidays)
    }

    /// Inserts configured holidays whose dates are not stored yet.
    ///
    /// Returns how many were added. Safe to run on every start.
    pub fn seed_holidays(&self, seeds: &[HolidaySeed]) -> EngineResult<usize> {
        let existing = holiday_set(&self.store.get_all::<Holiday>()?);
        let mut added = 0;
        for seed in seeds.iter().filter(|s| !existing.contains(&s.date)) {
            self.store.add(Holiday {
                id: String::new(),
                date: seed.date,
                name: seed.name.clone(),
            })?;
            added += 1;
        }
        if added > 0 {
            info!(added, "Holidays seeded");
        }
        Ok(added)
    }
}

fn leave_not_found(leave_id: &str) -> EngineError {
    EngineError::NotFound {
        entity: "Leave request",
        id: leave_id.to_string(),
    }
}

fn ensure_pending(request: &LeaveRequest, action: &'static str) -> EngineResult<()> {
    if request.status == LeaveStatus::Pending {
        return Ok(());
    }
    warn!(leave_id = %request.id, status = %request.status, action, "Rejected transition");
    Err(EngineError::InvalidTransition {
        leave_id: request.id.clone(),
        action,
        status: request.status,
    })
}
