// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-row steps of the scheduled batches.
//!
//! Each function handles one row inside its own write transaction and
//! re-reads the row before deciding, so repeated or concurrent runs converge:
//! a row that was already processed is reported as unchanged.

use leave_ledger::{
    Actor, AdvanceStep, CarryOverPlan, TransitionContext, TransitionResult, apply, plan_accrual,
    plan_carry_over, plan_status_advance,
};
use leave_ledger_domain::{AccrualPolicy, BalanceKey, Days, LeaveBalance, LeaveId, LeaveType};
use time::{Date, OffsetDateTime};
use tracing::debug;

use crate::data_models::{LedgerEntryKind, NewLedgerEntry, StoredBalance, StoredLeave};
use crate::error::PersistenceError;
use crate::store::LedgerConnection;

/// Credits one accrual period to a balance if it is due at `cutoff`.
///
/// # Returns
///
/// The credited amount, or `None` if nothing was due.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn accrue_balance<C: LedgerConnection>(
    conn: &mut C,
    key: BalanceKey,
    cutoff: Date,
    policy: &AccrualPolicy,
    now: OffsetDateTime,
) -> Result<Option<Days>, PersistenceError> {
    let Some(stored) = conn.find_balance(key)? else {
        return Ok(None);
    };
    let mut balance: LeaveBalance = stored.balance.clone();
    let Some(credited) = plan_accrual(&mut balance, cutoff, policy) else {
        debug!(%key, %cutoff, "Accrual not due");
        return Ok(None);
    };

    let written: StoredBalance = conn.update_balance(&stored, &balance, now)?;
    conn.insert_ledger_entry(&NewLedgerEntry {
        balance_id: written.balance_id,
        leave_id: None,
        kind: LedgerEntryKind::Accrual,
        days: credited,
        reason: Some(format!("accrual through {cutoff}")),
        recorded_at: now,
    })?;
    debug!(%key, %credited, "Accrued");
    Ok(Some(credited))
}

/// Carries the unused remainder of a balance into the following year.
///
/// The target's `carried_over_days` is overwritten, not added to, so running
/// the step twice stores the same value. A target created here inherits the
/// source's accrual rate.
///
/// # Returns
///
/// The carried amount if the target changed, or `None` if nothing carries
/// over or the target already holds that amount.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn carry_over_balance<C: LedgerConnection>(
    conn: &mut C,
    key: BalanceKey,
    now: OffsetDateTime,
) -> Result<Option<Days>, PersistenceError> {
    let Some(source) = conn.find_balance(key)? else {
        return Ok(None);
    };
    let leave_type: LeaveType = conn.get_leave_type(key.leave_type_id)?;
    let Some(plan) = plan_carry_over(&source.balance, &leave_type.rules) else {
        return Ok(None);
    };
    let CarryOverPlan {
        target,
        amount,
        monthly_accrual,
    } = plan;

    let reason: Option<String> = Some(format!("carried over from {}", key.year));
    let (written, delta): (StoredBalance, Days) = match conn.find_balance(target)? {
        Some(existing) => {
            let previous: Days = existing.balance.carried_over_days;
            if previous == amount {
                debug!(%target, %amount, "Carry-over already applied");
                return Ok(None);
            }
            let mut balance: LeaveBalance = existing.balance.clone();
            balance.set_carried_over(amount)?;
            (conn.update_balance(&existing, &balance, now)?, amount - previous)
        }
        None => {
            let mut balance: LeaveBalance = LeaveBalance::zero(target);
            balance.monthly_accrual = monthly_accrual;
            balance.set_carried_over(amount)?;
            (conn.insert_balance(&balance, now)?, amount)
        }
    };

    conn.insert_ledger_entry(&NewLedgerEntry {
        balance_id: written.balance_id,
        leave_id: None,
        kind: LedgerEntryKind::CarryOver,
        days: delta,
        reason,
        recorded_at: now,
    })?;
    debug!(from = %key, to = %target, %amount, "Carried over");
    Ok(Some(amount))
}

/// Applies the automatic status steps due for one request on `today`.
///
/// # Returns
///
/// One transition result per applied step; empty if nothing was due.
///
/// # Errors
///
/// Returns `PersistenceError::LeaveNotFound` if the request vanished, or an
/// error if the workflow refuses a step or the store fails.
pub fn advance_leave<C: LedgerConnection>(
    conn: &mut C,
    leave_id: LeaveId,
    today: Date,
    now: OffsetDateTime,
) -> Result<Vec<TransitionResult>, PersistenceError> {
    let mut stored: StoredLeave = conn
        .find_leave(leave_id)?
        .ok_or(PersistenceError::LeaveNotFound(leave_id))?;
    let steps: Vec<AdvanceStep> = plan_status_advance(&stored.leave, today);
    if steps.is_empty() {
        return Ok(Vec::new());
    }
    let leave_type: LeaveType = conn.get_leave_type(stored.leave.leave_type_id)?;

    let mut results: Vec<TransitionResult> = Vec::with_capacity(steps.len());
    for step in steps {
        let ctx = TransitionContext {
            leave_type: &leave_type,
            owner_department: None,
            today: step.effective,
            now,
        };
        let result: TransitionResult = apply(&stored.leave, step.command, &Actor::System, &ctx)?;
        stored = conn.update_leave(&stored, &result.leave)?;
        debug!(
            leave_id = leave_id.value(),
            from = %result.previous_status,
            to = %result.leave.status,
            "Advanced leave request"
        );
        results.push(result);
    }
    Ok(results)
}
