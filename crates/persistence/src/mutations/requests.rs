// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request creation, edits and workflow transitions.
//!
//! These functions orchestrate the conflict check, the request row and the
//! ledger inside a single write transaction opened by the caller. Business
//! rejections surface as `PersistenceError::Rejected` and roll everything
//! back.

use leave_ledger::{
    Actor, Command, CreationPlan, TransitionContext, TransitionResult, UpdatePlan, apply,
    plan_creation, plan_update,
};
use leave_ledger_domain::{
    ApprovalRecord, DepartmentId, Leave, LeaveBalance, LeaveDraft, LeaveId, LeaveType,
    LedgerEffect, ReservationOutcome,
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::data_models::{StoredBalance, StoredLeave};
use crate::error::PersistenceError;
use crate::mutations::ledger::{Justification, apply_effect, load_or_create_balance};
use crate::store::LedgerConnection;

/// Note recorded on requests approved without a decision.
pub const AUTO_APPROVAL_NOTE: &str = "approved automatically: leave type does not require approval";

/// Result of persisting a new request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedLeave {
    /// The stored request with its id.
    pub leave: Leave,
    /// How the reservation affected the balance.
    pub reservation: ReservationOutcome,
    /// The balance after all effects.
    pub balance: LeaveBalance,
    /// The manager should be alerted immediately.
    pub notify_manager: bool,
}

/// Result of persisting an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedLeave {
    /// The stored request after the edit.
    pub leave: Leave,
    /// How the new reservation affected its balance.
    pub reservation: ReservationOutcome,
}

fn load_leave<C: LedgerConnection>(
    conn: &mut C,
    leave_id: LeaveId,
) -> Result<StoredLeave, PersistenceError> {
    conn.find_leave(leave_id)?
        .ok_or(PersistenceError::LeaveNotFound(leave_id))
}

/// Persists a validated request.
///
/// Bumps the owner's guard, checks for overlaps against the stored rows,
/// reserves the days and, for types without approval, commits them at once.
///
/// # Arguments
///
/// * `conn` - The connection, inside a write transaction
/// * `draft` - The validated request
/// * `strict_balance` - Refuse reservations that overdraw or exceed the annual cap
/// * `now` - Timestamp recorded on every row
///
/// # Errors
///
/// Returns `PersistenceError::Rejected` for business refusals (inactive
/// type, overlap, strict balance), or an error if the store fails.
pub fn create_leave<C: LedgerConnection>(
    conn: &mut C,
    draft: LeaveDraft,
    strict_balance: bool,
    now: OffsetDateTime,
) -> Result<CreatedLeave, PersistenceError> {
    conn.bump_person_guard(draft.person_id)?;

    let leave_type: LeaveType = conn.get_leave_type(draft.leave_type_id)?;
    let candidates: Vec<Leave> = conn.find_overlapping(draft.person_id, draft.range, None)?;
    let key = draft.balance_key();
    let stored_balance: StoredBalance = load_or_create_balance(conn, key, now)?;

    let plan: CreationPlan = plan_creation(
        draft,
        &leave_type,
        &candidates,
        &stored_balance.balance,
        strict_balance,
    )?;
    let auto_approved: bool = plan.is_auto_approved();

    let mut leave: Leave = Leave::from_draft(LeaveId::new(0), plan.draft.clone(), now);
    leave.status = plan.status;
    if auto_approved {
        leave.approval = Some(ApprovalRecord {
            approved_by: None,
            approved_at: now,
            notes: Some(AUTO_APPROVAL_NOTE.to_string()),
        });
    }
    let stored: StoredLeave = conn.insert_leave(&leave)?;

    let mut balance: LeaveBalance = stored_balance.balance;
    for effect in &plan.effects {
        if let Some(written) = apply_effect(
            conn,
            key,
            *effect,
            stored.leave.total_days,
            Justification::Leave(stored.leave.id),
            leave_type.rules.annual_cap(),
            now,
        )? {
            balance = written.balance;
        }
    }

    info!(
        leave_id = stored.leave.id.value(),
        person_id = stored.leave.person_id.value(),
        days = %stored.leave.total_days,
        status = %stored.leave.status,
        overdrawn = plan.reservation.overdrawn,
        "Created leave request"
    );

    Ok(CreatedLeave {
        leave: stored.leave,
        reservation: plan.reservation,
        balance,
        notify_manager: plan.notify_manager,
    })
}

/// Persists an edit of a pending request.
///
/// The old reservation is released and the new one made in the same
/// transaction, possibly against a different balance.
///
/// # Arguments
///
/// * `conn` - The connection, inside a write transaction
/// * `leave_id` - The request to edit
/// * `draft` - The validated replacement
/// * `actor` - Who is editing
/// * `strict_balance` - Refuse reservations that overdraw or exceed the annual cap
/// * `now` - Timestamp recorded on every row
///
/// # Errors
///
/// Returns `PersistenceError::LeaveNotFound` if the request does not exist,
/// `PersistenceError::Rejected` for business refusals, or an error if the
/// store fails.
pub fn update_leave<C: LedgerConnection>(
    conn: &mut C,
    leave_id: LeaveId,
    draft: LeaveDraft,
    actor: &Actor,
    strict_balance: bool,
    now: OffsetDateTime,
) -> Result<UpdatedLeave, PersistenceError> {
    // The guard comes before any read so the overlap check below sees every
    // request committed by a writer that held it first.
    conn.bump_person_guard(draft.person_id)?;
    let stored: StoredLeave = load_leave(conn, leave_id)?;

    let leave_type: LeaveType = conn.get_leave_type(draft.leave_type_id)?;
    let candidates: Vec<Leave> =
        conn.find_overlapping(draft.person_id, draft.range, Some(leave_id))?;
    let target: StoredBalance = load_or_create_balance(conn, draft.balance_key(), now)?;

    let plan: UpdatePlan = plan_update(
        &stored.leave,
        draft,
        actor,
        &leave_type,
        &candidates,
        &target.balance,
        strict_balance,
        now,
    )?;

    let written: StoredLeave = conn.update_leave(&stored, &plan.leave)?;

    let (release_key, release_days) = plan.release;
    apply_effect(
        conn,
        release_key,
        LedgerEffect::ReleasePending,
        release_days,
        Justification::Leave(leave_id),
        None,
        now,
    )?;
    let (reserve_key, reserve_days) = plan.reserve;
    apply_effect(
        conn,
        reserve_key,
        LedgerEffect::Reserve,
        reserve_days,
        Justification::Leave(leave_id),
        leave_type.rules.annual_cap(),
        now,
    )?;

    info!(
        leave_id = leave_id.value(),
        released = %release_days,
        reserved = %reserve_days,
        "Updated leave request"
    );

    Ok(UpdatedLeave {
        leave: written.leave,
        reservation: plan.reservation,
    })
}

/// Applies a workflow command and its ledger effect.
///
/// # Arguments
///
/// * `conn` - The connection, inside a write transaction
/// * `leave_id` - The request to transition
/// * `command` - The command to apply
/// * `actor` - Who is acting
/// * `owner_department` - The request owner's department, for approver scopes
/// * `today` - The business date the command is evaluated against
/// * `now` - Timestamp recorded on every row
///
/// # Errors
///
/// Returns `PersistenceError::LeaveNotFound` if the request does not exist,
/// `PersistenceError::Rejected` if the workflow refuses the command, or an
/// error if the store fails.
pub fn transition_leave<C: LedgerConnection>(
    conn: &mut C,
    leave_id: LeaveId,
    command: Command,
    actor: &Actor,
    owner_department: Option<DepartmentId>,
    today: Date,
    now: OffsetDateTime,
) -> Result<TransitionResult, PersistenceError> {
    let stored: StoredLeave = load_leave(conn, leave_id)?;
    let leave_type: LeaveType = conn.get_leave_type(stored.leave.leave_type_id)?;

    let ctx = TransitionContext {
        leave_type: &leave_type,
        owner_department,
        today,
        now,
    };
    let result: TransitionResult = apply(&stored.leave, command, actor, &ctx)?;

    conn.update_leave(&stored, &result.leave)?;
    apply_effect(
        conn,
        result.leave.balance_key(),
        result.effect,
        result.days,
        Justification::Leave(leave_id),
        None,
        now,
    )?;

    info!(
        leave_id = leave_id.value(),
        actor = %actor.label(),
        from = %result.previous_status,
        to = %result.leave.status,
        "Transitioned leave request"
    );

    Ok(result)
}
