// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Planning of request creation and edits.
//!
//! The store loads the candidate overlapping requests and the affected
//! balance inside its transaction and hands them here. The functions in
//! this module decide; they never write.

use crate::actor::Actor;
use crate::error::CoreError;
use crate::state::{CreationPlan, UpdatePlan};
use leave_ledger_domain::{
    Days, Leave, LeaveBalance, LeaveDraft, LeaveId, LeaveStatus, LeaveType, LedgerEffect,
    ReservationOutcome,
};
use time::OffsetDateTime;

/// Returns the requests among `candidates` that conflict with `draft`.
///
/// A conflict is an active request of the same person whose range overlaps
/// the draft's inclusive range. `exclude` skips the request being edited.
#[must_use]
pub fn find_conflicts(
    draft: &LeaveDraft,
    candidates: &[Leave],
    exclude: Option<LeaveId>,
) -> Vec<Leave> {
    candidates
        .iter()
        .filter(|l| Some(l.id) != exclude)
        .filter(|l| l.person_id == draft.person_id)
        .filter(|l| l.is_active())
        .filter(|l| l.range.overlaps(&draft.range))
        .cloned()
        .collect()
}

/// Plans the creation of a new request.
///
/// # Arguments
///
/// * `draft` - The validated request
/// * `leave_type` - The requested leave type
/// * `candidates` - Stored requests that may overlap the draft
/// * `balance` - The balance the request draws from, as currently stored
/// * `strict_balance` - Refuse reservations that overdraw or exceed the annual cap
///
/// # Errors
///
/// Returns an error if:
/// - The leave type is inactive
/// - The draft overlaps an active request of the same person
/// - Strict balance checking refuses the reservation
pub fn plan_creation(
    draft: LeaveDraft,
    leave_type: &LeaveType,
    candidates: &[Leave],
    balance: &LeaveBalance,
    strict_balance: bool,
) -> Result<CreationPlan, CoreError> {
    if !leave_type.is_active {
        return Err(CoreError::LeaveTypeInactive {
            leave_type: leave_type.name.clone(),
        });
    }

    let conflicts = find_conflicts(&draft, candidates, None);
    if !conflicts.is_empty() {
        return Err(CoreError::OverlapConflict { conflicts });
    }

    let reservation = check_reservation(balance, draft.total_days, leave_type, strict_balance)?;

    let (status, effects) = if leave_type.rules.requires_approval {
        (LeaveStatus::Pending, vec![LedgerEffect::Reserve])
    } else {
        (
            LeaveStatus::Approved,
            vec![LedgerEffect::Reserve, LedgerEffect::CommitUsed],
        )
    };
    let notify_manager = draft.details.is_urgent;

    Ok(CreationPlan {
        draft,
        effects,
        status,
        reservation,
        notify_manager,
    })
}

/// Plans an edit of a pending request.
///
/// # Arguments
///
/// * `existing` - The stored request
/// * `draft` - The validated replacement
/// * `actor` - Who is editing
/// * `leave_type` - The replacement's leave type
/// * `candidates` - Stored requests that may overlap the replacement
/// * `target_balance` - The balance the replacement draws from, as stored
/// * `strict_balance` - Refuse reservations that overdraw or exceed the annual cap
/// * `now` - Timestamp recorded on the request
///
/// # Errors
///
/// Returns an error if:
/// - The request is not pending
/// - The actor is not the requester
/// - The replacement changes the owner
/// - Any check of `plan_creation` fails
#[allow(clippy::too_many_arguments)]
pub fn plan_update(
    existing: &Leave,
    draft: LeaveDraft,
    actor: &Actor,
    leave_type: &LeaveType,
    candidates: &[Leave],
    target_balance: &LeaveBalance,
    strict_balance: bool,
    now: OffsetDateTime,
) -> Result<UpdatePlan, CoreError> {
    if existing.status != LeaveStatus::Pending {
        return Err(CoreError::InvalidTransition {
            from: existing.status,
            action: String::from("update"),
            reason: String::from("only pending requests can be edited"),
        });
    }
    if !actor.is(existing.person_id) {
        return Err(CoreError::Unauthorized {
            action: String::from("update"),
            reason: format!("{} does not own leave {}", actor.label(), existing.id),
        });
    }
    if draft.person_id != existing.person_id {
        return Err(CoreError::Unauthorized {
            action: String::from("update"),
            reason: String::from("a request cannot be moved to another person"),
        });
    }
    if !leave_type.is_active {
        return Err(CoreError::LeaveTypeInactive {
            leave_type: leave_type.name.clone(),
        });
    }

    let conflicts = find_conflicts(&draft, candidates, Some(existing.id));
    if !conflicts.is_empty() {
        return Err(CoreError::OverlapConflict { conflicts });
    }

    // The release happens first when both sides hit the same balance.
    let release_key = existing.balance_key();
    let reserve_key = draft.balance_key();
    let mut projected = target_balance.clone();
    if release_key == reserve_key {
        projected.release_pending(existing.total_days)?;
    }
    let reservation = check_reservation(&projected, draft.total_days, leave_type, strict_balance)?;

    let mut leave = existing.clone();
    leave.leave_type_id = draft.leave_type_id;
    leave.range = draft.range;
    leave.total_days = draft.total_days;
    leave.balance_year = reserve_key.year;
    leave.details = draft.details;
    leave.updated_at = now;

    Ok(UpdatePlan {
        leave,
        release: (release_key, existing.total_days),
        reserve: (reserve_key, draft.total_days),
        reservation,
    })
}

/// Previews a reservation and applies strict balance checking.
///
/// # Errors
///
/// Returns `CoreError::InsufficientBalance` in strict mode when the
/// reservation would overdraw the balance or exceed the type's annual cap,
/// or a domain error if `days` is not positive.
pub fn check_reservation(
    balance: &LeaveBalance,
    days: Days,
    leave_type: &LeaveType,
    strict_balance: bool,
) -> Result<ReservationOutcome, CoreError> {
    let annual_cap = leave_type.rules.annual_cap();
    let outcome = balance.preview_reservation(days, annual_cap)?;
    if strict_balance && outcome.exceeds_annual_cap {
        return Err(CoreError::InsufficientBalance {
            requested: days,
            available: balance.available_days(),
            annual_cap,
        });
    }
    if strict_balance && outcome.overdrawn {
        return Err(CoreError::InsufficientBalance {
            requested: days,
            available: balance.available_days(),
            annual_cap: None,
        });
    }
    Ok(outcome)
}
