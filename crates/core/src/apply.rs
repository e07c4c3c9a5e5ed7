// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::actor::Actor;
use crate::command::Command;
use crate::error::CoreError;
use crate::state::{TransitionContext, TransitionResult};
use leave_ledger_domain::{
    ApprovalRecord, CancellationRecord, DomainError, Leave, LeaveAction, LeaveStatus, Transition,
    validate_text,
};

/// Applies a workflow command to a request, producing the updated request
/// and the ledger effect to apply with it.
///
/// # Arguments
///
/// * `leave` - The stored request (immutable)
/// * `command` - The command to apply
/// * `actor` - Who is performing the step
/// * `ctx` - Leave type, owner department and clock readings
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new request and its ledger effect
/// * `Err(CoreError)` if the command is refused
///
/// # Errors
///
/// Returns an error if:
/// - The transition table has no entry for the current status and action
/// - The actor lacks authority for the action
/// - A date precondition of the action does not hold
/// - A required reason is blank
pub fn apply(
    leave: &Leave,
    command: Command,
    actor: &Actor,
    ctx: &TransitionContext<'_>,
) -> Result<TransitionResult, CoreError> {
    let action = command.action();
    let transition = lookup(leave.status, action)?;

    let mut updated = leave.clone();
    updated.status = transition.to;
    updated.updated_at = ctx.now;

    let mut notify_requester = false;
    let mut notify_manager = false;

    match command {
        Command::Approve { notes } => {
            require_decision_authority(leave, actor, ctx, action)?;
            if actor.is(leave.person_id) {
                return Err(CoreError::Unauthorized {
                    action: action.to_string(),
                    reason: String::from("approvers cannot approve their own requests"),
                });
            }
            updated.approval = Some(ApprovalRecord {
                approved_by: actor.person_id(),
                approved_at: ctx.now,
                notes: notes.filter(|n| !n.trim().is_empty()),
            });
            notify_requester = true;
        }
        Command::Reject { reason } => {
            require_decision_authority(leave, actor, ctx, action)?;
            let reason = validate_text("rejection_reason", &reason)?;
            updated.rejection_reason = Some(reason.to_string());
            notify_requester = true;
        }
        Command::Cancel { reason } => {
            let is_requester = actor.is(leave.person_id);
            if !is_requester && !actor.may_decide_for(leave.person_id, ctx.owner_department) {
                return Err(CoreError::Unauthorized {
                    action: action.to_string(),
                    reason: format!(
                        "{} is neither the requester nor an approver for person {}",
                        actor.label(),
                        leave.person_id
                    ),
                });
            }
            if leave.status == LeaveStatus::Approved && ctx.today >= leave.range.start() {
                return Err(CoreError::InvalidTransition {
                    from: leave.status,
                    action: action.to_string(),
                    reason: format!("leave already started on {}", leave.range.start()),
                });
            }
            let Some(cancelled_by) = actor.person_id() else {
                return Err(CoreError::Unauthorized {
                    action: action.to_string(),
                    reason: String::from("cancellation must be performed by a person"),
                });
            };
            updated.cancellation = Some(CancellationRecord {
                cancelled_by,
                reason: reason.filter(|r| !r.trim().is_empty()),
                cancelled_at: ctx.now,
            });
            notify_requester = !is_requester;
            notify_manager = is_requester && leave.status == LeaveStatus::Approved;
        }
        Command::Begin => {
            if !leave.range.contains(ctx.today) {
                return Err(CoreError::InvalidTransition {
                    from: leave.status,
                    action: action.to_string(),
                    reason: format!("{} is outside {}", ctx.today, leave.range),
                });
            }
        }
        Command::Complete => {
            if ctx.today <= leave.range.end() {
                return Err(CoreError::InvalidTransition {
                    from: leave.status,
                    action: action.to_string(),
                    reason: format!("leave runs until {}", leave.range.end()),
                });
            }
        }
    }

    Ok(TransitionResult {
        leave: updated,
        previous_status: leave.status,
        effect: transition.effect,
        days: leave.total_days,
        notify_requester,
        notify_manager,
    })
}

fn lookup(status: LeaveStatus, action: LeaveAction) -> Result<Transition, CoreError> {
    status.transition(action).map_err(|err| match err {
        DomainError::InvalidStatusTransition { reason, .. } => CoreError::InvalidTransition {
            from: status,
            action: action.to_string(),
            reason,
        },
        other => CoreError::DomainViolation(other),
    })
}

fn require_decision_authority(
    leave: &Leave,
    actor: &Actor,
    ctx: &TransitionContext<'_>,
    action: LeaveAction,
) -> Result<(), CoreError> {
    if actor.may_decide_for(leave.person_id, ctx.owner_department) {
        return Ok(());
    }
    Err(CoreError::Unauthorized {
        action: action.to_string(),
        reason: format!(
            "{} has no approval authority over person {}",
            actor.label(),
            leave.person_id
        ),
    })
}
