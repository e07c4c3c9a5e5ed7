// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_ledger_domain::{
    BalanceKey, Days, DepartmentId, Leave, LeaveDraft, LeaveStatus, LeaveType, LedgerEffect,
    ReservationOutcome,
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// Inputs a transition needs besides the request and the actor.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    /// The request's leave type.
    pub leave_type: &'a LeaveType,
    /// The request owner's department, if the directory knows it.
    pub owner_department: Option<DepartmentId>,
    /// The business date the step is evaluated against.
    pub today: Date,
    /// Timestamp recorded on the updated request.
    pub now: OffsetDateTime,
}

/// The result of a successful transition.
///
/// Transitions are atomic: the caller persists `leave` and applies `effect`
/// to the request's balance in one transaction, or neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionResult {
    /// The request after the transition.
    pub leave: Leave,
    /// The status before the transition.
    pub previous_status: LeaveStatus,
    /// What to do to the balance.
    pub effect: LedgerEffect,
    /// Days the effect applies to.
    pub days: Days,
    /// The requester should be told about the decision.
    pub notify_requester: bool,
    /// The requester's manager should be alerted.
    pub notify_manager: bool,
}

/// Everything needed to persist a new request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationPlan {
    /// The validated request.
    pub draft: LeaveDraft,
    /// Ledger effects to apply in order.
    pub effects: Vec<LedgerEffect>,
    /// Status of the stored request.
    pub status: LeaveStatus,
    /// How the reservation affects the balance.
    pub reservation: ReservationOutcome,
    /// The manager should be alerted immediately.
    pub notify_manager: bool,
}

impl CreationPlan {
    /// Whether the request is approved without a decision.
    #[must_use]
    pub fn is_auto_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }
}

/// Everything needed to persist an edit of a pending request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePlan {
    /// The request with its new dates and details.
    pub leave: Leave,
    /// Balance and days to release.
    pub release: (BalanceKey, Days),
    /// Balance and days to reserve.
    pub reserve: (BalanceKey, Days),
    /// How the new reservation affects its balance.
    pub reservation: ReservationOutcome,
}
