// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave request status and the workflow transition table.
//!
//! Every permitted status change, together with its effect on the balance
//! ledger, is listed once in `TRANSITIONS`. Callers never branch on status
//! themselves; they ask the table.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision. Days are reserved as pending.
    Pending,
    /// Approved. Days are committed as used.
    Approved,
    /// The leave period has started.
    InProgress,
    /// The leave period has ended.
    Completed,
    /// Refused by an approver.
    Rejected,
    /// Withdrawn before it started.
    Cancelled,
}

impl LeaveStatus {
    /// Statuses that hold dates and take part in overlap detection.
    pub const ACTIVE: [Self; 3] = [Self::Pending, Self::Approved, Self::InProgress];

    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected | Self::Cancelled)
    }

    /// Returns true if the request still occupies its dates.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved | Self::InProgress)
    }

    /// Returns true if the request has been approved and its days still
    /// count as used.
    #[must_use]
    pub const fn was_approved(&self) -> bool {
        matches!(self, Self::Approved | Self::InProgress | Self::Completed)
    }

    /// Looks up the transition for `action` from this status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the table has no
    /// entry for this status and action.
    pub fn transition(self, action: LeaveAction) -> Result<Transition, DomainError> {
        TRANSITIONS
            .iter()
            .find(|t| t.from == self && t.action == action)
            .copied()
            .ok_or_else(|| DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                action: action.as_str().to_string(),
                reason: if self.is_terminal() {
                    String::from("request is in a terminal state")
                } else {
                    String::from("transition not permitted by the workflow")
                },
            })
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LeaveStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidLeaveStatus {
                status: s.to_string(),
            }),
        }
    }
}

/// Workflow actions applied to an existing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveAction {
    Approve,
    Reject,
    Cancel,
    Begin,
    Complete,
}

impl LeaveAction {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
            Self::Begin => "begin",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for LeaveAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LeaveAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            "cancel" => Ok(Self::Cancel),
            "begin" => Ok(Self::Begin),
            "complete" => Ok(Self::Complete),
            _ => Err(DomainError::InvalidLeaveAction {
                action: s.to_string(),
            }),
        }
    }
}

/// What a transition does to the balance ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEffect {
    /// No ledger change.
    None,
    /// Add the request's days to `pending`.
    Reserve,
    /// Move the request's days from `pending` to `used`.
    CommitUsed,
    /// Remove the request's days from `pending`.
    ReleasePending,
    /// Remove the request's days from `used`.
    ReverseUsed,
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: LeaveStatus,
    pub action: LeaveAction,
    pub to: LeaveStatus,
    pub effect: LedgerEffect,
}

const fn row(
    from: LeaveStatus,
    action: LeaveAction,
    to: LeaveStatus,
    effect: LedgerEffect,
) -> Transition {
    Transition {
        from,
        action,
        to,
        effect,
    }
}

/// The complete workflow. Creation (→ `Pending`, `Reserve`) is not an
/// action on an existing request and so is not listed.
pub const TRANSITIONS: [Transition; 6] = [
    row(
        LeaveStatus::Pending,
        LeaveAction::Approve,
        LeaveStatus::Approved,
        LedgerEffect::CommitUsed,
    ),
    row(
        LeaveStatus::Pending,
        LeaveAction::Reject,
        LeaveStatus::Rejected,
        LedgerEffect::ReleasePending,
    ),
    row(
        LeaveStatus::Pending,
        LeaveAction::Cancel,
        LeaveStatus::Cancelled,
        LedgerEffect::ReleasePending,
    ),
    row(
        LeaveStatus::Approved,
        LeaveAction::Cancel,
        LeaveStatus::Cancelled,
        LedgerEffect::ReverseUsed,
    ),
    row(
        LeaveStatus::Approved,
        LeaveAction::Begin,
        LeaveStatus::InProgress,
        LedgerEffect::None,
    ),
    row(
        LeaveStatus::InProgress,
        LeaveAction::Complete,
        LeaveStatus::Completed,
        LedgerEffect::None,
    ),
];
