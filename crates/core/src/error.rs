// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_ledger_domain::{Days, DomainError, Leave, LeaveStatus};

/// Errors that can occur while planning or applying a workflow step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The requested dates overlap existing active requests of the same person.
    OverlapConflict {
        /// The conflicting requests.
        conflicts: Vec<Leave>,
    },
    /// The action is not allowed from the current status.
    InvalidTransition {
        /// The current status.
        from: LeaveStatus,
        /// The attempted action.
        action: String,
        /// Why the action was refused.
        reason: String,
    },
    /// The actor may not perform the action.
    Unauthorized {
        /// The attempted action.
        action: String,
        /// Why the actor was refused.
        reason: String,
    },
    /// Strict balance checking refused a reservation.
    InsufficientBalance {
        /// Days requested.
        requested: Days,
        /// Days available before the request.
        available: Days,
        /// The annual cap, if the refusal came from it.
        annual_cap: Option<Days>,
    },
    /// The leave type no longer accepts requests.
    LeaveTypeInactive {
        /// The leave type name.
        leave_type: String,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::OverlapConflict { conflicts } => {
                let ids: Vec<String> = conflicts.iter().map(|l| l.id.to_string()).collect();
                write!(
                    f,
                    "Requested dates overlap existing leave request(s): {}",
                    ids.join(", ")
                )
            }
            Self::InvalidTransition {
                from,
                action,
                reason,
            } => write!(f, "Cannot {action} a {from} leave request: {reason}"),
            Self::Unauthorized { action, reason } => {
                write!(f, "Not authorized to {action}: {reason}")
            }
            Self::InsufficientBalance {
                requested,
                available,
                annual_cap,
            } => match annual_cap {
                Some(cap) => write!(
                    f,
                    "Requesting {requested} days would exceed the annual cap of {cap} days"
                ),
                None => write!(
                    f,
                    "Requesting {requested} days exceeds the available {available} days"
                ),
            },
            Self::LeaveTypeInactive { leave_type } => {
                write!(f, "Leave type '{leave_type}' is not active")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
