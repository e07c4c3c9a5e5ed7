// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_ledger_domain::LeaveAction;
use serde::{Deserialize, Serialize};

/// A workflow command against an existing leave request.
///
/// Commands are data only. They are applied with `apply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    /// Approve a pending request.
    Approve {
        /// Optional remarks recorded with the approval.
        notes: Option<String>,
    },
    /// Reject a pending request.
    Reject {
        /// Why the request was rejected. Must not be blank.
        reason: String,
    },
    /// Cancel a pending or approved request.
    Cancel {
        /// Optional cancellation reason.
        reason: Option<String>,
    },
    /// Mark an approved request as started.
    Begin,
    /// Mark a started request as finished.
    Complete,
}

impl Command {
    /// The workflow action this command performs.
    #[must_use]
    pub const fn action(&self) -> LeaveAction {
        match self {
            Self::Approve { .. } => LeaveAction::Approve,
            Self::Reject { .. } => LeaveAction::Reject,
            Self::Cancel { .. } => LeaveAction::Cancel,
            Self::Begin => LeaveAction::Begin,
            Self::Complete => LeaveAction::Complete,
        }
    }
}
