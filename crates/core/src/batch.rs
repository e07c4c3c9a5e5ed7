// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Planners for the scheduled batch processors.
//!
//! Each planner looks at one row and says what, if anything, should change.
//! The persistence layer re-runs the planner inside the row's transaction so
//! that concurrent or repeated runs converge on the same result.

use crate::command::Command;
use leave_ledger_domain::{
    AccrualPolicy, BalanceKey, Days, Leave, LeaveBalance, LeaveStatus, LeaveTypeRules,
    carry_over_amount,
};
use serde::{Deserialize, Serialize};
use time::Date;

/// Summary of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Rows looked at.
    pub examined: usize,
    /// Rows changed.
    pub updated: usize,
    /// Rows left alone.
    pub skipped: usize,
}

impl BatchReport {
    /// Records one changed row.
    pub const fn record_updated(&mut self) {
        self.examined += 1;
        self.updated += 1;
    }

    /// Records one untouched row.
    pub const fn record_skipped(&mut self) {
        self.examined += 1;
        self.skipped += 1;
    }

    /// Records one row, changed or not.
    pub const fn record(&mut self, changed: bool) {
        if changed {
            self.record_updated();
        } else {
            self.record_skipped();
        }
    }

    /// Combines two reports.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            examined: self.examined + other.examined,
            updated: self.updated + other.updated,
            skipped: self.skipped + other.skipped,
        }
    }
}

impl std::fmt::Display for BatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "examined={} updated={} skipped={}",
            self.examined, self.updated, self.skipped
        )
    }
}

/// Credits accrual on a balance if due.
///
/// Returns the credited amount.
pub fn plan_accrual(
    balance: &mut LeaveBalance,
    cutoff: Date,
    policy: &AccrualPolicy,
) -> Option<Days> {
    policy.apply(balance, cutoff)
}

/// A write to the following year's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryOverPlan {
    /// The balance to create or update.
    pub target: BalanceKey,
    /// The absolute carried-over amount to store.
    pub amount: Days,
    /// Accrual rate for a newly created target balance.
    pub monthly_accrual: Days,
}

/// Decides what `source` carries into the next year.
#[must_use]
pub fn plan_carry_over(source: &LeaveBalance, rules: &LeaveTypeRules) -> Option<CarryOverPlan> {
    carry_over_amount(source, rules).map(|amount| CarryOverPlan {
        target: source.key.next_year(),
        amount,
        monthly_accrual: source.monthly_accrual,
    })
}

/// One automatic status step and the business date to evaluate it at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceStep {
    /// The command to apply as the system actor.
    pub command: Command,
    /// The date the step is evaluated against.
    pub effective: Date,
}

/// The automatic status steps due for `leave` on `today`.
///
/// An approved request that has already ended is begun on its last day and
/// completed today, so it passes through `InProgress`.
#[must_use]
pub fn plan_status_advance(leave: &Leave, today: Date) -> Vec<AdvanceStep> {
    let start = leave.range.start();
    let end = leave.range.end();
    match leave.status {
        LeaveStatus::Approved if start <= today => {
            let mut steps = vec![AdvanceStep {
                command: Command::Begin,
                effective: today.min(end),
            }];
            if today > end {
                steps.push(AdvanceStep {
                    command: Command::Complete,
                    effective: today,
                });
            }
            steps
        }
        LeaveStatus::InProgress if today > end => vec![AdvanceStep {
            command: Command::Complete,
            effective: today,
        }],
        _ => Vec::new(),
    }
}
