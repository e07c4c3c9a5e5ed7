// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Periodic accrual and year-end carry-over arithmetic.
//!
//! Both operations are written so that re-running them with the same input
//! leaves the balance unchanged:
//! - accrual stamps `last_accrual_date` and refuses to run again within a period
//! - carry-over produces an absolute amount that is written, never added

use crate::balance::LeaveBalance;
use crate::leave_type::LeaveTypeRules;
use crate::types::Days;
use serde::{Deserialize, Serialize};
use time::Date;

/// Default length of one accrual period in days.
pub const DEFAULT_ACCRUAL_PERIOD_DAYS: u32 = 30;

/// How often accrual is credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualPolicy {
    /// Minimum number of days between two accruals on the same balance.
    pub period_days: u32,
}

impl Default for AccrualPolicy {
    fn default() -> Self {
        Self {
            period_days: DEFAULT_ACCRUAL_PERIOD_DAYS,
        }
    }
}

impl AccrualPolicy {
    /// Whether `balance` should accrue for a run with the given cutoff.
    ///
    /// A balance accrues if it is active, belongs to the cutoff's year, has
    /// a positive accrual rate, and either never accrued or last accrued
    /// more than one period before the cutoff.
    #[must_use]
    pub fn is_due(&self, balance: &LeaveBalance, cutoff: Date) -> bool {
        if !balance.is_active
            || balance.key.year != cutoff.year()
            || !balance.monthly_accrual.is_positive()
        {
            return false;
        }
        match balance.last_accrual_date {
            None => true,
            Some(last) => (cutoff - last).whole_days() > i64::from(self.period_days),
        }
    }

    /// Credits one period of accrual if due.
    ///
    /// Returns the credited amount, or `None` when nothing was due.
    pub fn apply(&self, balance: &mut LeaveBalance, cutoff: Date) -> Option<Days> {
        if !self.is_due(balance, cutoff) {
            return None;
        }
        let amount = balance.monthly_accrual;
        balance.accrued_to_date += amount;
        balance.last_accrual_date = Some(cutoff);
        Some(amount)
    }
}

/// The amount the next year's balance should carry from `balance`.
///
/// Returns `None` when the type does not carry over, nothing remains, or
/// the cap is zero.
#[must_use]
pub fn carry_over_amount(balance: &LeaveBalance, rules: &LeaveTypeRules) -> Option<Days> {
    let cap = rules.carry_over_cap()?;
    let remaining = balance.remaining_days();
    if !balance.is_active || !remaining.is_positive() {
        return None;
    }
    let amount = remaining.min(cap);
    amount.is_positive().then_some(amount)
}
