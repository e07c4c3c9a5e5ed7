// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave balance ledger arithmetic.
//!
//! A balance is one row per person, leave type and calendar year. Only the
//! component quantities are stored; `available_days` is always recomputed.
//!
//! Every mutator here either applies fully or leaves the balance untouched.

use crate::error::DomainError;
use crate::types::{BalanceKey, Days};
use serde::{Deserialize, Serialize};
use time::Date;

/// A person's leave budget for one leave type and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// Which person, type and year this balance counts.
    pub key: BalanceKey,
    /// Annual grant.
    pub allocated_days: Days,
    /// Days migrated from the prior year.
    pub carried_over_days: Days,
    /// Accrual rate applied once per accrual period.
    pub monthly_accrual: Days,
    /// Cumulative accrual this year.
    pub accrued_to_date: Days,
    /// Signed HR correction.
    pub manual_adjustment: Days,
    /// Reason recorded with the latest manual adjustment.
    pub adjustment_reason: Option<String>,
    /// Date of the latest manual adjustment.
    pub adjustment_date: Option<Date>,
    /// Days of approved requests.
    pub used_days: Days,
    /// Days of requests awaiting a decision.
    pub pending_days: Days,
    /// Cutoff date of the last applied accrual.
    pub last_accrual_date: Option<Date>,
    /// Deactivated balances are kept but excluded from batch processing.
    pub is_active: bool,
}

/// The result of a reservation against a balance.
///
/// Reservations never fail because of a low balance. The caller decides
/// whether an overdrawn or over-cap reservation is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationOutcome {
    /// Available days after the reservation.
    pub available_after: Days,
    /// The reservation pushed available days below zero.
    pub overdrawn: bool,
    /// Used plus pending now exceeds the leave type's annual cap.
    pub exceeds_annual_cap: bool,
}

impl LeaveBalance {
    /// Creates an empty balance for lazy materialization.
    #[must_use]
    pub const fn zero(key: BalanceKey) -> Self {
        Self {
            key,
            allocated_days: Days::ZERO,
            carried_over_days: Days::ZERO,
            monthly_accrual: Days::ZERO,
            accrued_to_date: Days::ZERO,
            manual_adjustment: Days::ZERO,
            adjustment_reason: None,
            adjustment_date: None,
            used_days: Days::ZERO,
            pending_days: Days::ZERO,
            last_accrual_date: None,
            is_active: true,
        }
    }

    /// Total days granted from all sources.
    #[must_use]
    pub fn entitlement(&self) -> Days {
        self.allocated_days + self.carried_over_days + self.accrued_to_date + self.manual_adjustment
    }

    /// Entitlement minus used and pending days. May be negative.
    #[must_use]
    pub fn available_days(&self) -> Days {
        self.entitlement() - self.used_days - self.pending_days
    }

    /// Same quantity as `available_days`, exposed for reporting.
    #[must_use]
    pub fn remaining_days(&self) -> Days {
        self.available_days()
    }

    /// Whether the balance has been overdrawn.
    #[must_use]
    pub fn is_overused(&self) -> bool {
        self.available_days().is_negative()
    }

    /// Checks that every stored component that must be non-negative is.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NegativeQuantity` naming the first offending field.
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields = [
            ("allocated_days", self.allocated_days),
            ("carried_over_days", self.carried_over_days),
            ("monthly_accrual", self.monthly_accrual),
            ("accrued_to_date", self.accrued_to_date),
            ("used_days", self.used_days),
            ("pending_days", self.pending_days),
        ];
        for (field, value) in fields {
            if value.is_negative() {
                return Err(DomainError::NegativeQuantity { field, value });
            }
        }
        Ok(())
    }

    /// Adds `days` to pending.
    ///
    /// # Arguments
    ///
    /// * `days` - The request length
    /// * `annual_cap` - The leave type's yearly cap, if it has one
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NonPositiveDays` if `days` is not positive.
    pub fn reserve(
        &mut self,
        days: Days,
        annual_cap: Option<Days>,
    ) -> Result<ReservationOutcome, DomainError> {
        let outcome = self.preview_reservation(days, annual_cap)?;
        self.pending_days += days;
        Ok(outcome)
    }

    /// Computes what `reserve` would report without changing the balance.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NonPositiveDays` if `days` is not positive.
    pub fn preview_reservation(
        &self,
        days: Days,
        annual_cap: Option<Days>,
    ) -> Result<ReservationOutcome, DomainError> {
        if !days.is_positive() {
            return Err(DomainError::NonPositiveDays { days });
        }
        let available_after = self.available_days() - days;
        let committed_after = self.used_days + self.pending_days + days;
        Ok(ReservationOutcome {
            available_after,
            overdrawn: available_after.is_negative(),
            exceeds_annual_cap: annual_cap.is_some_and(|cap| committed_after > cap),
        })
    }

    /// Moves `days` from pending to used.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LedgerUnderflow` if fewer than `days` are pending.
    pub fn commit_used(&mut self, days: Days) -> Result<(), DomainError> {
        let pending = checked_decrement("pending_days", self.pending_days, days)?;
        self.pending_days = pending;
        self.used_days += days;
        Ok(())
    }

    /// Removes `days` from pending.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LedgerUnderflow` if fewer than `days` are pending.
    pub fn release_pending(&mut self, days: Days) -> Result<(), DomainError> {
        self.pending_days = checked_decrement("pending_days", self.pending_days, days)?;
        Ok(())
    }

    /// Removes `days` from used.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LedgerUnderflow` if fewer than `days` are used.
    pub fn reverse_used(&mut self, days: Days) -> Result<(), DomainError> {
        self.used_days = checked_decrement("used_days", self.used_days, days)?;
        Ok(())
    }

    /// Adds a signed HR correction and records its reason and date.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyText` if the reason is blank.
    pub fn apply_manual_adjustment(
        &mut self,
        delta: Days,
        reason: &str,
        on: Date,
    ) -> Result<(), DomainError> {
        let reason = crate::validation::validate_text("adjustment_reason", reason)?;
        self.manual_adjustment += delta;
        self.adjustment_reason = Some(reason.to_string());
        self.adjustment_date = Some(on);
        Ok(())
    }

    /// Sets the annual grant and accrual rate.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NegativeQuantity` if either value is negative.
    pub fn allocate(&mut self, allocated: Days, monthly_accrual: Days) -> Result<(), DomainError> {
        if allocated.is_negative() {
            return Err(DomainError::NegativeQuantity {
                field: "allocated_days",
                value: allocated,
            });
        }
        if monthly_accrual.is_negative() {
            return Err(DomainError::NegativeQuantity {
                field: "monthly_accrual",
                value: monthly_accrual,
            });
        }
        self.allocated_days = allocated;
        self.monthly_accrual = monthly_accrual;
        Ok(())
    }

    /// Overwrites the carried-over amount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NegativeQuantity` if `days` is negative.
    pub fn set_carried_over(&mut self, days: Days) -> Result<(), DomainError> {
        if days.is_negative() {
            return Err(DomainError::NegativeQuantity {
                field: "carried_over_days",
                value: days,
            });
        }
        self.carried_over_days = days;
        Ok(())
    }
}

fn checked_decrement(
    field: &'static str,
    current: Days,
    requested: Days,
) -> Result<Days, DomainError> {
    if requested.is_negative() {
        return Err(DomainError::NegativeQuantity {
            field,
            value: requested,
        });
    }
    if requested > current {
        return Err(DomainError::LedgerUnderflow {
            field,
            current,
            requested,
        });
    }
    Ok(current - requested)
}
