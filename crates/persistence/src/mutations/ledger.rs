// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Balance ledger operations.
//!
//! Each function reads the balance, applies one domain operation, writes it
//! back under the version check and appends a journal row. Callers run them
//! inside a write transaction; any error rolls the whole operation back.

use leave_ledger::check_reservation;
use leave_ledger_domain::{
    BalanceKey, Days, LeaveBalance, LeaveId, LedgerEffect, ReservationOutcome, validate_text,
    validate_year,
};
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::data_models::{LedgerEntryKind, NewLedgerEntry, StoredBalance};
use crate::error::PersistenceError;
use crate::store::LedgerConnection;

/// Loads a balance that must exist.
///
/// # Errors
///
/// Returns `PersistenceError::BalanceNotFound` if it has not been materialized.
pub fn load_balance<C: LedgerConnection>(
    conn: &mut C,
    key: BalanceKey,
) -> Result<StoredBalance, PersistenceError> {
    conn.find_balance(key)?
        .ok_or(PersistenceError::BalanceNotFound(key))
}

/// Loads a balance, materializing an empty one if absent.
///
/// # Errors
///
/// Returns an error if the year is out of range or the store fails.
pub fn load_or_create_balance<C: LedgerConnection>(
    conn: &mut C,
    key: BalanceKey,
    now: OffsetDateTime,
) -> Result<StoredBalance, PersistenceError> {
    if let Some(stored) = conn.find_balance(key)? {
        return Ok(stored);
    }
    validate_year(key.year)?;
    conn.get_leave_type(key.leave_type_id)?;
    conn.insert_balance(&LeaveBalance::zero(key), now)
}

/// Writes `balance` over `stored` and journals the change.
fn write_and_journal<C: LedgerConnection>(
    conn: &mut C,
    stored: &StoredBalance,
    balance: &LeaveBalance,
    entry: JournalLine,
    now: OffsetDateTime,
) -> Result<StoredBalance, PersistenceError> {
    let written: StoredBalance = conn.update_balance(stored, balance, now)?;
    conn.insert_ledger_entry(&NewLedgerEntry {
        balance_id: written.balance_id,
        leave_id: entry.leave_id,
        kind: entry.kind,
        days: entry.days,
        reason: entry.reason,
        recorded_at: now,
    })?;
    Ok(written)
}

/// What justifies a balance change in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification<'a> {
    /// The change follows a request's workflow step.
    Leave(LeaveId),
    /// The change was made directly, with a written reason.
    Reason(&'a str),
}

struct JournalLine {
    kind: LedgerEntryKind,
    days: Days,
    leave_id: Option<LeaveId>,
    reason: Option<String>,
}

impl JournalLine {
    fn justified(kind: LedgerEntryKind, days: Days, justification: Justification<'_>) -> Self {
        let (leave_id, reason) = match justification {
            Justification::Leave(leave_id) => (Some(leave_id), None),
            Justification::Reason(reason) => (None, Some(reason.to_string())),
        };
        Self {
            kind,
            days,
            leave_id,
            reason,
        }
    }
}

/// Applies a workflow ledger effect to the balance at `key`.
///
/// `Reserve` materializes the balance if needed; the other effects require
/// it to exist. `LedgerEffect::None` does nothing.
///
/// # Arguments
///
/// * `conn` - The connection, inside a write transaction
/// * `key` - The balance to change
/// * `effect` - What to do
/// * `days` - How many days
/// * `justification` - The request or reason behind the change
/// * `annual_cap` - The leave type's yearly cap, reported on reservations
/// * `now` - Timestamp recorded on the row and journal
///
/// # Returns
///
/// The balance after the change, or `None` for `LedgerEffect::None`.
///
/// # Errors
///
/// Returns an error if the balance is missing, the change would underflow
/// `pending` or `used`, a direct change has a blank reason, or the store
/// fails.
pub fn apply_effect<C: LedgerConnection>(
    conn: &mut C,
    key: BalanceKey,
    effect: LedgerEffect,
    days: Days,
    justification: Justification<'_>,
    annual_cap: Option<Days>,
    now: OffsetDateTime,
) -> Result<Option<StoredBalance>, PersistenceError> {
    let justification = match justification {
        Justification::Reason(reason) => Justification::Reason(validate_text("reason", reason)?),
        leave @ Justification::Leave(_) => leave,
    };
    let stored: StoredBalance = match effect {
        LedgerEffect::None => return Ok(None),
        LedgerEffect::Reserve => load_or_create_balance(conn, key, now)?,
        LedgerEffect::CommitUsed | LedgerEffect::ReleasePending | LedgerEffect::ReverseUsed => {
            load_balance(conn, key)?
        }
    };

    let mut balance: LeaveBalance = stored.balance.clone();
    let line: JournalLine = match effect {
        LedgerEffect::Reserve => {
            balance.reserve(days, annual_cap)?;
            JournalLine::justified(LedgerEntryKind::Reserve, days, justification)
        }
        LedgerEffect::CommitUsed => {
            balance.commit_used(days)?;
            JournalLine::justified(LedgerEntryKind::CommitUsed, days, justification)
        }
        LedgerEffect::ReleasePending => {
            balance.release_pending(days)?;
            JournalLine::justified(LedgerEntryKind::ReleasePending, -days, justification)
        }
        LedgerEffect::ReverseUsed => {
            balance.reverse_used(days)?;
            JournalLine::justified(LedgerEntryKind::ReverseUsed, -days, justification)
        }
        LedgerEffect::None => return Ok(None),
    };

    let written: StoredBalance = write_and_journal(conn, &stored, &balance, line, now)?;
    if written.balance.is_overused() {
        info!(
            key = %key,
            available = %written.balance.available_days(),
            "Balance is overused"
        );
    }
    Ok(Some(written))
}

/// Reserves days directly against a balance, outside any request.
///
/// # Arguments
///
/// * `conn` - The connection, inside a write transaction
/// * `key` - The balance to reserve against
/// * `days` - How many days
/// * `reason` - Why the days are held, recorded in the journal
/// * `strict_balance` - Refuse reservations that overdraw or exceed the annual cap
/// * `now` - Timestamp recorded on the row and journal
///
/// # Errors
///
/// Returns an error if `days` is not positive, the reason is blank, strict
/// checking refuses the reservation, or the store fails.
pub fn reserve<C: LedgerConnection>(
    conn: &mut C,
    key: BalanceKey,
    days: Days,
    reason: &str,
    strict_balance: bool,
    now: OffsetDateTime,
) -> Result<(StoredBalance, ReservationOutcome), PersistenceError> {
    let leave_type = conn.get_leave_type(key.leave_type_id)?;
    let stored: StoredBalance = load_or_create_balance(conn, key, now)?;
    let outcome: ReservationOutcome =
        check_reservation(&stored.balance, days, &leave_type, strict_balance)?;

    let written: Option<StoredBalance> = apply_effect(
        conn,
        key,
        LedgerEffect::Reserve,
        days,
        Justification::Reason(reason),
        leave_type.rules.annual_cap(),
        now,
    )?;
    let written: StoredBalance = written.ok_or(PersistenceError::BalanceNotFound(key))?;
    Ok((written, outcome))
}

/// Sets the annual grant and accrual rate of a balance.
///
/// # Errors
///
/// Returns an error if either value is negative or the store fails.
pub fn allocate<C: LedgerConnection>(
    conn: &mut C,
    key: BalanceKey,
    allocated: Days,
    monthly_accrual: Days,
    now: OffsetDateTime,
) -> Result<StoredBalance, PersistenceError> {
    let stored: StoredBalance = load_or_create_balance(conn, key, now)?;
    let mut balance: LeaveBalance = stored.balance.clone();
    balance.allocate(allocated, monthly_accrual)?;

    let line = JournalLine {
        kind: LedgerEntryKind::Allocation,
        days: allocated - stored.balance.allocated_days,
        leave_id: None,
        reason: Some(format!("allocated {allocated}, accruing {monthly_accrual}/period")),
    };
    let written: StoredBalance = write_and_journal(conn, &stored, &balance, line, now)?;
    info!(%key, %allocated, %monthly_accrual, "Allocated balance");
    Ok(written)
}

/// Adds a signed HR correction to a balance.
///
/// # Errors
///
/// Returns an error if the reason is blank or the store fails.
pub fn apply_manual_adjustment<C: LedgerConnection>(
    conn: &mut C,
    key: BalanceKey,
    delta: Days,
    reason: &str,
    on: Date,
    now: OffsetDateTime,
) -> Result<StoredBalance, PersistenceError> {
    let stored: StoredBalance = load_or_create_balance(conn, key, now)?;
    let mut balance: LeaveBalance = stored.balance.clone();
    balance.apply_manual_adjustment(delta, reason, on)?;

    let line = JournalLine {
        kind: LedgerEntryKind::ManualAdjustment,
        days: delta,
        leave_id: None,
        reason: balance.adjustment_reason.clone(),
    };
    let written: StoredBalance = write_and_journal(conn, &stored, &balance, line, now)?;
    info!(%key, %delta, "Applied manual adjustment");
    Ok(written)
}

/// Marks a balance inactive. Its history is kept.
///
/// # Errors
///
/// Returns `PersistenceError::BalanceNotFound` if absent, or an error if
/// the store fails.
pub fn deactivate<C: LedgerConnection>(
    conn: &mut C,
    key: BalanceKey,
    now: OffsetDateTime,
) -> Result<StoredBalance, PersistenceError> {
    let stored: StoredBalance = load_balance(conn, key)?;
    if !stored.balance.is_active {
        return Ok(stored);
    }
    let mut balance: LeaveBalance = stored.balance.clone();
    balance.is_active = false;
    let written: StoredBalance = conn.update_balance(&stored, &balance, now)?;
    info!(%key, "Deactivated balance");
    Ok(written)
}
