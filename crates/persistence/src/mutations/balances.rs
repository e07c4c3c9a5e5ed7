// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Balance row writes.
//!
//! Updates are optimistic: the row is matched on both id and the version
//! that was read, and the version is incremented. No match means another
//! writer got there first.

use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::{MysqlConnection, SqliteConnection};
use leave_ledger_domain::LeaveBalance;
use time::OffsetDateTime;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{BalanceValues, StoredBalance};
use crate::diesel_schema::leave_balances;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a new balance row at version 0.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `balance` - The balance to store
/// * `now` - Timestamp recorded on the row
///
/// # Errors
///
/// Returns an error if a stored component is negative, if a concurrent
/// writer inserted the same key (`Transient`), or if the insert fails.
pub fn insert_balance(
    conn: &mut _,
    balance: &LeaveBalance,
    now: OffsetDateTime,
) -> Result<StoredBalance, PersistenceError> {
    balance.validate()?;
    let values: BalanceValues = BalanceValues::from_domain(balance, 0, now)?;

    diesel::insert_into(leave_balances::table)
        .values(&values)
        .execute(conn)
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                PersistenceError::Transient(format!(
                    "balance {} created concurrently: {}",
                    balance.key,
                    info.message()
                ))
            }
            other => PersistenceError::from(other),
        })?;

    let balance_id: i64 = conn.get_last_insert_rowid()?;
    debug!(balance_id, key = %balance.key, "Materialized balance");

    Ok(StoredBalance {
        balance_id,
        version: 0,
        balance: balance.clone(),
    })
}
}

backend_fn! {
/// Writes new components over a stored balance.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `stored` - The balance as read, supplying id and expected version
/// * `balance` - The new components
/// * `now` - Timestamp recorded on the row
///
/// # Errors
///
/// Returns `PersistenceError::VersionConflict` if the row changed since it
/// was read, or an error if a component is negative or the update fails.
pub fn update_balance(
    conn: &mut _,
    stored: &StoredBalance,
    balance: &LeaveBalance,
    now: OffsetDateTime,
) -> Result<StoredBalance, PersistenceError> {
    balance.validate()?;
    let next_version: i64 = stored.version + 1;
    let values: BalanceValues = BalanceValues::from_domain(balance, next_version, now)?;

    let updated: usize = diesel::update(leave_balances::table)
        .filter(leave_balances::balance_id.eq(stored.balance_id))
        .filter(leave_balances::version.eq(stored.version))
        .set(&values)
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::VersionConflict {
            table: "leave_balances",
            id: stored.balance_id,
        });
    }

    debug!(
        balance_id = stored.balance_id,
        version = next_version,
        pending = %balance.pending_days,
        used = %balance.used_days,
        "Updated balance"
    );

    Ok(StoredBalance {
        balance_id: stored.balance_id,
        version: next_version,
        balance: balance.clone(),
    })
}
}
