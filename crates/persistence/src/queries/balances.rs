// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Balance queries.
//!
//! Balances are addressed by their natural key (person, leave type, year).
//! The surrogate `balance_id` is only used to link journal rows.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use leave_ledger_domain::BalanceKey;
use tracing::debug;

use crate::data_models::{BalanceRow, StoredBalance};
use crate::diesel_schema::leave_balances;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves the balance for a key, if one has been materialized.
///
/// Inactive balances are returned too; callers decide what to do with them.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `key` - Person, leave type and year
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be reconstructed.
pub fn find_balance(
    conn: &mut _,
    key: BalanceKey,
) -> Result<Option<StoredBalance>, PersistenceError> {
    debug!(%key, "Looking up balance");

    let row: Option<BalanceRow> = leave_balances::table
        .filter(leave_balances::person_id.eq(key.person_id.value()))
        .filter(leave_balances::leave_type_id.eq(key.leave_type_id.value()))
        .filter(leave_balances::year.eq(key.year))
        .select(BalanceRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_balance: {e}")))?;

    row.map(BalanceRow::into_domain).transpose()
}
}

backend_fn! {
/// Lists the balances of one year ordered by id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `year` - The calendar year
/// * `active_only` - Skip deactivated balances
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_balances_for_year(
    conn: &mut _,
    year: i32,
    active_only: bool,
) -> Result<Vec<StoredBalance>, PersistenceError> {
    let mut query = leave_balances::table
        .filter(leave_balances::year.eq(year))
        .select(BalanceRow::as_select())
        .into_boxed();
    if active_only {
        query = query.filter(leave_balances::is_active.eq(1));
    }

    let rows: Vec<BalanceRow> = query
        .order(leave_balances::balance_id.asc())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_balances_for_year: {e}")))?;

    rows.into_iter().map(BalanceRow::into_domain).collect()
}
}
