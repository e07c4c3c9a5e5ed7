// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::{LedgerEntry, LedgerEntryRow};
use crate::diesel_schema::ledger_entries;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves the journal of one balance in write order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_ledger_entries(
    conn: &mut _,
    balance_id: i64,
) -> Result<Vec<LedgerEntry>, PersistenceError> {
    let rows: Vec<LedgerEntryRow> = ledger_entries::table
        .filter(ledger_entries::balance_id.eq(balance_id))
        .order(ledger_entries::entry_id.asc())
        .select(LedgerEntryRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_ledger_entries: {e}")))?;

    rows.into_iter().map(LedgerEntryRow::into_domain).collect()
}
}
