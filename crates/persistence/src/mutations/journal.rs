// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{NewLedgerEntry, format_timestamp};
use crate::diesel_schema::ledger_entries;
use crate::error::PersistenceError;

backend_fn! {
/// Appends one journal row.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_ledger_entry(conn: &mut _, entry: &NewLedgerEntry) -> Result<(), PersistenceError> {
    debug!(
        balance_id = entry.balance_id,
        kind = entry.kind.as_str(),
        days = %entry.days,
        "Journaling ledger entry"
    );

    diesel::insert_into(ledger_entries::table)
        .values((
            ledger_entries::balance_id.eq(entry.balance_id),
            ledger_entries::leave_id.eq(entry.leave_id.map(|id| id.value())),
            ledger_entries::kind.eq(entry.kind.as_str()),
            ledger_entries::days.eq(entry.days.to_string()),
            ledger_entries::reason.eq(entry.reason.as_deref()),
            ledger_entries::recorded_at.eq(format_timestamp(entry.recorded_at)?),
        ))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("insert_ledger_entry: {e}")))?;

    Ok(())
}
}
