// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave request row writes.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use leave_ledger_domain::{Leave, LeaveId};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{LeaveValues, StoredLeave};
use crate::diesel_schema::leaves;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a request and returns it with its generated id.
///
/// The `id` field of `leave` is ignored.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_leave(conn: &mut _, leave: &Leave) -> Result<StoredLeave, PersistenceError> {
    let values: LeaveValues = LeaveValues::from_domain(leave, 0)?;

    diesel::insert_into(leaves::table)
        .values(&values)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("insert_leave: {e}")))?;

    let leave_id: i64 = conn.get_last_insert_rowid()?;
    debug!(
        leave_id,
        person_id = leave.person_id.value(),
        status = %leave.status,
        "Inserted leave request"
    );

    let mut stored: Leave = leave.clone();
    stored.id = LeaveId::new(leave_id);
    Ok(StoredLeave {
        leave: stored,
        version: 0,
    })
}
}

backend_fn! {
/// Writes a request over its stored row.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `stored` - The request as read, supplying id and expected version
/// * `leave` - The new contents
///
/// # Errors
///
/// Returns `PersistenceError::VersionConflict` if the row changed since it
/// was read, or an error if the update fails.
pub fn update_leave(
    conn: &mut _,
    stored: &StoredLeave,
    leave: &Leave,
) -> Result<StoredLeave, PersistenceError> {
    let next_version: i64 = stored.version + 1;
    let values: LeaveValues = LeaveValues::from_domain(leave, next_version)?;

    let updated: usize = diesel::update(leaves::table)
        .filter(leaves::leave_id.eq(stored.leave.id.value()))
        .filter(leaves::version.eq(stored.version))
        .set(&values)
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::VersionConflict {
            table: "leaves",
            id: stored.leave.id.value(),
        });
    }

    debug!(
        leave_id = stored.leave.id.value(),
        status = %leave.status,
        version = next_version,
        "Updated leave request"
    );
    Ok(StoredLeave {
        leave: leave.clone(),
        version: next_version,
    })
}
}
