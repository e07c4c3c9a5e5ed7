// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave type queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use leave_ledger_domain::{LeaveType, LeaveTypeId};
use tracing::debug;

use crate::data_models::LeaveTypeRow;
use crate::diesel_schema::leave_types;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a leave type by id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `leave_type_id` - The leave type id
///
/// # Errors
///
/// Returns `PersistenceError::LeaveTypeNotFound` if no row matches, or an
/// error if the query fails or the row cannot be reconstructed.
pub fn get_leave_type(
    conn: &mut _,
    leave_type_id: LeaveTypeId,
) -> Result<LeaveType, PersistenceError> {
    debug!(leave_type_id = leave_type_id.value(), "Loading leave type");

    let row: Option<LeaveTypeRow> = leave_types::table
        .filter(leave_types::leave_type_id.eq(leave_type_id.value()))
        .select(LeaveTypeRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_leave_type: {e}")))?;

    row.ok_or_else(|| PersistenceError::LeaveTypeNotFound(format!("id {leave_type_id}")))?
        .into_domain()
}
}

backend_fn! {
/// Lists all leave types ordered by id, active or not.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_leave_types(conn: &mut _) -> Result<Vec<LeaveType>, PersistenceError> {
    let rows: Vec<LeaveTypeRow> = leave_types::table
        .order(leave_types::leave_type_id.asc())
        .select(LeaveTypeRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_leave_types: {e}")))?;

    rows.into_iter().map(LeaveTypeRow::into_domain).collect()
}
}
