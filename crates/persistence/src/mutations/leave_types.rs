// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave type mutations.

use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::{MysqlConnection, SqliteConnection};
use leave_ledger_domain::{LeaveType, LeaveTypeId, LeaveTypeRules};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::LeaveTypeValues;
use crate::diesel_schema::leave_types;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a new leave type.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `name` - The display name, unique
/// * `rules` - The type's rules
/// * `is_active` - Whether new requests may use the type
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateLeaveType` if the name is taken, or
/// an error if the insert fails.
pub fn insert_leave_type(
    conn: &mut _,
    name: &str,
    rules: &LeaveTypeRules,
    is_active: bool,
) -> Result<LeaveType, PersistenceError> {
    let values: LeaveTypeValues = LeaveTypeValues::from_domain(name, rules, is_active)?;

    diesel::insert_into(leave_types::table)
        .values(&values)
        .execute(conn)
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                PersistenceError::DuplicateLeaveType(name.to_string())
            }
            other => PersistenceError::from(other),
        })?;

    let leave_type_id: i64 = conn.get_last_insert_rowid()?;
    info!(leave_type_id, name, "Registered leave type");

    Ok(LeaveType {
        id: LeaveTypeId::new(leave_type_id),
        name: name.to_string(),
        rules: rules.clone(),
        is_active,
    })
}
}

backend_fn! {
/// Activates or retires a leave type.
///
/// # Errors
///
/// Returns `PersistenceError::LeaveTypeNotFound` if no row matches, or an
/// error if the update fails.
pub fn set_leave_type_active(
    conn: &mut _,
    leave_type_id: LeaveTypeId,
    is_active: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(leave_types::table)
        .filter(leave_types::leave_type_id.eq(leave_type_id.value()))
        .set(leave_types::is_active.eq(i32::from(is_active)))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::LeaveTypeNotFound(format!("id {leave_type_id}")));
    }

    info!(leave_type_id = leave_type_id.value(), is_active, "Updated leave type activity");
    Ok(())
}
}
