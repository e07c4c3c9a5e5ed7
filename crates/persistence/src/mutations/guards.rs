// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-person write guard.
//!
//! Every request create or edit bumps the owner's guard row first. Two
//! writers for the same person then serialize on that row, so the second
//! one's overlap check sees the first one's insert.

use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::{MysqlConnection, SqliteConnection};
use leave_ledger_domain::PersonId;
use tracing::debug;

use crate::diesel_schema::leave_person_guards;
use crate::error::PersistenceError;

backend_fn! {
/// Increments the guard version of a person, creating the row if needed.
///
/// # Returns
///
/// The new guard version.
///
/// # Errors
///
/// Returns `PersistenceError::Transient` if a concurrent writer created the
/// row first, or an error if the write fails.
pub fn bump_person_guard(conn: &mut _, person_id: PersonId) -> Result<i64, PersistenceError> {
    let updated: usize = diesel::update(leave_person_guards::table)
        .filter(leave_person_guards::person_id.eq(person_id.value()))
        .set(leave_person_guards::version.eq(leave_person_guards::version + 1))
        .execute(conn)?;

    if updated == 0 {
        diesel::insert_into(leave_person_guards::table)
            .values((
                leave_person_guards::person_id.eq(person_id.value()),
                leave_person_guards::version.eq(1_i64),
            ))
            .execute(conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                    PersistenceError::Transient(format!(
                        "person guard for {person_id} created concurrently: {}",
                        info.message()
                    ))
                }
                other => PersistenceError::from(other),
            })?;
    }

    let version: i64 = leave_person_guards::table
        .filter(leave_person_guards::person_id.eq(person_id.value()))
        .select(leave_person_guards::version)
        .first(conn)?;

    debug!(person_id = person_id.value(), version, "Bumped person guard");
    Ok(version)
}
}
