// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opening `MySQL`/`MariaDB` ledger databases.
//!
//! Deployments where several engine processes on different hosts share one
//! ledger use this backend. Writers serialize on `InnoDB` row locks: the
//! person guard row for request writes and the balance row for ledger
//! writes, with the balance `version` column catching anything that slips
//! past.
//!
//! The schema in `migrations_mysql/` mirrors `migrations/` table for table
//! and constraint for constraint. A migration added to one directory needs
//! its counterpart in the other.
//!
//! Building this module needs the `MySQL` client library (`libmysqlclient`)
//! and `pkg-config`. The tests that talk to a live server are `#[ignore]`d
//! and read the URL from `DATABASE_URL`.

use diesel::dsl::sql;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Ledger schema in `MySQL` dialect.
pub const MYSQL_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations_mysql");

#[derive(QueryableByName)]
struct ForeignKeyChecks {
    #[diesel(sql_type = Integer)]
    fk_checks: i32,
}

/// Connects to `database_url` and applies the embedded schema.
///
/// # Arguments
///
/// * `database_url` - For example `mysql://ledger:secret@db/leave`
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub fn initialize_database(database_url: &str) -> Result<MysqlConnection, PersistenceError> {
    info!("Opening MySQL ledger");
    let mut conn: MysqlConnection = MysqlConnection::establish(database_url)?;
    conn.run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    Ok(conn)
}

/// Auto-increment id produced by the connection's most recent insert.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut MysqlConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("LAST_INSERT_ID()")).get_result(conn)?)
}

/// Fails with `ForeignKeyEnforcementNotEnabled` when the session has
/// `foreign_key_checks` switched off.
///
/// # Errors
///
/// Returns an error if the variable cannot be read or checks are off.
pub fn verify_foreign_key_enforcement(conn: &mut MysqlConnection) -> Result<(), PersistenceError> {
    let row: ForeignKeyChecks = diesel::sql_query("SELECT @@foreign_key_checks AS fk_checks")
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("foreign_key_checks: {e}")))?;
    if row.fk_checks != 1 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    debug!("MySQL foreign keys enforced");
    Ok(())
}
