// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opening and tuning `SQLite` ledger databases.
//!
//! A ledger file is shared by every worker process on the host, so a
//! connection is only handed out after it has:
//!
//! 1. A busy timeout, so a writer queues behind the current lock holder
//! 2. Foreign keys switched on (`SQLite` leaves them off per connection)
//! 3. The embedded schema applied
//! 4. WAL journaling when it is backed by a file, letting readers run
//!    beside the single writer
//!
//! `PRAGMA` has no Diesel DSL, which is why the statements below are raw.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Ledger schema in `SQLite` dialect.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Where the database lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// A private in-memory database; WAL does not apply.
    Memory,
    /// A file shared with other connections.
    File,
}

#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

fn pragma(conn: &mut SqliteConnection, statement: &str) -> Result<(), PersistenceError> {
    diesel::sql_query(format!("PRAGMA {statement}"))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("PRAGMA {statement}: {e}")))?;
    Ok(())
}

/// Connects to `database_url` and prepares it for ledger use.
///
/// # Arguments
///
/// * `database_url` - A file path or an SQLite `file:` URI
/// * `busy_timeout_ms` - How long a writer waits for the database lock
/// * `storage` - Whether the database is a shared file
///
/// # Errors
///
/// Returns an error if the connection, a `PRAGMA` or a migration fails, or
/// if foreign keys are still off afterwards.
pub fn open(
    database_url: &str,
    busy_timeout_ms: u32,
    storage: Storage,
) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, ?storage, "Opening SQLite ledger");
    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;

    // Before migrating: another process may be migrating the same file.
    pragma(&mut conn, &format!("busy_timeout = {busy_timeout_ms}"))?;
    pragma(&mut conn, "foreign_keys = ON")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    if storage == Storage::File {
        pragma(&mut conn, "journal_mode = WAL")?;
    }
    verify_foreign_key_enforcement(&mut conn)?;
    Ok(conn)
}

/// Row id assigned by the connection's most recent insert.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Fails with `ForeignKeyEnforcementNotEnabled` unless `PRAGMA foreign_keys`
/// reports it on.
///
/// # Errors
///
/// Returns an error if the check fails or enforcement is off.
pub fn verify_foreign_key_enforcement(
    conn: &mut SqliteConnection,
) -> Result<(), PersistenceError> {
    let row: ForeignKeysPragma = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;
    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    debug!("SQLite foreign keys enforced");
    Ok(())
}
