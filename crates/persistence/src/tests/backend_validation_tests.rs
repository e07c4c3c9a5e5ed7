// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend validation tests for multi-database support.
//!
//! These tests validate that the ledger schema behaves the same on
//! `MariaDB`/`MySQL` as on `SQLite`.
//!
//! ## Test Execution
//!
//! - `SQLite` coverage runs normally via `cargo test`
//! - MariaDB/MySQL tests are marked `#[ignore]` and run with
//!   `cargo test -- --ignored` against a disposable database
//!
//! ## Infrastructure Requirements
//!
//! `MariaDB` tests require:
//! - `DATABASE_URL` pointing at an empty database
//! - `LEAVE_LEDGER_TEST_BACKEND=mariadb`
//!
//! Tests fail fast if required infrastructure is missing.
//!
//! ## What These Tests Validate
//!
//! Schema creation, constraint enforcement (FK, UNIQUE, CHECK) and
//! transaction semantics. Business rules are covered by the `SQLite` suite.

use diesel::MysqlConnection;
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use leave_ledger::{Actor, CoreError};
use leave_ledger_domain::{BalanceKey, Days, PersonId};
use std::env;
use std::sync::{Arc, Barrier};
use std::thread;
use time::macros::{date, datetime};

use super::{create_test_draft, create_test_rules};
use crate::backend::mysql;
use crate::{Persistence, PersistenceError};

/// Result type for COUNT queries.
#[derive(QueryableByName)]
struct CountResult {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Helper to get the `MariaDB` connection URL from environment.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set, indicating missing infrastructure.
fn get_mariadb_url() -> String {
    env::var("DATABASE_URL")
        .expect("DATABASE_URL not set - MariaDB tests need a disposable database")
}

/// Helper to verify we're running in the `MariaDB` test environment.
///
/// # Panics
///
/// Panics if `LEAVE_LEDGER_TEST_BACKEND` is not set to `mariadb`.
fn verify_mariadb_test_environment() {
    let backend = env::var("LEAVE_LEDGER_TEST_BACKEND")
        .expect("LEAVE_LEDGER_TEST_BACKEND not set - MariaDB tests must be opted into");
    assert_eq!(backend, "mariadb", "LEAVE_LEDGER_TEST_BACKEND must be 'mariadb'");
}

#[test]
#[ignore = "requires MariaDB via DATABASE_URL"]
fn test_mariadb_migrations_apply_cleanly() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = mysql::initialize_database(&url);
    assert!(
        result.is_ok(),
        "Failed to initialize MariaDB and run migrations: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via DATABASE_URL"]
fn test_mariadb_foreign_key_enforcement() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    let result = mysql::verify_foreign_key_enforcement(&mut conn);
    assert!(
        result.is_ok(),
        "Foreign key enforcement verification failed: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via DATABASE_URL"]
fn test_mariadb_balance_requires_leave_type() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    let result = diesel::sql_query(
        "INSERT INTO leave_balances (person_id, leave_type_id, year, updated_at)
         VALUES (1, 99999, 2024, '2024-01-01T00:00:00Z')",
    )
    .execute(&mut conn);

    assert!(
        result.is_err(),
        "Balance with non-existent leave type should fail due to foreign key constraint"
    );
}

#[test]
#[ignore = "requires MariaDB via DATABASE_URL"]
fn test_mariadb_leave_status_check_constraint() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    diesel::sql_query("INSERT INTO leave_types (name) VALUES ('check-constraint-type')")
        .execute(&mut conn)
        .expect("Failed to insert leave type");

    let result = diesel::sql_query(
        "INSERT INTO leaves
         (person_id, leave_type_id, start_date, end_date, total_days, balance_year,
          reason, status, request_date, updated_at)
         SELECT 1, leave_type_id, '2024-06-03', '2024-06-07', '5', 2024,
                'trip', 'on_hold', '2024-05-01T00:00:00Z', '2024-05-01T00:00:00Z'
         FROM leave_types WHERE name = 'check-constraint-type'",
    )
    .execute(&mut conn);

    assert!(
        result.is_err(),
        "Unknown status should fail due to CHECK constraint"
    );
}

#[test]
#[ignore = "requires MariaDB via DATABASE_URL"]
fn test_mariadb_transaction_rollback() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    conn.begin_test_transaction()
        .expect("Failed to begin transaction");

    diesel::sql_query("INSERT INTO leave_types (name) VALUES ('rollback-type')")
        .execute(&mut conn)
        .expect("Failed to insert leave type");

    let count: i64 = diesel::sql_query(
        "SELECT COUNT(*) as count FROM leave_types WHERE name = 'rollback-type'",
    )
    .get_result::<CountResult>(&mut conn)
    .map(|r| r.count)
    .expect("Failed to count leave types");

    assert_eq!(count, 1, "Leave type should exist within transaction");

    // Transaction will rollback when conn is dropped (test transaction mode)
    drop(conn);

    let mut new_conn = mysql::initialize_database(&url).expect("Failed to reconnect to MariaDB");

    let count_after: i64 = diesel::sql_query(
        "SELECT COUNT(*) as count FROM leave_types WHERE name = 'rollback-type'",
    )
    .get_result::<CountResult>(&mut new_conn)
    .map(|r| r.count)
    .expect("Failed to count leave types after rollback");

    assert_eq!(
        count_after, 0,
        "Leave type should not exist after transaction rollback"
    );
}

#[test]
#[ignore = "requires MariaDB via DATABASE_URL"]
fn test_mariadb_ledger_round_trip() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();
    let now = datetime!(2024-05-01 09:00 UTC);

    let mut persistence = Persistence::new_with_mysql(&url).expect("Failed to open MariaDB store");
    let leave_type = persistence
        .register_leave_type("mariadb-round-trip", &create_test_rules(true), true)
        .expect("Failed to register leave type");
    let key = BalanceKey::new(PersonId::new(4242), leave_type.id, 2024);

    persistence
        .allocate_balance(key, Days::whole(20), Days::ZERO, now)
        .expect("Failed to allocate");
    persistence
        .reserve(key, Days::whole(3), "course hold", false, now)
        .expect("Failed to reserve");
    let stored = persistence
        .commit_used(key, Days::whole(3), "course confirmed", now)
        .expect("Failed to commit");

    assert_eq!(stored.balance.used_days, Days::whole(3));
    assert_eq!(stored.balance.available_days(), Days::whole(17));
    assert_eq!(persistence.ledger_history(key).expect("history").len(), 3);
}

#[test]
#[ignore = "requires MariaDB via DATABASE_URL"]
fn test_mariadb_edit_and_create_for_one_person_cannot_both_overlap() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();
    let now = datetime!(2024-05-01 09:00 UTC);
    let run = std::process::id();
    let person = PersonId::new(i64::from(run));

    let mut setup = Persistence::new_with_mysql(&url).expect("Failed to open MariaDB store");
    let annual = setup
        .register_leave_type(&format!("race-annual-{run}"), &create_test_rules(true), true)
        .expect("Failed to register annual type");
    let sick = setup
        .register_leave_type(&format!("race-sick-{run}"), &create_test_rules(true), true)
        .expect("Failed to register sick type");
    let existing = setup
        .create_leave(
            create_test_draft(&annual, person, date!(2024 - 07 - 01), date!(2024 - 07 - 05)),
            false,
            now,
        )
        .expect("Failed to create the request to edit");

    let edit_draft =
        create_test_draft(&annual, person, date!(2024 - 07 - 08), date!(2024 - 07 - 12));
    let new_draft =
        create_test_draft(&sick, person, date!(2024 - 07 - 10), date!(2024 - 07 - 11));
    let mut editor = Persistence::new_with_mysql(&url).expect("Failed to open editor");
    let mut creator = Persistence::new_with_mysql(&url).expect("Failed to open creator");
    let barrier = Arc::new(Barrier::new(2));

    let edit = {
        let barrier = Arc::clone(&barrier);
        let leave_id = existing.leave.id;
        thread::spawn(move || {
            barrier.wait();
            editor
                .update_leave(
                    leave_id,
                    edit_draft,
                    &Actor::Employee { person_id: person },
                    false,
                    now,
                )
                .map(|_| ())
        })
    };
    let create = thread::spawn(move || {
        barrier.wait();
        creator.create_leave(new_draft, false, now).map(|_| ())
    });
    let results: Vec<Result<(), PersistenceError>> = [edit, create]
        .into_iter()
        .map(|h| h.join().expect("worker panicked"))
        .collect();

    assert!(
        results.iter().any(Result::is_err),
        "both writers committed overlapping requests: {results:?}"
    );
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(
            matches!(err, PersistenceError::Rejected(CoreError::OverlapConflict { .. }))
                || err.is_transient(),
            "unexpected failure: {err:?}"
        );
    }
}
