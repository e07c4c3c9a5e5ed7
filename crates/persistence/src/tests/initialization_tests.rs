// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::QueryableByName;
use diesel::RunQueryDsl;
use diesel::sql_types::Text;
use leave_ledger_domain::{DomainError, LeaveTypeId};

use super::{create_test_rules, setup_persistence};
use crate::backend::sqlite::{self, Storage};
use crate::{Persistence, PersistenceError};

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}

#[test]
fn test_in_memory_databases_are_isolated() {
    let (mut first, _) = setup_persistence();
    let mut second = Persistence::new_in_memory().unwrap();

    assert_eq!(first.list_leave_types().unwrap().len(), 1);
    assert!(second.list_leave_types().unwrap().is_empty());
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_file_database_opens_in_wal_mode_with_foreign_keys() {
    let path = std::env::temp_dir().join(format!(
        "leave_ledger_init_{}_{}.db",
        std::process::id(),
        line!()
    ));
    let _ = std::fs::remove_file(&path);

    let mut conn = sqlite::open(path.to_str().unwrap(), 250, Storage::File).unwrap();
    let mode: JournalMode = diesel::sql_query("PRAGMA journal_mode")
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(mode.journal_mode.to_lowercase(), "wal");
    assert!(sqlite::verify_foreign_key_enforcement(&mut conn).is_ok());

    drop(conn);
    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(path.with_extension("db-wal"));
    let _ = std::fs::remove_file(path.with_extension("db-shm"));
}

#[test]
fn test_file_database_survives_reopen() {
    let path = std::env::temp_dir().join(format!(
        "leave_ledger_init_{}_{}.db",
        std::process::id(),
        line!()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence = Persistence::new_with_file(&path).unwrap();
        persistence
            .register_leave_type("Sick", &create_test_rules(false), true)
            .unwrap();
    }

    let mut reopened = Persistence::new_with_file(&path).unwrap();
    let types = reopened.list_leave_types().unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].name, "Sick");
    assert!(!types[0].rules.requires_approval);

    drop(reopened);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_register_leave_type_trims_and_round_trips_rules() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let mut rules = create_test_rules(true);
    rules.requires_document = true;
    rules.counts_weekends = true;
    rules.max_days_per_year = super::days("12.5");

    let created = persistence
        .register_leave_type("  Parental  ", &rules, true)
        .unwrap();
    assert_eq!(created.name, "Parental");

    let loaded = persistence.get_leave_type(created.id).unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.rules, rules);
}

#[test]
fn test_register_leave_type_rejects_duplicate_name_ignoring_case() {
    let (mut persistence, _) = setup_persistence();

    let result = persistence.register_leave_type("ANNUAL", &create_test_rules(true), true);
    assert!(matches!(result, Err(PersistenceError::DuplicateLeaveType(_))));
    assert_eq!(persistence.list_leave_types().unwrap().len(), 1);
}

#[test]
fn test_register_leave_type_rejects_blank_name() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = persistence.register_leave_type("   ", &create_test_rules(true), true);
    assert!(matches!(
        result,
        Err(PersistenceError::Rejected(leave_ledger::CoreError::DomainViolation(
            DomainError::EmptyText { .. }
        )))
    ));
}

#[test]
fn test_set_leave_type_active_toggles_flag() {
    let (mut persistence, annual) = setup_persistence();

    persistence.set_leave_type_active(annual.id, false).unwrap();
    assert!(!persistence.get_leave_type(annual.id).unwrap().is_active);

    let missing = persistence.set_leave_type_active(LeaveTypeId::new(999), true);
    assert!(matches!(missing, Err(PersistenceError::LeaveTypeNotFound(_))));
}

#[test]
fn test_get_unknown_leave_type_fails() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let result = persistence.get_leave_type(LeaveTypeId::new(42));
    assert!(matches!(result, Err(PersistenceError::LeaveTypeNotFound(_))));
}
