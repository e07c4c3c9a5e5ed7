// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use leave_ledger::{Actor, Approver, ApproverScope};
use leave_ledger_domain::{
    BalanceKey, DepartmentId, Days, LeaveType, LeaveTypeRules, PersonId,
};
use leave_ledger_persistence::Persistence;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::path::PathBuf;
use time::macros::datetime;
use time::{Date, OffsetDateTime};

use crate::{EngineConfig, FixedClock, InMemoryDirectory, LeaveEngine, SubmitLeaveRequest};

pub const SALES: DepartmentId = DepartmentId::new(1);
pub const SUPPORT: DepartmentId = DepartmentId::new(2);

pub const EMPLOYEE: PersonId = PersonId::new(10);
pub const COLLEAGUE: PersonId = PersonId::new(11);
pub const MANAGER: PersonId = PersonId::new(20);
pub const OUTSIDER: PersonId = PersonId::new(30);
pub const UNKNOWN: PersonId = PersonId::new(99);

pub type TestEngine = LeaveEngine<InMemoryDirectory, FixedClock>;

/// Monday 2024-06-03, well before the July requests used in most tests.
pub fn create_test_now() -> OffsetDateTime {
    datetime!(2024-06-03 09:00 UTC)
}

pub fn create_test_directory() -> InMemoryDirectory {
    InMemoryDirectory::new()
        .with_person(EMPLOYEE, Some(SALES))
        .with_person(COLLEAGUE, Some(SALES))
        .with_person(MANAGER, Some(SALES))
        .with_person(OUTSIDER, Some(SUPPORT))
}

pub fn create_test_rules() -> LeaveTypeRules {
    LeaveTypeRules {
        requires_approval: true,
        requires_document: false,
        is_paid: true,
        can_carry_over: true,
        max_carry_over_days: Days::whole(5),
        max_days_per_year: Days::ZERO,
        notification_days: 7,
        counts_weekends: false,
    }
}

/// An engine over a fresh in-memory store with an "Annual" type.
pub fn setup_engine(config: EngineConfig) -> (TestEngine, LeaveType) {
    let persistence = Persistence::new_in_memory().expect("in-memory store");
    let mut engine = LeaveEngine::new(
        persistence,
        create_test_directory(),
        FixedClock::new(create_test_now()),
        config,
    );
    let annual = engine
        .register_leave_type("Annual", &create_test_rules(), true)
        .expect("register Annual");
    (engine, annual)
}

pub fn setup_default_engine() -> (TestEngine, LeaveType) {
    setup_engine(EngineConfig::default())
}

pub fn create_test_request(
    leave_type: &LeaveType,
    person: PersonId,
    start: Date,
    end: Date,
) -> SubmitLeaveRequest {
    SubmitLeaveRequest {
        person_id: person,
        leave_type_id: leave_type.id,
        start_date: start,
        end_date: end,
        reason: String::from("summer holiday"),
        document_path: None,
        is_urgent: false,
        handover_to: None,
        handover_notes: None,
        emergency_contact: None,
    }
}

pub fn create_test_key(leave_type: &LeaveType, person: PersonId, year: i32) -> BalanceKey {
    BalanceKey::new(person, leave_type.id, year)
}

/// The sales manager.
pub fn create_test_manager() -> Approver {
    Approver::new(MANAGER, ApproverScope::Departments(BTreeSet::from([SALES])))
}

pub const fn create_test_employee() -> Actor {
    Actor::Employee {
        person_id: EMPLOYEE,
    }
}

pub const fn days(value: Decimal) -> Days {
    Days::new(value)
}

/// A unique database file path under the temp directory.
pub fn create_test_db_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "leave_ledger_api_{tag}_{}.db",
        std::process::id()
    ))
}

/// Removes a database file and its WAL side files.
pub fn remove_test_db(path: &PathBuf) {
    let _ = std::fs::remove_file(path);
    for suffix in ["-wal", "-shm"] {
        let mut side = path.clone().into_os_string();
        side.push(suffix);
        let _ = std::fs::remove_file(side);
    }
}
