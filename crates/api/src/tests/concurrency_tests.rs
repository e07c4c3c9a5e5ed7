// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::{Connection, RunQueryDsl, SqliteConnection};
use leave_ledger::BatchReport;
use leave_ledger_domain::BalanceKey;
use leave_ledger_persistence::LedgerEntryKind;
use rust_decimal_macros::dec;
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use time::macros::date;

use super::helpers::{
    COLLEAGUE, EMPLOYEE, TestEngine, create_test_db_path, create_test_directory,
    create_test_employee, create_test_key, create_test_now, create_test_request,
    create_test_rules, days, remove_test_db,
};
use crate::{ApiError, BalanceInfo, CreateLeaveResponse, EngineConfig, FixedClock, LeaveEngine};

/// Settings that make lock contention fail fast and lean on the retry loop.
fn contended_config() -> EngineConfig {
    EngineConfig {
        busy_timeout_ms: 1,
        max_retries: 8,
        retry_backoff_ms: 2,
        ..EngineConfig::default()
    }
}

fn open_test_engine(path: &Path, config: EngineConfig) -> TestEngine {
    LeaveEngine::open_sqlite(
        path,
        create_test_directory(),
        FixedClock::new(create_test_now()),
        config,
    )
    .unwrap()
}

#[test]
fn test_concurrent_overlapping_requests_admit_exactly_one() {
    let path = create_test_db_path("overlap_race");
    remove_test_db(&path);

    // Both engines open (and migrate) before any thread starts.
    let mut first = LeaveEngine::open_sqlite(
        &path,
        create_test_directory(),
        FixedClock::new(create_test_now()),
        EngineConfig::default(),
    )
    .unwrap();
    let second = LeaveEngine::open_sqlite(
        &path,
        create_test_directory(),
        FixedClock::new(create_test_now()),
        EngineConfig::default(),
    )
    .unwrap();

    let annual = first
        .register_leave_type("Annual", &create_test_rules(), true)
        .unwrap();
    let key = create_test_key(&annual, EMPLOYEE, 2024);
    first
        .allocate_balance(key, days(dec!(14)), days(dec!(0)))
        .unwrap();

    let requests = [
        create_test_request(&annual, EMPLOYEE, date!(2024 - 07 - 01), date!(2024 - 07 - 05)),
        create_test_request(&annual, EMPLOYEE, date!(2024 - 07 - 03), date!(2024 - 07 - 10)),
    ];
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<thread::JoinHandle<Result<CreateLeaveResponse, ApiError>>> =
        [first, second]
            .into_iter()
            .zip(requests)
            .map(|(mut engine, request)| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    engine.create_leave(&request)
                })
            })
            .collect();
    let results: Vec<Result<CreateLeaveResponse, ApiError>> = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    let winners: Vec<&CreateLeaveResponse> =
        results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1, "results: {results:?}");
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(ApiError::OverlapConflict { .. }))),
        "results: {results:?}"
    );

    let mut check = LeaveEngine::open_sqlite(
        &path,
        create_test_directory(),
        FixedClock::new(create_test_now()),
        EngineConfig::default(),
    )
    .unwrap();
    let balance = check.get_balance(key).unwrap();
    assert_eq!(balance.pending_days, winners[0].leave.total_days);

    drop(check);
    remove_test_db(&path);
}

/// Outcome of one worker: how many reserves and commits went through.
#[derive(Debug, Default)]
struct WorkerTally {
    reserved: u32,
    committed: u32,
    failures: Vec<ApiError>,
}

#[test]
fn test_concurrent_reserve_and_commit_keep_the_balance_exact() {
    const WORKERS: usize = 4;
    const ROUNDS: u32 = 5;

    let path = create_test_db_path("ledger_race");
    remove_test_db(&path);

    let mut setup = open_test_engine(&path, EngineConfig::default());
    let annual = setup
        .register_leave_type("Annual", &create_test_rules(), true)
        .unwrap();
    let key = create_test_key(&annual, EMPLOYEE, 2024);
    setup
        .allocate_balance(key, days(dec!(100)), days(dec!(0)))
        .unwrap();
    let journal_before = setup.ledger_history(key).unwrap().len();

    let engines: Vec<TestEngine> = (0..WORKERS)
        .map(|_| open_test_engine(&path, contended_config()))
        .collect();
    let barrier = Arc::new(Barrier::new(WORKERS));

    let handles: Vec<thread::JoinHandle<WorkerTally>> = engines
        .into_iter()
        .map(|mut engine| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut tally = WorkerTally::default();
                barrier.wait();
                for _ in 0..ROUNDS {
                    match engine.reserve(key, days(dec!(1)), "shift swap hold") {
                        Ok(_) => tally.reserved += 1,
                        Err(err) => {
                            tally.failures.push(err);
                            continue;
                        }
                    }
                    match engine.commit_used(key, days(dec!(1)), "shift swap taken") {
                        Ok(_) => tally.committed += 1,
                        Err(err) => tally.failures.push(err),
                    }
                }
                tally
            })
        })
        .collect();
    let tallies: Vec<WorkerTally> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for tally in &tallies {
        assert!(
            tally.failures.iter().all(ApiError::is_retryable),
            "unexpected failures: {:?}",
            tally.failures
        );
    }
    let reserved: u32 = tallies.iter().map(|t| t.reserved).sum();
    let committed: u32 = tallies.iter().map(|t| t.committed).sum();
    assert!(committed > 0);

    let balance: BalanceInfo = setup.get_balance(key).unwrap();
    assert_eq!(balance.used_days, days(committed.into()));
    assert_eq!(balance.pending_days, days((reserved - committed).into()));

    let journal = setup.ledger_history(key).unwrap();
    let written = journal.len() - journal_before;
    assert_eq!(written, usize::try_from(reserved + committed).unwrap());

    drop(setup);
    remove_test_db(&path);
}

#[test]
fn test_accrual_retries_a_locked_row_without_double_counting() {
    let path = create_test_db_path("accrual_retry");
    remove_test_db(&path);

    let mut engine = open_test_engine(
        &path,
        EngineConfig {
            busy_timeout_ms: 1,
            max_retries: 6,
            retry_backoff_ms: 25,
            ..EngineConfig::default()
        },
    );
    let annual = engine
        .register_leave_type("Annual", &create_test_rules(), true)
        .unwrap();
    let keys: Vec<BalanceKey> = [EMPLOYEE, COLLEAGUE]
        .into_iter()
        .map(|person| create_test_key(&annual, person, 2024))
        .collect();
    for key in &keys {
        engine
            .allocate_balance(*key, days(dec!(20)), days(dec!(1.5)))
            .unwrap();
    }

    // Another process holds the write lock while the run starts.
    let mut blocker = SqliteConnection::establish(path.to_str().unwrap()).unwrap();
    diesel::sql_query("BEGIN IMMEDIATE")
        .execute(&mut blocker)
        .unwrap();

    let worker = thread::spawn(move || {
        let report = engine.run_accrual(date!(2024 - 06 - 30));
        (engine, report)
    });
    thread::sleep(Duration::from_millis(60));
    diesel::sql_query("COMMIT").execute(&mut blocker).unwrap();

    let (mut engine, report) = worker.join().unwrap();
    assert_eq!(
        report.unwrap(),
        BatchReport {
            examined: 2,
            updated: 2,
            skipped: 0
        }
    );
    for key in &keys {
        assert_eq!(
            engine.get_balance(*key).unwrap().accrued_to_date,
            days(dec!(1.5))
        );
        let accruals = engine
            .ledger_history(*key)
            .unwrap()
            .into_iter()
            .filter(|e| e.kind == LedgerEntryKind::Accrual)
            .count();
        assert_eq!(accruals, 1);
    }

    drop(engine);
    drop(blocker);
    remove_test_db(&path);
}

#[test]
fn test_concurrent_edit_and_create_of_other_type_admit_exactly_one() {
    let path = create_test_db_path("edit_race");
    remove_test_db(&path);

    let mut editor = open_test_engine(&path, EngineConfig::default());
    let annual = editor
        .register_leave_type("Annual", &create_test_rules(), true)
        .unwrap();
    let sick = editor
        .register_leave_type("Sick", &create_test_rules(), true)
        .unwrap();
    let existing = editor
        .create_leave(&create_test_request(
            &annual,
            EMPLOYEE,
            date!(2024 - 07 - 01),
            date!(2024 - 07 - 05),
        ))
        .unwrap();
    let mut creator = open_test_engine(&path, EngineConfig::default());

    let edit = create_test_request(&annual, EMPLOYEE, date!(2024 - 07 - 08), date!(2024 - 07 - 12));
    let other = create_test_request(&sick, EMPLOYEE, date!(2024 - 07 - 10), date!(2024 - 07 - 11));
    let barrier = Arc::new(Barrier::new(2));

    let edit_handle = {
        let barrier = Arc::clone(&barrier);
        let leave_id = existing.leave.id;
        thread::spawn(move || {
            barrier.wait();
            editor
                .update_leave(leave_id, &edit, &create_test_employee())
                .map(|_| ())
        })
    };
    let create_handle = thread::spawn(move || {
        barrier.wait();
        creator.create_leave(&other).map(|_| ())
    });
    let results: Vec<Result<(), ApiError>> = [edit_handle, create_handle]
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    assert_eq!(
        results.iter().filter(|r| r.is_ok()).count(),
        1,
        "results: {results:?}"
    );
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(ApiError::OverlapConflict { .. }))),
        "results: {results:?}"
    );

    remove_test_db(&path);
}
