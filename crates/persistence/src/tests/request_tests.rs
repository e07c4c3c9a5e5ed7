// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_ledger::{Command, CoreError};
use leave_ledger_domain::{DateRange, Days, LeaveId, LeaveStatus};
use time::macros::date;

use super::{
    COLLEAGUE, EMPLOYEE, MANAGER, create_test_draft, create_test_employee, create_test_key,
    create_test_manager, create_test_now, create_test_rules, setup_persistence,
};
use crate::{AUTO_APPROVAL_NOTE, LedgerEntryKind, PersistenceError};

#[test]
fn test_create_leave_reserves_pending_days() {
    let (mut persistence, annual) = setup_persistence();
    let draft = create_test_draft(&annual, EMPLOYEE, date!(2024 - 06 - 03), date!(2024 - 06 - 07));

    let created = persistence
        .create_leave(draft, false, create_test_now())
        .unwrap();

    assert!(created.leave.id.value() > 0);
    assert_eq!(created.leave.status, LeaveStatus::Pending);
    assert_eq!(created.leave.total_days, Days::whole(5));
    assert_eq!(created.leave.balance_year, 2024);
    assert!(created.leave.approval.is_none());
    assert_eq!(created.balance.pending_days, Days::whole(5));
    assert!(created.reservation.overdrawn);

    let stored = persistence.get_leave(created.leave.id).unwrap();
    assert_eq!(stored, created.leave);

    let history = persistence
        .ledger_history(create_test_key(&annual, 2024))
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, LedgerEntryKind::Reserve);
    assert_eq!(history[0].leave_id, Some(created.leave.id));
}

#[test]
fn test_overlapping_request_is_rejected_and_rolled_back() {
    let (mut persistence, annual) = setup_persistence();
    let now = create_test_now();
    let first = persistence
        .create_leave(
            create_test_draft(&annual, EMPLOYEE, date!(2024 - 06 - 03), date!(2024 - 06 - 07)),
            false,
            now,
        )
        .unwrap();

    let result = persistence.create_leave(
        create_test_draft(&annual, EMPLOYEE, date!(2024 - 06 - 07), date!(2024 - 06 - 11)),
        false,
        now,
    );

    match result {
        Err(PersistenceError::Rejected(CoreError::OverlapConflict { conflicts })) => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].id, first.leave.id);
        }
        other => panic!("expected overlap conflict, got {other:?}"),
    }

    let balance = persistence
        .get_balance(create_test_key(&annual, 2024))
        .unwrap();
    assert_eq!(balance.balance.pending_days, Days::whole(5));
}

#[test]
fn test_adjacent_and_other_person_requests_do_not_conflict() {
    let (mut persistence, annual) = setup_persistence();
    let now = create_test_now();
    persistence
        .create_leave(
            create_test_draft(&annual, EMPLOYEE, date!(2024 - 06 - 03), date!(2024 - 06 - 07)),
            false,
            now,
        )
        .unwrap();

    persistence
        .create_leave(
            create_test_draft(&annual, EMPLOYEE, date!(2024 - 06 - 10), date!(2024 - 06 - 10)),
            false,
            now,
        )
        .unwrap();
    persistence
        .create_leave(
            create_test_draft(&annual, COLLEAGUE, date!(2024 - 06 - 03), date!(2024 - 06 - 07)),
            false,
            now,
        )
        .unwrap();

    let overlapping = persistence
        .find_overlapping(
            EMPLOYEE,
            DateRange::new(date!(2024 - 06 - 01), date!(2024 - 06 - 30)).unwrap(),
            None,
        )
        .unwrap();
    assert_eq!(overlapping.len(), 2);
}

#[test]
fn test_rejected_request_frees_its_dates() {
    let (mut persistence, annual) = setup_persistence();
    let now = create_test_now();
    let created = persistence
        .create_leave(
            create_test_draft(&annual, EMPLOYEE, date!(2024 - 06 - 03), date!(2024 - 06 - 07)),
            false,
            now,
        )
        .unwrap();

    persistence
        .transition_leave(
            created.leave.id,
            Command::Reject {
                reason: String::from("team coverage"),
            },
            &create_test_manager(),
            None,
            date!(2024 - 05 - 02),
            now,
        )
        .unwrap();

    let balance = persistence
        .get_balance(create_test_key(&annual, 2024))
        .unwrap();
    assert_eq!(balance.balance.pending_days, Days::ZERO);

    persistence
        .create_leave(
            create_test_draft(&annual, EMPLOYEE, date!(2024 - 06 - 03), date!(2024 - 06 - 07)),
            false,
            now,
        )
        .unwrap();
}

#[test]
fn test_auto_approved_type_commits_immediately() {
    let (mut persistence, _) = setup_persistence();
    let sick = persistence
        .register_leave_type("Sick", &create_test_rules(false), true)
        .unwrap();

    let created = persistence
        .create_leave(
            create_test_draft(&sick, EMPLOYEE, date!(2024 - 06 - 03), date!(2024 - 06 - 04)),
            false,
            create_test_now(),
        )
        .unwrap();

    assert_eq!(created.leave.status, LeaveStatus::Approved);
    let approval = created.leave.approval.as_ref().unwrap();
    assert_eq!(approval.approved_by, None);
    assert_eq!(approval.notes.as_deref(), Some(AUTO_APPROVAL_NOTE));
    assert_eq!(created.balance.used_days, Days::whole(2));
    assert_eq!(created.balance.pending_days, Days::ZERO);

    let stored = persistence.get_leave(created.leave.id).unwrap();
    assert_eq!(stored.approval, created.leave.approval);
}

#[test]
fn test_inactive_type_rejects_new_requests() {
    let (mut persistence, annual) = setup_persistence();
    persistence.set_leave_type_active(annual.id, false).unwrap();
    let inactive = persistence.get_leave_type(annual.id).unwrap();

    let result = persistence.create_leave(
        create_test_draft(&inactive, EMPLOYEE, date!(2024 - 06 - 03), date!(2024 - 06 - 04)),
        false,
        create_test_now(),
    );
    assert!(matches!(
        result,
        Err(PersistenceError::Rejected(CoreError::LeaveTypeInactive { .. }))
    ));
    assert!(matches!(
        persistence.get_balance(create_test_key(&annual, 2024)),
        Err(PersistenceError::BalanceNotFound(_))
    ));
}

#[test]
fn test_approve_moves_pending_to_used() {
    let (mut persistence, annual) = setup_persistence();
    let now = create_test_now();
    let created = persistence
        .create_leave(
            create_test_draft(&annual, EMPLOYEE, date!(2024 - 06 - 03), date!(2024 - 06 - 07)),
            false,
            now,
        )
        .unwrap();

    let result = persistence
        .transition_leave(
            created.leave.id,
            Command::Approve {
                notes: Some(String::from("enjoy")),
            },
            &create_test_manager(),
            None,
            date!(2024 - 05 - 02),
            now,
        )
        .unwrap();

    assert_eq!(result.previous_status, LeaveStatus::Pending);
    assert_eq!(result.leave.status, LeaveStatus::Approved);
    assert!(result.notify_requester);

    let stored = persistence.get_leave(created.leave.id).unwrap();
    let approval = stored.approval.unwrap();
    assert_eq!(approval.approved_by, Some(MANAGER));
    assert_eq!(approval.notes.as_deref(), Some("enjoy"));

    let balance = persistence
        .get_balance(create_test_key(&annual, 2024))
        .unwrap();
    assert_eq!(balance.balance.pending_days, Days::ZERO);
    assert_eq!(balance.balance.used_days, Days::whole(5));
}

#[test]
fn test_employee_cannot_approve() {
    let (mut persistence, annual) = setup_persistence();
    let now = create_test_now();
    let created = persistence
        .create_leave(
            create_test_draft(&annual, EMPLOYEE, date!(2024 - 06 - 03), date!(2024 - 06 - 07)),
            false,
            now,
        )
        .unwrap();

    let result = persistence.transition_leave(
        created.leave.id,
        Command::Approve { notes: None },
        &create_test_employee(),
        None,
        date!(2024 - 05 - 02),
        now,
    );
    assert!(matches!(
        result,
        Err(PersistenceError::Rejected(CoreError::Unauthorized { .. }))
    ));
    assert_eq!(
        persistence.get_leave(created.leave.id).unwrap().status,
        LeaveStatus::Pending
    );
}

#[test]
fn test_cancel_after_approval_restores_used_days() {
    let (mut persistence, annual) = setup_persistence();
    let now = create_test_now();
    let created = persistence
        .create_leave(
            create_test_draft(&annual, EMPLOYEE, date!(2024 - 06 - 03), date!(2024 - 06 - 07)),
            false,
            now,
        )
        .unwrap();
    persistence
        .transition_leave(
            created.leave.id,
            Command::Approve { notes: None },
            &create_test_manager(),
            None,
            date!(2024 - 05 - 02),
            now,
        )
        .unwrap();

    let result = persistence
        .transition_leave(
            created.leave.id,
            Command::Cancel {
                reason: Some(String::from("plans changed")),
            },
            &create_test_employee(),
            None,
            date!(2024 - 05 - 20),
            now,
        )
        .unwrap();

    assert_eq!(result.leave.status, LeaveStatus::Cancelled);
    assert!(result.notify_manager);
    let cancellation = persistence
        .get_leave(created.leave.id)
        .unwrap()
        .cancellation
        .unwrap();
    assert_eq!(cancellation.cancelled_by, EMPLOYEE);
    assert_eq!(cancellation.reason.as_deref(), Some("plans changed"));

    let key = create_test_key(&annual, 2024);
    let balance = persistence.get_balance(key).unwrap();
    assert_eq!(balance.balance.used_days, Days::ZERO);
    assert_eq!(balance.balance.pending_days, Days::ZERO);

    let kinds: Vec<LedgerEntryKind> = persistence
        .ledger_history(key)
        .unwrap()
        .iter()
        .map(|e| e.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            LedgerEntryKind::Reserve,
            LedgerEntryKind::CommitUsed,
            LedgerEntryKind::ReverseUsed
        ]
    );
}

#[test]
fn test_cancel_after_start_is_refused() {
    let (mut persistence, annual) = setup_persistence();
    let now = create_test_now();
    let created = persistence
        .create_leave(
            create_test_draft(&annual, EMPLOYEE, date!(2024 - 06 - 03), date!(2024 - 06 - 07)),
            false,
            now,
        )
        .unwrap();
    persistence
        .transition_leave(
            created.leave.id,
            Command::Approve { notes: None },
            &create_test_manager(),
            None,
            date!(2024 - 05 - 02),
            now,
        )
        .unwrap();

    let result = persistence.transition_leave(
        created.leave.id,
        Command::Cancel { reason: None },
        &create_test_employee(),
        None,
        date!(2024 - 06 - 03),
        now,
    );
    assert!(matches!(
        result,
        Err(PersistenceError::Rejected(CoreError::InvalidTransition { .. }))
    ));
}

#[test]
fn test_update_moves_reservation() {
    let (mut persistence, annual) = setup_persistence();
    let now = create_test_now();
    let created = persistence
        .create_leave(
            create_test_draft(&annual, EMPLOYEE, date!(2024 - 06 - 03), date!(2024 - 06 - 07)),
            false,
            now,
        )
        .unwrap();

    let updated = persistence
        .update_leave(
            created.leave.id,
            create_test_draft(&annual, EMPLOYEE, date!(2024 - 07 - 01), date!(2024 - 07 - 02)),
            &create_test_employee(),
            false,
            now,
        )
        .unwrap();

    assert_eq!(updated.leave.id, created.leave.id);
    assert_eq!(updated.leave.range.start(), date!(2024 - 07 - 01));
    assert_eq!(updated.leave.total_days, Days::whole(2));

    let balance = persistence
        .get_balance(create_test_key(&annual, 2024))
        .unwrap();
    assert_eq!(balance.balance.pending_days, Days::whole(2));
}

#[test]
fn test_update_into_next_year_moves_balance() {
    let (mut persistence, annual) = setup_persistence();
    let now = create_test_now();
    let created = persistence
        .create_leave(
            create_test_draft(&annual, EMPLOYEE, date!(2024 - 06 - 03), date!(2024 - 06 - 07)),
            false,
            now,
        )
        .unwrap();

    persistence
        .update_leave(
            created.leave.id,
            create_test_draft(&annual, EMPLOYEE, date!(2025 - 01 - 06), date!(2025 - 01 - 07)),
            &create_test_employee(),
            false,
            now,
        )
        .unwrap();

    let old = persistence
        .get_balance(create_test_key(&annual, 2024))
        .unwrap();
    let new = persistence
        .get_balance(create_test_key(&annual, 2025))
        .unwrap();
    assert_eq!(old.balance.pending_days, Days::ZERO);
    assert_eq!(new.balance.pending_days, Days::whole(2));
}

#[test]
fn test_update_by_another_person_is_refused() {
    let (mut persistence, annual) = setup_persistence();
    let now = create_test_now();
    let created = persistence
        .create_leave(
            create_test_draft(&annual, EMPLOYEE, date!(2024 - 06 - 03), date!(2024 - 06 - 07)),
            false,
            now,
        )
        .unwrap();

    let result = persistence.update_leave(
        created.leave.id,
        create_test_draft(&annual, EMPLOYEE, date!(2024 - 07 - 01), date!(2024 - 07 - 02)),
        &create_test_manager(),
        false,
        now,
    );
    assert!(result.is_err());
    assert_eq!(
        persistence.get_leave(created.leave.id).unwrap().range.start(),
        date!(2024 - 06 - 03)
    );
}

#[test]
fn test_transition_unknown_leave_fails() {
    let (mut persistence, _) = setup_persistence();

    let result = persistence.transition_leave(
        LeaveId::new(404),
        Command::Approve { notes: None },
        &create_test_manager(),
        None,
        date!(2024 - 05 - 02),
        create_test_now(),
    );
    assert!(matches!(result, Err(PersistenceError::LeaveNotFound(_))));
}
