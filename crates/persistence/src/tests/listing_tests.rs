// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_ledger::Command;
use leave_ledger_domain::{Days, LeaveId, LeaveStatus};
use time::Date;
use time::macros::date;

use super::{
    COLLEAGUE, EMPLOYEE, create_test_draft, create_test_manager, create_test_now,
    setup_persistence,
};
use crate::{LeaveFilter, MAX_PAGE_SIZE, Persistence};

/// Creates one request per start date, each lasting one weekday.
fn seed_requests(persistence: &mut Persistence, starts: &[Date]) -> Vec<LeaveId> {
    let annual = persistence.list_leave_types().unwrap().remove(0);
    starts
        .iter()
        .map(|start| {
            persistence
                .create_leave(
                    create_test_draft(&annual, EMPLOYEE, *start, *start),
                    false,
                    create_test_now(),
                )
                .unwrap()
                .leave
                .id
        })
        .collect()
}

#[test]
fn test_list_leaves_paginates_in_start_order() {
    let (mut persistence, _) = setup_persistence();
    let ids = seed_requests(
        &mut persistence,
        &[
            date!(2024 - 06 - 05),
            date!(2024 - 06 - 03),
            date!(2024 - 06 - 04),
        ],
    );

    let first = persistence
        .list_leaves(&LeaveFilter::default(), 1, 2)
        .unwrap();
    assert_eq!(first.total, 3);
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.items[0].id, ids[1]);
    assert_eq!(first.items[1].id, ids[2]);

    let second = persistence
        .list_leaves(&LeaveFilter::default(), 2, 2)
        .unwrap();
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].id, ids[0]);
}

#[test]
fn test_list_leaves_clamps_paging_arguments() {
    let (mut persistence, _) = setup_persistence();
    seed_requests(&mut persistence, &[date!(2024 - 06 - 03)]);

    let page = persistence
        .list_leaves(&LeaveFilter::default(), 0, 10_000)
        .unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, MAX_PAGE_SIZE);
    assert_eq!(page.items.len(), 1);
}

#[test]
fn test_list_leaves_filters_by_status_and_dates() {
    let (mut persistence, _) = setup_persistence();
    let ids = seed_requests(
        &mut persistence,
        &[date!(2024 - 06 - 03), date!(2024 - 07 - 01)],
    );
    persistence
        .transition_leave(
            ids[1],
            Command::Approve { notes: None },
            &create_test_manager(),
            None,
            date!(2024 - 05 - 02),
            create_test_now(),
        )
        .unwrap();

    let approved = persistence
        .list_leaves(
            &LeaveFilter {
                status: Some(LeaveStatus::Approved),
                ..LeaveFilter::default()
            },
            1,
            20,
        )
        .unwrap();
    assert_eq!(approved.total, 1);
    assert_eq!(approved.items[0].id, ids[1]);

    let june = persistence
        .list_leaves(
            &LeaveFilter {
                from: Some(date!(2024 - 06 - 01)),
                to: Some(date!(2024 - 06 - 30)),
                ..LeaveFilter::default()
            },
            1,
            20,
        )
        .unwrap();
    assert_eq!(june.total, 1);
    assert_eq!(june.items[0].id, ids[0]);
}

#[test]
fn test_list_leaves_by_people() {
    let (mut persistence, annual) = setup_persistence();
    seed_requests(&mut persistence, &[date!(2024 - 06 - 03)]);
    persistence
        .create_leave(
            create_test_draft(&annual, COLLEAGUE, date!(2024 - 06 - 03), date!(2024 - 06 - 03)),
            false,
            create_test_now(),
        )
        .unwrap();

    let colleague_only = persistence
        .list_leaves(
            &LeaveFilter {
                person_ids: Some(vec![COLLEAGUE]),
                ..LeaveFilter::default()
            },
            1,
            20,
        )
        .unwrap();
    assert_eq!(colleague_only.total, 1);
    assert_eq!(colleague_only.items[0].person_id, COLLEAGUE);

    let nobody = persistence
        .list_leaves(
            &LeaveFilter {
                person_ids: Some(Vec::new()),
                ..LeaveFilter::default()
            },
            1,
            20,
        )
        .unwrap();
    assert_eq!(nobody.total, 0);
    assert!(nobody.items.is_empty());
}

#[test]
fn test_notifications_due_inside_window() {
    let (mut persistence, _) = setup_persistence();
    let ids = seed_requests(
        &mut persistence,
        &[date!(2024 - 06 - 10), date!(2024 - 06 - 28)],
    );

    let due = persistence.notifications_due(date!(2024 - 06 - 04)).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, ids[0]);

    assert!(
        persistence
            .notifications_due(date!(2024 - 06 - 10))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_leave_statistics_counts_statuses_and_usage() {
    let (mut persistence, annual) = setup_persistence();
    let ids = seed_requests(
        &mut persistence,
        &[
            date!(2024 - 06 - 03),
            date!(2024 - 06 - 04),
            date!(2024 - 06 - 05),
        ],
    );
    persistence
        .transition_leave(
            ids[0],
            Command::Approve { notes: None },
            &create_test_manager(),
            None,
            date!(2024 - 05 - 02),
            create_test_now(),
        )
        .unwrap();
    persistence
        .transition_leave(
            ids[1],
            Command::Reject {
                reason: String::from("coverage"),
            },
            &create_test_manager(),
            None,
            date!(2024 - 05 - 02),
            create_test_now(),
        )
        .unwrap();

    let stats = persistence.leave_statistics(2024).unwrap();
    assert_eq!(stats.year, 2024);
    assert_eq!(stats.by_status.get(&LeaveStatus::Approved), Some(&1));
    assert_eq!(stats.by_status.get(&LeaveStatus::Rejected), Some(&1));
    assert_eq!(stats.by_status.get(&LeaveStatus::Pending), Some(&1));

    let usage = stats.by_type.get(&annual.id).unwrap();
    assert_eq!(usage.approved_requests, 1);
    assert_eq!(usage.used_days, Days::whole(1));

    assert!(persistence.leave_statistics(2023).unwrap().by_status.is_empty());
}

#[test]
fn test_leave_statistics_keeps_counting_started_and_finished_approvals() {
    let (mut persistence, annual) = setup_persistence();
    let ids = seed_requests(
        &mut persistence,
        &[date!(2024 - 06 - 03), date!(2024 - 06 - 04)],
    );
    for id in &ids {
        persistence
            .transition_leave(
                *id,
                Command::Approve { notes: None },
                &create_test_manager(),
                None,
                date!(2024 - 05 - 02),
                create_test_now(),
            )
            .unwrap();
    }
    persistence
        .advance_statuses(date!(2024 - 06 - 04), create_test_now())
        .unwrap();

    let stats = persistence.leave_statistics(2024).unwrap();
    assert_eq!(stats.by_status.get(&LeaveStatus::Completed), Some(&1));
    assert_eq!(stats.by_status.get(&LeaveStatus::InProgress), Some(&1));
    assert_eq!(stats.by_status.get(&LeaveStatus::Approved), None);

    let usage = stats.by_type.get(&annual.id).unwrap();
    assert_eq!(usage.approved_requests, 2);
    assert_eq!(usage.used_days, Days::whole(2));
}
