// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod backend_validation_tests;
mod initialization_tests;
mod listing_tests;
mod request_tests;

use leave_ledger::{Actor, Approver, ApproverScope};
use leave_ledger_domain::{
    BalanceKey, Days, LeaveDetails, LeaveDraft, LeaveRequest, LeaveType, LeaveTypeRules,
    PersonId, WeekdaysOnly, validate_request,
};
use time::macros::datetime;
use time::{Date, OffsetDateTime};

use crate::Persistence;

pub const EMPLOYEE: PersonId = PersonId::new(10);
pub const COLLEAGUE: PersonId = PersonId::new(11);
pub const MANAGER: PersonId = PersonId::new(20);

pub fn create_test_now() -> OffsetDateTime {
    datetime!(2024-05-01 09:00 UTC)
}

pub fn create_test_rules(requires_approval: bool) -> LeaveTypeRules {
    LeaveTypeRules {
        requires_approval,
        requires_document: false,
        is_paid: true,
        can_carry_over: true,
        max_carry_over_days: Days::whole(5),
        max_days_per_year: Days::ZERO,
        notification_days: 7,
        counts_weekends: false,
    }
}

/// Opens a fresh in-memory store with an "Annual" type requiring approval.
pub fn setup_persistence() -> (Persistence, LeaveType) {
    let mut persistence = Persistence::new_in_memory().expect("in-memory store");
    let annual = persistence
        .register_leave_type("Annual", &create_test_rules(true), true)
        .expect("register Annual");
    (persistence, annual)
}

/// Builds a validated weekday-counted draft for `person`.
pub fn create_test_draft(
    leave_type: &LeaveType,
    person: PersonId,
    start: Date,
    end: Date,
) -> LeaveDraft {
    let request = LeaveRequest {
        person_id: person,
        leave_type_id: leave_type.id,
        start_date: start,
        end_date: end,
        details: LeaveDetails {
            reason: String::from("family trip"),
            ..LeaveDetails::default()
        },
    };
    validate_request(&request, leave_type, &WeekdaysOnly).expect("valid request")
}

pub fn create_test_key(leave_type: &LeaveType, year: i32) -> BalanceKey {
    BalanceKey::new(EMPLOYEE, leave_type.id, year)
}

pub fn create_test_manager() -> Actor {
    Actor::Approver(Approver::new(MANAGER, ApproverScope::All))
}

pub const fn create_test_employee() -> Actor {
    Actor::Employee {
        person_id: EMPLOYEE,
    }
}

pub fn days(value: &str) -> Days {
    value.parse().expect("valid days")
}
