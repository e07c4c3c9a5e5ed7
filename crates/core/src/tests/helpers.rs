// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Actor, Approver, ApproverScope, TransitionContext};
use leave_ledger_domain::{
    BalanceKey, DateRange, Days, DepartmentId, Leave, LeaveBalance, LeaveDetails, LeaveDraft,
    LeaveId, LeaveStatus, LeaveType, LeaveTypeId, LeaveTypeRules, PersonId,
};
use std::collections::BTreeSet;
use time::macros::datetime;
use time::{Date, OffsetDateTime};

pub const EMPLOYEE: PersonId = PersonId::new(10);
pub const MANAGER: PersonId = PersonId::new(20);
pub const SALES: DepartmentId = DepartmentId::new(1);

pub fn create_test_now() -> OffsetDateTime {
    datetime!(2024-06-01 09:00 UTC)
}

pub fn create_test_leave_type(requires_approval: bool) -> LeaveType {
    LeaveType {
        id: LeaveTypeId::new(1),
        name: String::from("Annual"),
        rules: LeaveTypeRules {
            requires_approval,
            requires_document: false,
            is_paid: true,
            can_carry_over: true,
            max_carry_over_days: Days::whole(5),
            max_days_per_year: Days::ZERO,
            notification_days: 7,
            counts_weekends: false,
        },
        is_active: true,
    }
}

pub fn create_test_draft(start: Date, end: Date, days: u32) -> LeaveDraft {
    LeaveDraft {
        person_id: EMPLOYEE,
        leave_type_id: LeaveTypeId::new(1),
        range: DateRange::new(start, end).unwrap(),
        total_days: Days::whole(days),
        details: LeaveDetails {
            reason: String::from("holiday"),
            ..LeaveDetails::default()
        },
    }
}

pub fn create_test_leave(id: i64, start: Date, end: Date, days: u32, status: LeaveStatus) -> Leave {
    let mut leave = Leave::from_draft(
        LeaveId::new(id),
        create_test_draft(start, end, days),
        create_test_now(),
    );
    leave.status = status;
    leave
}

pub fn create_test_balance(allocated: u32) -> LeaveBalance {
    let mut balance = LeaveBalance::zero(BalanceKey::new(EMPLOYEE, LeaveTypeId::new(1), 2024));
    balance.allocated_days = Days::whole(allocated);
    balance
}

pub fn create_test_manager() -> Actor {
    Actor::Approver(Approver::new(
        MANAGER,
        ApproverScope::Departments(BTreeSet::from([SALES])),
    ))
}

pub fn create_test_employee() -> Actor {
    Actor::Employee {
        person_id: EMPLOYEE,
    }
}

pub fn create_test_context(leave_type: &LeaveType, today: Date) -> TransitionContext<'_> {
    TransitionContext {
        leave_type,
        owner_department: Some(SALES),
        today,
        now: create_test_now(),
    }
}
