// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod accrual;
mod balance;
mod error;
mod leave;
mod leave_status;
mod leave_type;
mod types;
mod validation;
mod working_days;

#[cfg(test)]
mod tests;

pub use accrual::{AccrualPolicy, DEFAULT_ACCRUAL_PERIOD_DAYS, carry_over_amount};
pub use balance::{LeaveBalance, ReservationOutcome};
pub use error::DomainError;
pub use leave::{
    ApprovalRecord, CancellationRecord, EmergencyContact, HandoverDetails, Leave, LeaveDetails,
    LeaveDraft, LeaveRequest,
};
pub use leave_status::{LeaveAction, LeaveStatus, LedgerEffect, TRANSITIONS, Transition};
pub use leave_type::{LeaveType, LeaveTypeRegistry, LeaveTypeRules};
pub use types::{
    BalanceKey, DateRange, Days, DepartmentId, LeaveId, LeaveTypeId, PersonId, parse_date,
};
pub use validation::{MAX_YEAR, MIN_YEAR, validate_request, validate_text, validate_year};
pub use working_days::{
    AllCalendarDays, HolidayCalendar, WeekdaysOnly, WorkingDayPredicate, count_leave_days,
    count_working_days,
};
