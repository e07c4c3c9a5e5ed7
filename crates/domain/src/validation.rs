// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::leave::{LeaveDraft, LeaveRequest};
use crate::leave_type::LeaveType;
use crate::types::DateRange;
use crate::working_days::{WorkingDayPredicate, count_leave_days};

/// Earliest supported balance year.
pub const MIN_YEAR: i32 = 1900;
/// Latest supported balance year.
pub const MAX_YEAR: i32 = 2200;

/// Validates that a free-text field is not blank.
///
/// # Returns
///
/// The trimmed value.
///
/// # Errors
///
/// Returns `DomainError::EmptyText` if the value is empty or whitespace.
pub fn validate_text<'a>(field: &'static str, value: &'a str) -> Result<&'a str, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyText { field });
    }
    Ok(trimmed)
}

/// Validates that a balance year is a plausible calendar year.
///
/// # Errors
///
/// Returns `DomainError::InvalidYear` outside 1900..=2200.
pub const fn validate_year(year: i32) -> Result<(), DomainError> {
    if year < MIN_YEAR || year > MAX_YEAR {
        return Err(DomainError::InvalidYear(year));
    }
    Ok(())
}

/// Validates a submitted request against its leave type and sizes it.
///
/// This performs input validation only. Overlap, balance and leave type
/// activity checks need stored state and happen in the workflow.
///
/// # Arguments
///
/// * `request` - The submitted request
/// * `leave_type` - The requested leave type
/// * `predicate` - Working-day policy used to size the request
///
/// # Errors
///
/// Returns an error if:
/// - The end date precedes the start date
/// - The start year is outside the supported range
/// - The reason is blank
/// - The leave type requires a document and none is attached
/// - The range covers no working days
pub fn validate_request(
    request: &LeaveRequest,
    leave_type: &LeaveType,
    predicate: &dyn WorkingDayPredicate,
) -> Result<LeaveDraft, DomainError> {
    // Rule: end >= start
    let range = DateRange::new(request.start_date, request.end_date)?;

    validate_year(range.start().year())?;
    validate_text("reason", &request.details.reason)?;

    // Rule: document checked before anything touches the ledger
    if leave_type.rules.requires_document && !request.details.has_document() {
        return Err(DomainError::MissingDocument {
            leave_type: leave_type.name.clone(),
        });
    }

    // Rule: total_days > 0
    let total_days = count_leave_days(&range, &leave_type.rules, predicate);
    if !total_days.is_positive() {
        return Err(DomainError::NonPositiveDays { days: total_days });
    }

    let mut details = request.details.clone();
    details.reason = details.reason.trim().to_string();

    Ok(LeaveDraft {
        person_id: request.person_id,
        leave_type_id: request.leave_type_id,
        range,
        total_days,
        details,
    })
}
