// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::Days;
use time::Date;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// End date precedes start date.
    InvalidDateRange {
        /// The requested start date.
        start: Date,
        /// The requested end date.
        end: Date,
    },
    /// A leave request covers no countable working days.
    NonPositiveDays {
        /// The computed day count.
        days: Days,
    },
    /// The leave type requires a supporting document and none was attached.
    MissingDocument {
        /// The leave type name.
        leave_type: String,
    },
    /// A free-text field that must be filled in was empty.
    EmptyText {
        /// The name of the field.
        field: &'static str,
    },
    /// A quantity that must be non-negative was negative.
    NegativeQuantity {
        /// The name of the quantity.
        field: &'static str,
        /// The rejected value.
        value: Days,
    },
    /// A ledger decrement would take a quantity below zero.
    LedgerUnderflow {
        /// The ledger field being decremented.
        field: &'static str,
        /// The current value of the field.
        current: Days,
        /// The amount that was requested to be removed.
        requested: Days,
    },
    /// The leave status string is not recognized.
    InvalidLeaveStatus {
        /// The unrecognized status.
        status: String,
    },
    /// The leave action string is not recognized.
    InvalidLeaveAction {
        /// The unrecognized action.
        action: String,
    },
    /// A status transition is not permitted by the workflow table.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The attempted action.
        action: String,
        /// Why the transition was refused.
        reason: String,
    },
    /// Leave type configuration is invalid.
    InvalidLeaveType(String),
    /// A day quantity could not be parsed.
    InvalidDays {
        /// The raw value.
        value: String,
        /// The parse error.
        error: String,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Calendar year outside the supported range.
    InvalidYear(i32),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDateRange { start, end } => {
                write!(f, "End date {end} is before start date {start}")
            }
            Self::NonPositiveDays { days } => {
                write!(
                    f,
                    "Leave must cover at least one working day, computed {days}"
                )
            }
            Self::MissingDocument { leave_type } => {
                write!(
                    f,
                    "Leave type '{leave_type}' requires a supporting document"
                )
            }
            Self::EmptyText { field } => write!(f, "Field '{field}' cannot be empty"),
            Self::NegativeQuantity { field, value } => {
                write!(f, "{field} cannot be negative, got {value}")
            }
            Self::LedgerUnderflow {
                field,
                current,
                requested,
            } => {
                write!(
                    f,
                    "Cannot remove {requested} days from {field}: only {current} recorded"
                )
            }
            Self::InvalidLeaveStatus { status } => write!(f, "Invalid leave status: {status}"),
            Self::InvalidLeaveAction { action } => write!(f, "Invalid leave action: {action}"),
            Self::InvalidStatusTransition {
                from,
                action,
                reason,
            } => {
                write!(f, "Cannot {action} a {from} leave request: {reason}")
            }
            Self::InvalidLeaveType(msg) => write!(f, "Invalid leave type: {msg}"),
            Self::InvalidDays { value, error } => {
                write!(f, "Invalid day quantity '{value}': {error}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::InvalidYear(year) => {
                write!(f, "Year must be between 1900 and 2200, got {year}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
