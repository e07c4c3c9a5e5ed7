// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::request_response::LeaveInfo;
use leave_ledger::CoreError;
use leave_ledger_domain::{Days, DomainError, LeaveTypeId, PersonId};
use leave_ledger_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The requested dates overlap active requests of the same person.
    OverlapConflict {
        /// The conflicting requests.
        conflicts: Vec<LeaveInfo>,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The action is not allowed from the request's current status.
    InvalidTransition {
        /// The current status.
        from: String,
        /// The attempted action.
        action: String,
        /// Why the action was refused.
        reason: String,
    },
    /// Strict balance checking refused the request.
    InsufficientBalance {
        /// Days requested.
        requested: Days,
        /// Days available before the request.
        available: Days,
        /// The annual cap, when the refusal came from it.
        annual_cap: Option<Days>,
    },
    /// No balance exists for the person, leave type and year.
    BalanceNotFound {
        person_id: PersonId,
        leave_type_id: LeaveTypeId,
        year: i32,
    },
    /// Authorization failed - the actor may not perform the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the actor was refused.
        reason: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The store was busy and retries were exhausted. The caller may retry later.
    TransientFailure {
        /// A description of the failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Whether the same call may succeed if repeated later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientFailure { .. })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::OverlapConflict { message, .. } => write!(f, "{message}"),
            Self::InvalidTransition {
                from,
                action,
                reason,
            } => write!(f, "Cannot {action} a {from} leave request: {reason}"),
            Self::InsufficientBalance {
                requested,
                available,
                annual_cap,
            } => match annual_cap {
                Some(cap) => write!(
                    f,
                    "Insufficient balance: {requested} days would exceed the annual cap of {cap} days"
                ),
                None => write!(
                    f,
                    "Insufficient balance: requested {requested} days, {available} available"
                ),
            },
            Self::BalanceNotFound {
                person_id,
                leave_type_id,
                year,
            } => write!(
                f,
                "No {year} balance for person {person_id} and leave type {leave_type_id}"
            ),
            Self::Unauthorized { action, reason } => {
                write!(f, "Unauthorized: cannot {action}: {reason}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::TransientFailure { message } => {
                write!(f, "Temporarily unavailable: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidDateRange { .. } => ApiError::InvalidInput {
            field: String::from("end_date"),
            message,
        },
        DomainError::NonPositiveDays { .. } => ApiError::DomainRuleViolation {
            rule: String::from("positive_days"),
            message,
        },
        DomainError::MissingDocument { .. } => ApiError::DomainRuleViolation {
            rule: String::from("document_required"),
            message,
        },
        DomainError::EmptyText { field } | DomainError::NegativeQuantity { field, .. } => {
            ApiError::InvalidInput {
                field: field.to_string(),
                message,
            }
        }
        DomainError::LedgerUnderflow { .. } => ApiError::DomainRuleViolation {
            rule: String::from("ledger_underflow"),
            message,
        },
        DomainError::InvalidLeaveStatus { .. } => ApiError::InvalidInput {
            field: String::from("status"),
            message,
        },
        DomainError::InvalidLeaveAction { .. } => ApiError::InvalidInput {
            field: String::from("action"),
            message,
        },
        DomainError::InvalidStatusTransition {
            from,
            action,
            reason,
        } => ApiError::InvalidTransition {
            from,
            action,
            reason,
        },
        DomainError::InvalidLeaveType(_) => ApiError::InvalidInput {
            field: String::from("leave_type"),
            message,
        },
        DomainError::InvalidDays { .. } => ApiError::InvalidInput {
            field: String::from("days"),
            message,
        },
        DomainError::DateParseError { .. } => ApiError::InvalidInput {
            field: String::from("date"),
            message,
        },
        DomainError::InvalidYear(_) => ApiError::InvalidInput {
            field: String::from("year"),
            message,
        },
        DomainError::DateArithmeticOverflow { .. } => ApiError::Internal { message },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    let message: String = err.to_string();
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::OverlapConflict { conflicts } => ApiError::OverlapConflict {
            conflicts: conflicts.iter().map(LeaveInfo::from).collect(),
            message,
        },
        CoreError::InvalidTransition {
            from,
            action,
            reason,
        } => ApiError::InvalidTransition {
            from: from.to_string(),
            action,
            reason,
        },
        CoreError::Unauthorized { action, reason } => ApiError::Unauthorized { action, reason },
        CoreError::InsufficientBalance {
            requested,
            available,
            annual_cap,
        } => ApiError::InsufficientBalance {
            requested,
            available,
            annual_cap,
        },
        CoreError::LeaveTypeInactive { .. } => ApiError::DomainRuleViolation {
            rule: String::from("leave_type_active"),
            message,
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Business refusals raised inside a transaction are unwrapped and
/// translated as core errors. Store failures never expose SQL details.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::Rejected(core_err) => translate_core_error(core_err),
        PersistenceError::BalanceNotFound(key) => ApiError::BalanceNotFound {
            person_id: key.person_id,
            leave_type_id: key.leave_type_id,
            year: key.year,
        },
        PersistenceError::LeaveNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Leave request"),
            message: format!("Leave request {id} does not exist"),
        },
        PersistenceError::LeaveTypeNotFound(what) => ApiError::ResourceNotFound {
            resource_type: String::from("Leave type"),
            message: what,
        },
        PersistenceError::NotFound(what) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: what,
        },
        PersistenceError::DuplicateLeaveType(name) => ApiError::InvalidInput {
            field: String::from("name"),
            message: format!("Leave type '{name}' already exists"),
        },
        err @ (PersistenceError::Transient(_) | PersistenceError::VersionConflict { .. }) => {
            ApiError::TransientFailure {
                message: err.to_string(),
            }
        }
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}
