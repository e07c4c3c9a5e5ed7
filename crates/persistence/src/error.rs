// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::DatabaseErrorKind;
use leave_ledger::CoreError;
use leave_ledger_domain::{BalanceKey, DomainError, LeaveId};

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// A stored row could not be turned back into a domain value.
    ReconstructionError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// No balance exists for the key.
    BalanceNotFound(BalanceKey),
    /// No request exists with the id.
    LeaveNotFound(LeaveId),
    /// No leave type matches the id or name.
    LeaveTypeNotFound(String),
    /// A leave type with the same name already exists.
    DuplicateLeaveType(String),
    /// A version-checked update matched no row.
    VersionConflict { table: &'static str, id: i64 },
    /// The store was busy, locked or deadlocked. Retrying may succeed.
    Transient(String),
    /// A business rule refused the operation inside the transaction.
    Rejected(CoreError),
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl PersistenceError {
    /// Whether retrying the whole operation may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::VersionConflict { .. })
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::ReconstructionError(msg) => write!(f, "Row reconstruction error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::BalanceNotFound(key) => write!(f, "Balance not found: {key}"),
            Self::LeaveNotFound(id) => write!(f, "Leave request not found: {id}"),
            Self::LeaveTypeNotFound(msg) => write!(f, "Leave type not found: {msg}"),
            Self::DuplicateLeaveType(name) => {
                write!(f, "Leave type '{name}' already exists")
            }
            Self::VersionConflict { table, id } => {
                write!(f, "Row {id} in {table} was modified concurrently")
            }
            Self::Transient(msg) => write!(f, "Transient store failure: {msg}"),
            Self::Rejected(err) => write!(f, "{err}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

/// Messages SQLite and MySQL use for lock contention.
const TRANSIENT_MARKERS: [&str; 5] = [
    "database is locked",
    "database table is locked",
    "busy",
    "deadlock",
    "lock wait timeout",
];

fn is_transient_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|marker| lower.contains(marker))
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(DatabaseErrorKind::SerializationFailure, info) => {
                Self::Transient(info.message().to_string())
            }
            diesel::result::Error::DatabaseError(_, ref info)
                if is_transient_message(info.message()) =>
            {
                Self::Transient(info.message().to_string())
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<CoreError> for PersistenceError {
    fn from(err: CoreError) -> Self {
        Self::Rejected(err)
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::Rejected(CoreError::DomainViolation(err))
    }
}
