// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion to and from domain values.
//!
//! Day quantities are stored as normalized decimal text, dates as ISO-8601
//! text and timestamps as RFC 3339 text. Booleans are stored as 0/1 integers.

use diesel::prelude::*;
use leave_ledger_domain::{
    ApprovalRecord, BalanceKey, CancellationRecord, DateRange, Days, EmergencyContact,
    HandoverDetails, Leave, LeaveBalance, LeaveDetails, LeaveId, LeaveStatus, LeaveType,
    LeaveTypeId, LeaveTypeRules, PersonId, parse_date,
};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};

use crate::diesel_schema::{leave_balances, leave_types, leaves, ledger_entries};
use crate::error::PersistenceError;

// ============================================================================
// Column codecs
// ============================================================================

pub(crate) fn bool_to_int(value: bool) -> i32 {
    i32::from(value)
}

pub(crate) const fn int_to_bool(value: i32) -> bool {
    value != 0
}

pub(crate) fn days_column(value: &str, column: &str) -> Result<Days, PersistenceError> {
    Days::from_str(value)
        .map_err(|e| PersistenceError::ReconstructionError(format!("{column}: {e}")))
}

pub(crate) fn date_column(value: &str, column: &str) -> Result<Date, PersistenceError> {
    parse_date(value).map_err(|e| PersistenceError::ReconstructionError(format!("{column}: {e}")))
}

pub(crate) fn optional_date_column(
    value: Option<&str>,
    column: &str,
) -> Result<Option<Date>, PersistenceError> {
    value.map(|v| date_column(v, column)).transpose()
}

pub(crate) fn timestamp_column(
    value: &str,
    column: &str,
) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::ReconstructionError(format!("{column}: {e}")))
}

pub(crate) fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}

// ============================================================================
// Leave types
// ============================================================================

/// Diesel Queryable struct for leave type rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = leave_types)]
pub(crate) struct LeaveTypeRow {
    pub leave_type_id: i64,
    pub name: String,
    pub requires_approval: i32,
    pub requires_document: i32,
    pub is_paid: i32,
    pub can_carry_over: i32,
    pub max_carry_over_days: String,
    pub max_days_per_year: String,
    pub notification_days: i32,
    pub counts_weekends: i32,
    pub is_active: i32,
}

impl LeaveTypeRow {
    pub(crate) fn into_domain(self) -> Result<LeaveType, PersistenceError> {
        let notification_days: u32 = self.notification_days.to_u32().ok_or_else(|| {
            PersistenceError::ReconstructionError(format!(
                "notification_days out of range: {}",
                self.notification_days
            ))
        })?;
        Ok(LeaveType {
            id: LeaveTypeId::new(self.leave_type_id),
            name: self.name,
            rules: LeaveTypeRules {
                requires_approval: int_to_bool(self.requires_approval),
                requires_document: int_to_bool(self.requires_document),
                is_paid: int_to_bool(self.is_paid),
                can_carry_over: int_to_bool(self.can_carry_over),
                max_carry_over_days: days_column(&self.max_carry_over_days, "max_carry_over_days")?,
                max_days_per_year: days_column(&self.max_days_per_year, "max_days_per_year")?,
                notification_days,
                counts_weekends: int_to_bool(self.counts_weekends),
            },
            is_active: int_to_bool(self.is_active),
        })
    }
}

/// Column values of a new leave type.
#[derive(Insertable)]
#[diesel(table_name = leave_types)]
pub(crate) struct LeaveTypeValues {
    pub name: String,
    pub requires_approval: i32,
    pub requires_document: i32,
    pub is_paid: i32,
    pub can_carry_over: i32,
    pub max_carry_over_days: String,
    pub max_days_per_year: String,
    pub notification_days: i32,
    pub counts_weekends: i32,
    pub is_active: i32,
}

impl LeaveTypeValues {
    pub(crate) fn from_domain(
        name: &str,
        rules: &LeaveTypeRules,
        is_active: bool,
    ) -> Result<Self, PersistenceError> {
        let notification_days: i32 = rules.notification_days.to_i32().ok_or_else(|| {
            PersistenceError::Other(format!(
                "notification_days out of range: {}",
                rules.notification_days
            ))
        })?;
        Ok(Self {
            name: name.to_string(),
            requires_approval: bool_to_int(rules.requires_approval),
            requires_document: bool_to_int(rules.requires_document),
            is_paid: bool_to_int(rules.is_paid),
            can_carry_over: bool_to_int(rules.can_carry_over),
            max_carry_over_days: rules.max_carry_over_days.to_string(),
            max_days_per_year: rules.max_days_per_year.to_string(),
            notification_days,
            counts_weekends: bool_to_int(rules.counts_weekends),
            is_active: bool_to_int(is_active),
        })
    }
}

// ============================================================================
// Balances
// ============================================================================

/// A balance together with its row identity and optimistic lock counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBalance {
    /// Surrogate row id.
    pub balance_id: i64,
    /// Incremented on every write.
    pub version: i64,
    /// The balance components.
    pub balance: LeaveBalance,
}

/// Diesel Queryable struct for balance rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = leave_balances)]
pub(crate) struct BalanceRow {
    pub balance_id: i64,
    pub person_id: i64,
    pub leave_type_id: i64,
    pub year: i32,
    pub allocated_days: String,
    pub carried_over_days: String,
    pub monthly_accrual: String,
    pub accrued_to_date: String,
    pub manual_adjustment: String,
    pub adjustment_reason: Option<String>,
    pub adjustment_date: Option<String>,
    pub used_days: String,
    pub pending_days: String,
    pub last_accrual_date: Option<String>,
    pub is_active: i32,
    pub version: i64,
}

impl BalanceRow {
    pub(crate) fn into_domain(self) -> Result<StoredBalance, PersistenceError> {
        let balance = LeaveBalance {
            key: BalanceKey::new(
                PersonId::new(self.person_id),
                LeaveTypeId::new(self.leave_type_id),
                self.year,
            ),
            allocated_days: days_column(&self.allocated_days, "allocated_days")?,
            carried_over_days: days_column(&self.carried_over_days, "carried_over_days")?,
            monthly_accrual: days_column(&self.monthly_accrual, "monthly_accrual")?,
            accrued_to_date: days_column(&self.accrued_to_date, "accrued_to_date")?,
            manual_adjustment: days_column(&self.manual_adjustment, "manual_adjustment")?,
            adjustment_reason: self.adjustment_reason,
            adjustment_date: optional_date_column(
                self.adjustment_date.as_deref(),
                "adjustment_date",
            )?,
            used_days: days_column(&self.used_days, "used_days")?,
            pending_days: days_column(&self.pending_days, "pending_days")?,
            last_accrual_date: optional_date_column(
                self.last_accrual_date.as_deref(),
                "last_accrual_date",
            )?,
            is_active: int_to_bool(self.is_active),
        };
        Ok(StoredBalance {
            balance_id: self.balance_id,
            version: self.version,
            balance,
        })
    }
}

/// Column values written for a balance, including the next version.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = leave_balances, treat_none_as_null = true)]
pub(crate) struct BalanceValues {
    pub person_id: i64,
    pub leave_type_id: i64,
    pub year: i32,
    pub allocated_days: String,
    pub carried_over_days: String,
    pub monthly_accrual: String,
    pub accrued_to_date: String,
    pub manual_adjustment: String,
    pub adjustment_reason: Option<String>,
    pub adjustment_date: Option<String>,
    pub used_days: String,
    pub pending_days: String,
    pub last_accrual_date: Option<String>,
    pub is_active: i32,
    pub version: i64,
    pub updated_at: String,
}

impl BalanceValues {
    pub(crate) fn from_domain(
        balance: &LeaveBalance,
        version: i64,
        now: OffsetDateTime,
    ) -> Result<Self, PersistenceError> {
        Ok(Self {
            person_id: balance.key.person_id.value(),
            leave_type_id: balance.key.leave_type_id.value(),
            year: balance.key.year,
            allocated_days: balance.allocated_days.to_string(),
            carried_over_days: balance.carried_over_days.to_string(),
            monthly_accrual: balance.monthly_accrual.to_string(),
            accrued_to_date: balance.accrued_to_date.to_string(),
            manual_adjustment: balance.manual_adjustment.to_string(),
            adjustment_reason: balance.adjustment_reason.clone(),
            adjustment_date: balance.adjustment_date.map(|d| d.to_string()),
            used_days: balance.used_days.to_string(),
            pending_days: balance.pending_days.to_string(),
            last_accrual_date: balance.last_accrual_date.map(|d| d.to_string()),
            is_active: bool_to_int(balance.is_active),
            version,
            updated_at: format_timestamp(now)?,
        })
    }
}

// ============================================================================
// Leave requests
// ============================================================================

/// Diesel Queryable struct for leave request rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = leaves)]
pub(crate) struct LeaveRow {
    pub leave_id: i64,
    pub person_id: i64,
    pub leave_type_id: i64,
    pub start_date: String,
    pub end_date: String,
    pub total_days: String,
    pub balance_year: i32,
    pub reason: String,
    pub document_path: Option<String>,
    pub is_urgent: i32,
    pub status: String,
    pub request_date: String,
    pub approved_by_id: Option<i64>,
    pub approved_at: Option<String>,
    pub approval_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub cancelled_by_id: Option<i64>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<String>,
    pub handover_to_person_id: Option<i64>,
    pub handover_notes: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub updated_at: String,
    pub version: i64,
}

impl LeaveRow {
    pub(crate) fn into_domain(self) -> Result<(Leave, i64), PersistenceError> {
        let start: Date = date_column(&self.start_date, "start_date")?;
        let end: Date = date_column(&self.end_date, "end_date")?;
        let range: DateRange = DateRange::new(start, end).map_err(|e| {
            PersistenceError::ReconstructionError(format!("leave {}: {e}", self.leave_id))
        })?;
        let status: LeaveStatus = LeaveStatus::from_str(&self.status)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

        let approval: Option<ApprovalRecord> = match self.approved_at.as_deref() {
            Some(at) => Some(ApprovalRecord {
                approved_by: self.approved_by_id.map(PersonId::new),
                approved_at: timestamp_column(at, "approved_at")?,
                notes: self.approval_notes,
            }),
            None => None,
        };

        let cancellation: Option<CancellationRecord> =
            match (self.cancelled_by_id, self.cancelled_at.as_deref()) {
                (Some(by), Some(at)) => Some(CancellationRecord {
                    cancelled_by: PersonId::new(by),
                    reason: self.cancellation_reason,
                    cancelled_at: timestamp_column(at, "cancelled_at")?,
                }),
                _ => None,
            };

        let emergency_contact: Option<EmergencyContact> =
            match (self.emergency_contact_name, self.emergency_contact_phone) {
                (Some(name), Some(phone)) => Some(EmergencyContact { name, phone }),
                _ => None,
            };

        let leave = Leave {
            id: LeaveId::new(self.leave_id),
            person_id: PersonId::new(self.person_id),
            leave_type_id: LeaveTypeId::new(self.leave_type_id),
            range,
            total_days: days_column(&self.total_days, "total_days")?,
            balance_year: self.balance_year,
            details: LeaveDetails {
                reason: self.reason,
                document_path: self.document_path,
                is_urgent: int_to_bool(self.is_urgent),
                handover: HandoverDetails {
                    to_person_id: self.handover_to_person_id.map(PersonId::new),
                    notes: self.handover_notes,
                },
                emergency_contact,
            },
            status,
            request_date: timestamp_column(&self.request_date, "request_date")?,
            approval,
            rejection_reason: self.rejection_reason,
            cancellation,
            updated_at: timestamp_column(&self.updated_at, "updated_at")?,
        };
        Ok((leave, self.version))
    }
}

/// Column values written for a leave request, including the next version.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = leaves, treat_none_as_null = true)]
pub(crate) struct LeaveValues {
    pub person_id: i64,
    pub leave_type_id: i64,
    pub start_date: String,
    pub end_date: String,
    pub total_days: String,
    pub balance_year: i32,
    pub reason: String,
    pub document_path: Option<String>,
    pub is_urgent: i32,
    pub status: String,
    pub request_date: String,
    pub approved_by_id: Option<i64>,
    pub approved_at: Option<String>,
    pub approval_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub cancelled_by_id: Option<i64>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<String>,
    pub handover_to_person_id: Option<i64>,
    pub handover_notes: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub updated_at: String,
    pub version: i64,
}

impl LeaveValues {
    pub(crate) fn from_domain(leave: &Leave, version: i64) -> Result<Self, PersistenceError> {
        let approved_at: Option<String> = leave
            .approval
            .as_ref()
            .map(|a| format_timestamp(a.approved_at))
            .transpose()?;
        let cancelled_at: Option<String> = leave
            .cancellation
            .as_ref()
            .map(|c| format_timestamp(c.cancelled_at))
            .transpose()?;
        let details: &LeaveDetails = &leave.details;

        Ok(Self {
            person_id: leave.person_id.value(),
            leave_type_id: leave.leave_type_id.value(),
            start_date: leave.range.start().to_string(),
            end_date: leave.range.end().to_string(),
            total_days: leave.total_days.to_string(),
            balance_year: leave.balance_year,
            reason: details.reason.clone(),
            document_path: details.document_path.clone(),
            is_urgent: bool_to_int(details.is_urgent),
            status: leave.status.as_str().to_string(),
            request_date: format_timestamp(leave.request_date)?,
            approved_by_id: leave
                .approval
                .as_ref()
                .and_then(|a| a.approved_by)
                .map(|p| p.value()),
            approved_at,
            approval_notes: leave.approval.as_ref().and_then(|a| a.notes.clone()),
            rejection_reason: leave.rejection_reason.clone(),
            cancelled_by_id: leave.cancellation.as_ref().map(|c| c.cancelled_by.value()),
            cancellation_reason: leave.cancellation.as_ref().and_then(|c| c.reason.clone()),
            cancelled_at,
            handover_to_person_id: details.handover.to_person_id.map(|p| p.value()),
            handover_notes: details.handover.notes.clone(),
            emergency_contact_name: details.emergency_contact.as_ref().map(|c| c.name.clone()),
            emergency_contact_phone: details
                .emergency_contact
                .as_ref()
                .map(|c| c.phone.clone()),
            updated_at: format_timestamp(leave.updated_at)?,
            version,
        })
    }
}

/// A request together with its optimistic lock counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredLeave {
    pub leave: Leave,
    pub version: i64,
}

// ============================================================================
// Journal
// ============================================================================

/// What a journal row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryKind {
    /// HR set the annual grant.
    Allocation,
    /// Days moved into pending.
    Reserve,
    /// Days moved from pending to used.
    CommitUsed,
    /// Days removed from pending.
    ReleasePending,
    /// Days removed from used.
    ReverseUsed,
    /// Signed HR correction.
    ManualAdjustment,
    /// Periodic accrual credit.
    Accrual,
    /// Amount carried in from the previous year.
    CarryOver,
}

impl LedgerEntryKind {
    /// Stored column value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Allocation => "allocation",
            Self::Reserve => "reserve",
            Self::CommitUsed => "commit_used",
            Self::ReleasePending => "release_pending",
            Self::ReverseUsed => "reverse_used",
            Self::ManualAdjustment => "manual_adjustment",
            Self::Accrual => "accrual",
            Self::CarryOver => "carry_over",
        }
    }
}

impl FromStr for LedgerEntryKind {
    type Err = PersistenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allocation" => Ok(Self::Allocation),
            "reserve" => Ok(Self::Reserve),
            "commit_used" => Ok(Self::CommitUsed),
            "release_pending" => Ok(Self::ReleasePending),
            "reverse_used" => Ok(Self::ReverseUsed),
            "manual_adjustment" => Ok(Self::ManualAdjustment),
            "accrual" => Ok(Self::Accrual),
            "carry_over" => Ok(Self::CarryOver),
            other => Err(PersistenceError::ReconstructionError(format!(
                "unknown ledger entry kind: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for LedgerEntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One journaled change to a balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Row id, increasing in write order.
    pub entry_id: i64,
    /// The balance row that changed.
    pub balance_id: i64,
    /// The request that justified the change, if any.
    pub leave_id: Option<LeaveId>,
    /// What happened.
    pub kind: LedgerEntryKind,
    /// Signed amount.
    pub days: Days,
    /// Free-text justification.
    pub reason: Option<String>,
    /// When it happened.
    pub recorded_at: OffsetDateTime,
}

/// Diesel Queryable struct for journal rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = ledger_entries)]
pub(crate) struct LedgerEntryRow {
    pub entry_id: i64,
    pub balance_id: i64,
    pub leave_id: Option<i64>,
    pub kind: String,
    pub days: String,
    pub reason: Option<String>,
    pub recorded_at: String,
}

impl LedgerEntryRow {
    pub(crate) fn into_domain(self) -> Result<LedgerEntry, PersistenceError> {
        Ok(LedgerEntry {
            entry_id: self.entry_id,
            balance_id: self.balance_id,
            leave_id: self.leave_id.map(LeaveId::new),
            kind: LedgerEntryKind::from_str(&self.kind)?,
            days: days_column(&self.days, "days")?,
            reason: self.reason,
            recorded_at: timestamp_column(&self.recorded_at, "recorded_at")?,
        })
    }
}

// ============================================================================
// Listing and reports
// ============================================================================

/// Upper bound on `LeaveFilter::per_page`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Filter for listing leave requests.
///
/// Every field is optional; an empty filter lists everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveFilter {
    /// Only requests of these people. `Some(empty)` matches nothing.
    pub person_ids: Option<Vec<PersonId>>,
    /// Only requests in this status.
    pub status: Option<LeaveStatus>,
    /// Only requests of this type.
    pub leave_type_id: Option<LeaveTypeId>,
    /// Only requests ending on or after this date.
    pub from: Option<Date>,
    /// Only requests starting on or before this date.
    pub to: Option<Date>,
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePage {
    /// The requests on this page, ordered by start date then id.
    pub items: Vec<Leave>,
    /// 1-based page number.
    pub page: u32,
    /// Page size used.
    pub per_page: u32,
    /// Matching requests across all pages.
    pub total: u64,
}

/// Per-type usage within `LeaveStatistics`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypeUsage {
    /// Requests that were approved: `approved`, `in_progress` or `completed`.
    pub approved_requests: u64,
    /// Used days across the type's balances for the year.
    pub used_days: Days,
}

/// Year-level request counts and usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveStatistics {
    /// The balance year reported on.
    pub year: i32,
    /// Request count per status.
    pub by_status: BTreeMap<LeaveStatus, u64>,
    /// Usage per leave type id.
    pub by_type: BTreeMap<LeaveTypeId, LeaveTypeUsage>,
}

/// A journal row to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewLedgerEntry {
    pub balance_id: i64,
    pub leave_id: Option<LeaveId>,
    pub kind: LedgerEntryKind,
    pub days: Days,
    pub reason: Option<String>,
    pub recorded_at: OffsetDateTime,
}
