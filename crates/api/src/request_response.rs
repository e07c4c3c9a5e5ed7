// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! These types are the contract with callers. They are kept separate from
//! the domain types so storage details never leak into responses.

use leave_ledger_domain::{
    DepartmentId, Days, EmergencyContact, HandoverDetails, Leave, LeaveBalance, LeaveDetails,
    LeaveId, LeaveRequest, LeaveStatus, LeaveTypeId, PersonId,
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// API request to submit or edit a leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitLeaveRequest {
    /// The requester.
    pub person_id: PersonId,
    /// The leave category.
    pub leave_type_id: LeaveTypeId,
    /// First day of leave (inclusive).
    pub start_date: Date,
    /// Last day of leave (inclusive).
    pub end_date: Date,
    /// Why the leave is requested.
    pub reason: String,
    /// Reference to a supporting document.
    #[serde(default)]
    pub document_path: Option<String>,
    /// The manager should be alerted immediately.
    #[serde(default)]
    pub is_urgent: bool,
    /// Who covers the requester's work.
    #[serde(default)]
    pub handover_to: Option<PersonId>,
    /// Notes for the person covering.
    #[serde(default)]
    pub handover_notes: Option<String>,
    /// Emergency contact while away.
    #[serde(default)]
    pub emergency_contact: Option<EmergencyContact>,
}

impl SubmitLeaveRequest {
    /// Converts into the domain request.
    #[must_use]
    pub fn to_domain(&self) -> LeaveRequest {
        LeaveRequest {
            person_id: self.person_id,
            leave_type_id: self.leave_type_id,
            start_date: self.start_date,
            end_date: self.end_date,
            details: LeaveDetails {
                reason: self.reason.clone(),
                document_path: self.document_path.clone(),
                is_urgent: self.is_urgent,
                handover: HandoverDetails {
                    to_person_id: self.handover_to,
                    notes: self.handover_notes.clone(),
                },
                emergency_contact: self.emergency_contact.clone(),
            },
        }
    }
}

/// A leave request as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveInfo {
    pub leave_id: LeaveId,
    pub person_id: PersonId,
    pub leave_type_id: LeaveTypeId,
    pub start_date: Date,
    pub end_date: Date,
    pub total_days: Days,
    /// The balance year the request draws from.
    pub balance_year: i32,
    pub status: LeaveStatus,
    pub reason: String,
    pub is_urgent: bool,
    pub request_date: OffsetDateTime,
    /// `None` for requests approved automatically.
    pub approved_by: Option<PersonId>,
    pub approved_at: Option<OffsetDateTime>,
    pub approval_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub cancelled_by: Option<PersonId>,
    pub cancellation_reason: Option<String>,
}

impl From<&Leave> for LeaveInfo {
    fn from(leave: &Leave) -> Self {
        Self {
            leave_id: leave.id,
            person_id: leave.person_id,
            leave_type_id: leave.leave_type_id,
            start_date: leave.range.start(),
            end_date: leave.range.end(),
            total_days: leave.total_days,
            balance_year: leave.balance_year,
            status: leave.status,
            reason: leave.details.reason.clone(),
            is_urgent: leave.details.is_urgent,
            request_date: leave.request_date,
            approved_by: leave.approval.as_ref().and_then(|a| a.approved_by),
            approved_at: leave.approval.as_ref().map(|a| a.approved_at),
            approval_notes: leave.approval.as_ref().and_then(|a| a.notes.clone()),
            rejection_reason: leave.rejection_reason.clone(),
            cancelled_by: leave.cancellation.as_ref().map(|c| c.cancelled_by),
            cancellation_reason: leave.cancellation.as_ref().and_then(|c| c.reason.clone()),
        }
    }
}

/// A balance with its derived quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceInfo {
    pub person_id: PersonId,
    pub leave_type_id: LeaveTypeId,
    pub year: i32,
    pub allocated_days: Days,
    pub carried_over_days: Days,
    pub monthly_accrual: Days,
    pub accrued_to_date: Days,
    pub manual_adjustment: Days,
    pub adjustment_reason: Option<String>,
    pub used_days: Days,
    pub pending_days: Days,
    pub last_accrual_date: Option<Date>,
    /// Recomputed on every read.
    pub available_days: Days,
    /// Available days are negative.
    pub is_overused: bool,
    pub is_active: bool,
}

impl From<&LeaveBalance> for BalanceInfo {
    fn from(balance: &LeaveBalance) -> Self {
        Self {
            person_id: balance.key.person_id,
            leave_type_id: balance.key.leave_type_id,
            year: balance.key.year,
            allocated_days: balance.allocated_days,
            carried_over_days: balance.carried_over_days,
            monthly_accrual: balance.monthly_accrual,
            accrued_to_date: balance.accrued_to_date,
            manual_adjustment: balance.manual_adjustment,
            adjustment_reason: balance.adjustment_reason.clone(),
            used_days: balance.used_days,
            pending_days: balance.pending_days,
            last_accrual_date: balance.last_accrual_date,
            available_days: balance.available_days(),
            is_overused: balance.is_overused(),
            is_active: balance.is_active,
        }
    }
}

/// API response for a created request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLeaveResponse {
    pub leave: LeaveInfo,
    /// The balance after the reservation.
    pub balance: BalanceInfo,
    /// The reservation took the balance below zero.
    pub overdrawn: bool,
    /// The reservation exceeds the type's annual cap.
    pub exceeds_annual_cap: bool,
    /// The manager should be alerted now.
    pub notify_manager: bool,
    /// A success message.
    pub message: String,
}

/// API response for an edited request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLeaveResponse {
    pub leave: LeaveInfo,
    pub overdrawn: bool,
    pub exceeds_annual_cap: bool,
    /// A success message.
    pub message: String,
}

/// API response for approve, reject, cancel, begin and complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionLeaveResponse {
    pub leave: LeaveInfo,
    pub previous_status: LeaveStatus,
    /// The requester should be told about the decision.
    pub notify_requester: bool,
    /// The manager should be alerted.
    pub notify_manager: bool,
    /// A success message.
    pub message: String,
}

/// API response for a direct reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveResponse {
    pub balance: BalanceInfo,
    pub available_after: Days,
    pub overdrawn: bool,
    pub exceeds_annual_cap: bool,
}

/// API request to list leave requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLeavesRequest {
    /// Only this person's requests.
    #[serde(default)]
    pub person_id: Option<PersonId>,
    /// Only requests of this department's members.
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
    #[serde(default)]
    pub status: Option<LeaveStatus>,
    #[serde(default)]
    pub leave_type_id: Option<LeaveTypeId>,
    /// Only requests ending on or after this date.
    #[serde(default)]
    pub from: Option<Date>,
    /// Only requests starting on or before this date.
    #[serde(default)]
    pub to: Option<Date>,
    /// 1-based page number.
    pub page: u32,
    /// Page size, at most 100.
    pub per_page: u32,
}

impl Default for ListLeavesRequest {
    fn default() -> Self {
        Self {
            person_id: None,
            department_id: None,
            status: None,
            leave_type_id: None,
            from: None,
            to: None,
            page: 1,
            per_page: 20,
        }
    }
}

/// API response for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLeavesResponse {
    pub leaves: Vec<LeaveInfo>,
    pub page: u32,
    pub per_page: u32,
    /// Matching requests across all pages.
    pub total: u64,
}

/// A manager alert that falls due today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationInfo {
    pub leave: LeaveInfo,
    /// The requester's department, for routing.
    pub department_id: Option<DepartmentId>,
    /// Calendar days until the leave starts.
    pub days_until_start: i64,
}
