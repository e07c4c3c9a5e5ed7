// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave requests.

use crate::leave_status::LeaveStatus;
use crate::types::{BalanceKey, DateRange, Days, LeaveId, LeaveTypeId, PersonId};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

/// Who covers for the person while they are away.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HandoverDetails {
    pub to_person_id: Option<PersonId>,
    pub notes: Option<String>,
}

/// How to reach the person while they are away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

/// Free-form information attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeaveDetails {
    /// Why the leave is requested.
    pub reason: String,
    /// Path to a supporting document, if one was uploaded.
    pub document_path: Option<String>,
    /// Urgent requests alert the manager immediately.
    pub is_urgent: bool,
    #[serde(default)]
    pub handover: HandoverDetails,
    pub emergency_contact: Option<EmergencyContact>,
}

impl LeaveDetails {
    /// Whether a non-blank document path is attached.
    #[must_use]
    pub fn has_document(&self) -> bool {
        self.document_path
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
    }
}

/// An unvalidated request as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub person_id: PersonId,
    pub leave_type_id: LeaveTypeId,
    pub start_date: Date,
    pub end_date: Date,
    pub details: LeaveDetails,
}

/// A request that passed input validation and has been sized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDraft {
    pub person_id: PersonId,
    pub leave_type_id: LeaveTypeId,
    pub range: DateRange,
    /// Working days covered by `range`.
    pub total_days: Days,
    pub details: LeaveDetails,
}

impl LeaveDraft {
    /// The balance this draft draws from: the year of its start date.
    #[must_use]
    pub fn balance_key(&self) -> BalanceKey {
        BalanceKey::new(self.person_id, self.leave_type_id, self.range.start().year())
    }
}

/// Recorded approval decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    /// The approver, or `None` when approved automatically.
    pub approved_by: Option<PersonId>,
    pub approved_at: OffsetDateTime,
    pub notes: Option<String>,
}

/// Recorded cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationRecord {
    pub cancelled_by: PersonId,
    pub reason: Option<String>,
    pub cancelled_at: OffsetDateTime,
}

/// A persisted leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leave {
    pub id: LeaveId,
    pub person_id: PersonId,
    pub leave_type_id: LeaveTypeId,
    pub range: DateRange,
    pub total_days: Days,
    /// The balance year, fixed at creation from the start date.
    pub balance_year: i32,
    pub details: LeaveDetails,
    pub status: LeaveStatus,
    pub request_date: OffsetDateTime,
    pub approval: Option<ApprovalRecord>,
    pub rejection_reason: Option<String>,
    pub cancellation: Option<CancellationRecord>,
    pub updated_at: OffsetDateTime,
}

impl Leave {
    /// Materializes a draft as a new pending request.
    #[must_use]
    pub fn from_draft(id: LeaveId, draft: LeaveDraft, now: OffsetDateTime) -> Self {
        let balance_year = draft.range.start().year();
        Self {
            id,
            person_id: draft.person_id,
            leave_type_id: draft.leave_type_id,
            range: draft.range,
            total_days: draft.total_days,
            balance_year,
            details: draft.details,
            status: LeaveStatus::Pending,
            request_date: now,
            approval: None,
            rejection_reason: None,
            cancellation: None,
            updated_at: now,
        }
    }

    /// The balance this request draws from.
    #[must_use]
    pub const fn balance_key(&self) -> BalanceKey {
        BalanceKey::new(self.person_id, self.leave_type_id, self.balance_year)
    }

    /// Whether the request currently holds its dates.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whether a manager alert falls due on `today`.
    ///
    /// True for pending or approved requests when `today` lies in the
    /// `notification_days` window immediately before the start date.
    #[must_use]
    pub fn notification_due(&self, today: Date, notification_days: u32) -> bool {
        if notification_days == 0
            || !matches!(self.status, LeaveStatus::Pending | LeaveStatus::Approved)
        {
            return false;
        }
        let start = self.range.start();
        let Some(window_open) = start.checked_sub(Duration::days(i64::from(notification_days)))
        else {
            return false;
        };
        window_open <= today && today < start
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn leave(status: LeaveStatus) -> Leave {
        let draft = LeaveDraft {
            person_id: PersonId::new(7),
            leave_type_id: LeaveTypeId::new(1),
            range: DateRange::new(date!(2024 - 07 - 10), date!(2024 - 07 - 12)).unwrap(),
            total_days: Days::whole(3),
            details: LeaveDetails::default(),
        };
        let mut leave = Leave::from_draft(LeaveId::new(1), draft, datetime!(2024-06-01 09:00 UTC));
        leave.status = status;
        leave
    }

    #[test]
    fn test_notification_window_is_half_open() {
        let l = leave(LeaveStatus::Pending);
        assert!(!l.notification_due(date!(2024 - 07 - 02), 7));
        assert!(l.notification_due(date!(2024 - 07 - 03), 7));
        assert!(l.notification_due(date!(2024 - 07 - 09), 7));
        assert!(!l.notification_due(date!(2024 - 07 - 10), 7));
    }

    #[test]
    fn test_notification_requires_lead_time_and_open_status() {
        assert!(!leave(LeaveStatus::Pending).notification_due(date!(2024 - 07 - 09), 0));
        assert!(leave(LeaveStatus::Approved).notification_due(date!(2024 - 07 - 09), 3));
        assert!(!leave(LeaveStatus::Rejected).notification_due(date!(2024 - 07 - 09), 3));
    }

    #[test]
    fn test_balance_year_follows_start_date() {
        let draft = LeaveDraft {
            person_id: PersonId::new(7),
            leave_type_id: LeaveTypeId::new(1),
            range: DateRange::new(date!(2024 - 12 - 30), date!(2025 - 01 - 03)).unwrap(),
            total_days: Days::whole(5),
            details: LeaveDetails::default(),
        };
        assert_eq!(draft.balance_key().year, 2024);
        let leave = Leave::from_draft(LeaveId::new(2), draft, datetime!(2024-12-01 09:00 UTC));
        assert_eq!(leave.balance_year, 2024);
        assert_eq!(leave.status, LeaveStatus::Pending);
    }
}
