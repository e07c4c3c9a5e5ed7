// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The `LeaveEngine` facade.
//!
//! The engine owns one store connection, a person directory, a clock and a
//! working-day policy. Every public operation:
//!
//! 1. Resolves people through the directory
//! 2. Validates input against domain rules
//! 3. Hands the mutation to the persistence layer, which runs it in a
//!    single transaction
//! 4. Retries transient store failures with exponential backoff
//! 5. Translates lower-layer errors into `ApiError`
//!
//! One engine serves one thread. Run one engine per worker against the same
//! database for concurrency.

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::directory::PersonDirectory;
use crate::error::{ApiError, translate_persistence_error};
use crate::request_response::{
    BalanceInfo, CreateLeaveResponse, LeaveInfo, ListLeavesRequest, ListLeavesResponse,
    NotificationInfo, ReserveResponse, SubmitLeaveRequest, TransitionLeaveResponse,
    UpdateLeaveResponse,
};
use leave_ledger::{Actor, Approver, BatchReport, Command, TransitionResult};
use leave_ledger_domain::{
    BalanceKey, DateRange, Days, DepartmentId, Leave, LeaveDraft, LeaveId, LeaveStatus,
    LeaveType, LeaveTypeId, LeaveTypeRules, PersonId, WeekdaysOnly, WorkingDayPredicate,
    validate_request,
};
use leave_ledger_persistence::{
    LeaveFilter, LeavePage, LeaveStatistics, LedgerEntry, MAX_PAGE_SIZE, Persistence,
    PersistenceError, StoredBalance,
};
use std::path::Path;
use time::Date;
use tracing::{debug, info, warn};

/// Runs `operation` against the store, retrying transient failures.
///
/// # Arguments
///
/// * `persistence` - The store
/// * `config` - Retry count and backoff
/// * `name` - Operation name for logging
/// * `operation` - The store call; it must be safe to repeat
///
/// # Errors
///
/// Returns the translated error of the last attempt.
fn with_retry<T>(
    persistence: &mut Persistence,
    config: &EngineConfig,
    name: &'static str,
    mut operation: impl FnMut(&mut Persistence) -> Result<T, PersistenceError>,
) -> Result<T, ApiError> {
    let mut attempt: u32 = 0;
    loop {
        match operation(persistence) {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < config.max_retries => {
                let backoff = config.backoff_for(attempt);
                attempt += 1;
                warn!(
                    operation = name,
                    attempt,
                    ?backoff,
                    error = %err,
                    "Transient store failure, retrying"
                );
                std::thread::sleep(backoff);
            }
            Err(err) => return Err(translate_persistence_error(err)),
        }
    }
}

/// Service facade over the leave ledger.
pub struct LeaveEngine<D: PersonDirectory, K: Clock> {
    persistence: Persistence,
    directory: D,
    clock: K,
    config: EngineConfig,
    working_days: Box<dyn WorkingDayPredicate>,
}

impl<D: PersonDirectory, K: Clock> LeaveEngine<D, K> {
    /// Creates an engine over an open store.
    ///
    /// Request lengths exclude weekends until `with_working_days` installs
    /// another policy.
    #[must_use]
    pub fn new(persistence: Persistence, directory: D, clock: K, config: EngineConfig) -> Self {
        Self {
            persistence,
            directory,
            clock,
            config,
            working_days: Box::new(WeekdaysOnly),
        }
    }

    /// Opens a `SQLite` database file, creating and migrating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_sqlite<P: AsRef<Path>>(
        path: P,
        directory: D,
        clock: K,
        config: EngineConfig,
    ) -> Result<Self, ApiError> {
        let persistence: Persistence =
            Persistence::new_with_file_and_timeout(path, config.busy_timeout_ms)
                .map_err(translate_persistence_error)?;
        Ok(Self::new(persistence, directory, clock, config))
    }

    /// Replaces the working-day policy used to size requests.
    #[must_use]
    pub fn with_working_days<W: WorkingDayPredicate + 'static>(mut self, policy: W) -> Self {
        self.working_days = Box::new(policy);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The business date according to the engine's clock.
    #[must_use]
    pub fn today(&self) -> Date {
        self.clock.today()
    }

    pub const fn directory_mut(&mut self) -> &mut D {
        &mut self.directory
    }

    pub const fn clock_mut(&mut self) -> &mut K {
        &mut self.clock
    }

    fn require_person(&self, person: PersonId) -> Result<(), ApiError> {
        if self.directory.contains(person) {
            Ok(())
        } else {
            Err(ApiError::ResourceNotFound {
                resource_type: String::from("Person"),
                message: format!("Person {person} is not in the directory"),
            })
        }
    }

    // ========================================================================
    // Leave Types
    // ========================================================================

    /// Registers a leave type.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or taken, or a rule value is negative.
    pub fn register_leave_type(
        &mut self,
        name: &str,
        rules: &LeaveTypeRules,
        is_active: bool,
    ) -> Result<LeaveType, ApiError> {
        let leave_type: LeaveType =
            with_retry(&mut self.persistence, &self.config, "register_leave_type", |p| {
                p.register_leave_type(name, rules, is_active)
            })?;
        info!(leave_type_id = %leave_type.id, name = %leave_type.name, "Leave type registered");
        Ok(leave_type)
    }

    /// Lists all leave types.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn list_leave_types(&mut self) -> Result<Vec<LeaveType>, ApiError> {
        with_retry(
            &mut self.persistence,
            &self.config,
            "list_leave_types",
            Persistence::list_leave_types,
        )
    }

    /// Activates or retires a leave type.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` if the type does not exist.
    pub fn set_leave_type_active(
        &mut self,
        id: LeaveTypeId,
        is_active: bool,
    ) -> Result<(), ApiError> {
        with_retry(&mut self.persistence, &self.config, "set_leave_type_active", |p| {
            p.set_leave_type_active(id, is_active)
        })?;
        info!(leave_type_id = %id, is_active, "Leave type activation changed");
        Ok(())
    }

    // ========================================================================
    // Balance Ledger
    // ========================================================================

    /// Retrieves a balance.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BalanceNotFound` if it has never been materialized.
    pub fn get_balance(&mut self, key: BalanceKey) -> Result<BalanceInfo, ApiError> {
        let stored: StoredBalance =
            with_retry(&mut self.persistence, &self.config, "get_balance", |p| {
                p.get_balance(key)
            })?;
        Ok(BalanceInfo::from(&stored.balance))
    }

    /// Retrieves a balance, materializing an empty one if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the leave type does not exist or the year is out of range.
    pub fn get_or_create_balance(&mut self, key: BalanceKey) -> Result<BalanceInfo, ApiError> {
        let now = self.clock.now();
        let stored: StoredBalance =
            with_retry(&mut self.persistence, &self.config, "get_or_create_balance", |p| {
                p.get_or_create_balance(key, now)
            })?;
        Ok(BalanceInfo::from(&stored.balance))
    }

    /// Sets the annual grant and monthly accrual rate of a balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the person is unknown or a value is negative.
    pub fn allocate_balance(
        &mut self,
        key: BalanceKey,
        allocated: Days,
        monthly_accrual: Days,
    ) -> Result<BalanceInfo, ApiError> {
        self.require_person(key.person_id)?;
        let now = self.clock.now();
        let stored: StoredBalance =
            with_retry(&mut self.persistence, &self.config, "allocate_balance", |p| {
                p.allocate_balance(key, allocated, monthly_accrual, now)
            })?;
        info!(%key, %allocated, %monthly_accrual, "Balance allocated");
        Ok(BalanceInfo::from(&stored.balance))
    }

    /// Adds days to pending outside the request workflow.
    ///
    /// The reason is recorded in the balance journal.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for a blank reason, or
    /// `ApiError::InsufficientBalance` in strict mode when the reservation
    /// overdraws the balance or exceeds the annual cap.
    pub fn reserve(
        &mut self,
        key: BalanceKey,
        days: Days,
        reason: &str,
    ) -> Result<ReserveResponse, ApiError> {
        let now = self.clock.now();
        let strict = self.config.strict_balance;
        let (stored, outcome) =
            with_retry(&mut self.persistence, &self.config, "reserve", |p| {
                p.reserve(key, days, reason, strict, now)
            })?;
        Ok(ReserveResponse {
            balance: BalanceInfo::from(&stored.balance),
            available_after: outcome.available_after,
            overdrawn: outcome.overdrawn,
            exceeds_annual_cap: outcome.exceeds_annual_cap,
        })
    }

    /// Moves days from pending to used.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BalanceNotFound` if the balance is absent,
    /// `ApiError::InvalidInput` for a blank reason, or a rule violation if
    /// fewer days are pending.
    pub fn commit_used(
        &mut self,
        key: BalanceKey,
        days: Days,
        reason: &str,
    ) -> Result<BalanceInfo, ApiError> {
        let now = self.clock.now();
        let stored: StoredBalance =
            with_retry(&mut self.persistence, &self.config, "commit_used", |p| {
                p.commit_used(key, days, reason, now)
            })?;
        Ok(BalanceInfo::from(&stored.balance))
    }

    /// Removes days from pending.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BalanceNotFound` if the balance is absent,
    /// `ApiError::InvalidInput` for a blank reason, or a rule violation if
    /// fewer days are pending.
    pub fn release_pending(
        &mut self,
        key: BalanceKey,
        days: Days,
        reason: &str,
    ) -> Result<BalanceInfo, ApiError> {
        let now = self.clock.now();
        let stored: StoredBalance =
            with_retry(&mut self.persistence, &self.config, "release_pending", |p| {
                p.release_pending(key, days, reason, now)
            })?;
        Ok(BalanceInfo::from(&stored.balance))
    }

    /// Removes days from used.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BalanceNotFound` if the balance is absent,
    /// `ApiError::InvalidInput` for a blank reason, or a rule violation if
    /// fewer days are used.
    pub fn reverse_used(
        &mut self,
        key: BalanceKey,
        days: Days,
        reason: &str,
    ) -> Result<BalanceInfo, ApiError> {
        let now = self.clock.now();
        let stored: StoredBalance =
            with_retry(&mut self.persistence, &self.config, "reverse_used", |p| {
                p.reverse_used(key, days, reason, now)
            })?;
        Ok(BalanceInfo::from(&stored.balance))
    }

    /// Adds a signed HR correction, dated today.
    ///
    /// # Errors
    ///
    /// Returns an error if the reason is blank.
    pub fn apply_manual_adjustment(
        &mut self,
        key: BalanceKey,
        delta: Days,
        reason: &str,
    ) -> Result<BalanceInfo, ApiError> {
        let now = self.clock.now();
        let today = self.clock.today();
        let stored: StoredBalance = with_retry(
            &mut self.persistence,
            &self.config,
            "apply_manual_adjustment",
            |p| p.apply_manual_adjustment(key, delta, reason, today, now),
        )?;
        info!(%key, %delta, "Manual adjustment applied");
        Ok(BalanceInfo::from(&stored.balance))
    }

    /// Marks a balance inactive.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BalanceNotFound` if absent.
    pub fn deactivate_balance(&mut self, key: BalanceKey) -> Result<BalanceInfo, ApiError> {
        let now = self.clock.now();
        let stored: StoredBalance =
            with_retry(&mut self.persistence, &self.config, "deactivate_balance", |p| {
                p.deactivate_balance(key, now)
            })?;
        info!(%key, "Balance deactivated");
        Ok(BalanceInfo::from(&stored.balance))
    }

    /// The journal of a balance in write order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BalanceNotFound` if absent.
    pub fn ledger_history(&mut self, key: BalanceKey) -> Result<Vec<LedgerEntry>, ApiError> {
        with_retry(&mut self.persistence, &self.config, "ledger_history", |p| {
            p.ledger_history(key)
        })
    }

    // ========================================================================
    // Leave Requests
    // ========================================================================

    /// Active requests of `person` overlapping `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns an error if `end` precedes `start`.
    pub fn find_overlapping(
        &mut self,
        person: PersonId,
        start: Date,
        end: Date,
        exclude: Option<LeaveId>,
    ) -> Result<Vec<LeaveInfo>, ApiError> {
        let range = DateRange::new(start, end)?;
        let leaves: Vec<Leave> =
            with_retry(&mut self.persistence, &self.config, "find_overlapping", |p| {
                p.find_overlapping(person, range, exclude)
            })?;
        Ok(leaves.iter().map(LeaveInfo::from).collect())
    }

    fn draft_for(&mut self, request: &SubmitLeaveRequest) -> Result<LeaveDraft, ApiError> {
        self.require_person(request.person_id)?;
        if let Some(handover) = request.handover_to {
            self.require_person(handover)?;
        }
        let leave_type_id = request.leave_type_id;
        let leave_type: LeaveType =
            with_retry(&mut self.persistence, &self.config, "get_leave_type", |p| {
                p.get_leave_type(leave_type_id)
            })?;
        Ok(validate_request(
            &request.to_domain(),
            &leave_type,
            self.working_days.as_ref(),
        )?)
    }

    /// Submits a leave request.
    ///
    /// The overlap check, the insert and the reservation commit together or
    /// not at all. Types that need no approval are approved immediately.
    ///
    /// # Arguments
    ///
    /// * `request` - The request
    ///
    /// # Returns
    ///
    /// The stored request, the balance after the reservation and the
    /// notification flags.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The person or handover person is unknown
    /// - The request fails validation
    /// - The dates overlap an active request of the same person
    /// - Strict mode refuses the reservation
    pub fn create_leave(
        &mut self,
        request: &SubmitLeaveRequest,
    ) -> Result<CreateLeaveResponse, ApiError> {
        let draft: LeaveDraft = self.draft_for(request)?;
        let now = self.clock.now();
        let strict = self.config.strict_balance;
        let created = with_retry(&mut self.persistence, &self.config, "create_leave", |p| {
            p.create_leave(draft.clone(), strict, now)
        })?;

        info!(
            leave_id = %created.leave.id,
            person_id = %created.leave.person_id,
            status = %created.leave.status,
            days = %created.leave.total_days,
            overdrawn = created.reservation.overdrawn,
            "Leave request created"
        );
        Ok(CreateLeaveResponse {
            message: format!(
                "Leave request {} created for {} days",
                created.leave.id, created.leave.total_days
            ),
            leave: LeaveInfo::from(&created.leave),
            balance: BalanceInfo::from(&created.balance),
            overdrawn: created.reservation.overdrawn,
            exceeds_annual_cap: created.reservation.exceeds_annual_cap,
            notify_manager: created.notify_manager,
        })
    }

    /// Edits a pending request, moving its reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is not pending, `actor` does not own
    /// it, validation fails or the new dates overlap another request.
    pub fn update_leave(
        &mut self,
        leave_id: LeaveId,
        request: &SubmitLeaveRequest,
        actor: &Actor,
    ) -> Result<UpdateLeaveResponse, ApiError> {
        let draft: LeaveDraft = self.draft_for(request)?;
        let now = self.clock.now();
        let strict = self.config.strict_balance;
        let updated = with_retry(&mut self.persistence, &self.config, "update_leave", |p| {
            p.update_leave(leave_id, draft.clone(), actor, strict, now)
        })?;

        info!(
            leave_id = %leave_id,
            actor = %actor.label(),
            days = %updated.leave.total_days,
            "Leave request updated"
        );
        Ok(UpdateLeaveResponse {
            message: format!("Leave request {leave_id} updated"),
            leave: LeaveInfo::from(&updated.leave),
            overdrawn: updated.reservation.overdrawn,
            exceeds_annual_cap: updated.reservation.exceeds_annual_cap,
        })
    }

    /// Applies a workflow command.
    ///
    /// # Arguments
    ///
    /// * `leave_id` - The request
    /// * `command` - The command
    /// * `actor` - Who is acting
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not exist, the action is not
    /// allowed from its status, or `actor` may not perform it.
    pub fn transition(
        &mut self,
        leave_id: LeaveId,
        command: Command,
        actor: &Actor,
    ) -> Result<TransitionLeaveResponse, ApiError> {
        let owner: Leave = with_retry(&mut self.persistence, &self.config, "get_leave", |p| {
            p.get_leave(leave_id)
        })?;
        let owner_department: Option<DepartmentId> =
            self.directory.department_of(owner.person_id);
        let today = self.clock.today();
        let now = self.clock.now();
        let action = command.action();

        let result: TransitionResult =
            with_retry(&mut self.persistence, &self.config, "transition_leave", |p| {
                p.transition_leave(
                    leave_id,
                    command.clone(),
                    actor,
                    owner_department,
                    today,
                    now,
                )
            })?;

        info!(
            leave_id = %leave_id,
            %action,
            actor = %actor.label(),
            from = %result.previous_status,
            to = %result.leave.status,
            "Leave request transitioned"
        );
        Ok(TransitionLeaveResponse {
            message: format!(
                "Leave request {leave_id} moved from {} to {}",
                result.previous_status, result.leave.status
            ),
            leave: LeaveInfo::from(&result.leave),
            previous_status: result.previous_status,
            notify_requester: result.notify_requester,
            notify_manager: result.notify_manager,
        })
    }

    /// Approves a pending request, moving its days to used.
    ///
    /// # Errors
    ///
    /// See `transition`.
    pub fn approve(
        &mut self,
        leave_id: LeaveId,
        approver: &Approver,
        notes: Option<String>,
    ) -> Result<TransitionLeaveResponse, ApiError> {
        self.transition(
            leave_id,
            Command::Approve { notes },
            &Actor::Approver(approver.clone()),
        )
    }

    /// Rejects a pending request, releasing its days.
    ///
    /// # Errors
    ///
    /// See `transition`. The reason must not be blank.
    pub fn reject(
        &mut self,
        leave_id: LeaveId,
        approver: &Approver,
        reason: &str,
    ) -> Result<TransitionLeaveResponse, ApiError> {
        self.transition(
            leave_id,
            Command::Reject {
                reason: reason.to_string(),
            },
            &Actor::Approver(approver.clone()),
        )
    }

    /// Cancels a pending request, or an approved one that has not started.
    ///
    /// # Errors
    ///
    /// See `transition`.
    pub fn cancel(
        &mut self,
        leave_id: LeaveId,
        actor: &Actor,
        reason: Option<String>,
    ) -> Result<TransitionLeaveResponse, ApiError> {
        self.transition(leave_id, Command::Cancel { reason }, actor)
    }

    /// Retrieves a request.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` if absent.
    pub fn get_leave(&mut self, leave_id: LeaveId) -> Result<LeaveInfo, ApiError> {
        let leave: Leave = with_retry(&mut self.persistence, &self.config, "get_leave", |p| {
            p.get_leave(leave_id)
        })?;
        Ok(LeaveInfo::from(&leave))
    }

    // ========================================================================
    // Queries & Reporting
    // ========================================================================

    fn people_filter(&self, request: &ListLeavesRequest) -> Option<Vec<PersonId>> {
        let members: Option<Vec<PersonId>> = request
            .department_id
            .map(|department| self.directory.members_of(department));
        match (request.person_id, members) {
            (None, None) => None,
            (Some(person), None) => Some(vec![person]),
            (None, Some(members)) => Some(members),
            (Some(person), Some(members)) => {
                Some(members.into_iter().filter(|m| *m == person).collect())
            }
        }
    }

    /// Lists one page of requests, ordered by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn list_leaves(
        &mut self,
        request: &ListLeavesRequest,
    ) -> Result<ListLeavesResponse, ApiError> {
        let filter = LeaveFilter {
            person_ids: self.people_filter(request),
            status: request.status,
            leave_type_id: request.leave_type_id,
            from: request.from,
            to: request.to,
        };
        let page: LeavePage = with_retry(&mut self.persistence, &self.config, "list_leaves", |p| {
            p.list_leaves(&filter, request.page, request.per_page)
        })?;
        Ok(ListLeavesResponse {
            leaves: page.items.iter().map(LeaveInfo::from).collect(),
            page: page.page,
            per_page: page.per_page,
            total: page.total,
        })
    }

    /// Pending requests the approver may decide, oldest start first.
    ///
    /// The approver's own requests are never included.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn pending_approvals(&mut self, approver: &Approver) -> Result<Vec<LeaveInfo>, ApiError> {
        let pending: Vec<Leave> =
            with_retry(&mut self.persistence, &self.config, "pending_approvals", |p| {
                p.leaves_in_status(&[LeaveStatus::Pending])
            })?;
        let mut visible: Vec<&Leave> = pending
            .iter()
            .filter(|leave| leave.person_id != approver.person_id)
            .filter(|leave| {
                approver.covers(leave.person_id, self.directory.department_of(leave.person_id))
            })
            .collect();
        visible.sort_by_key(|leave| (leave.range.start(), leave.id));
        debug!(approver = %approver.person_id, count = visible.len(), "Pending approvals listed");
        Ok(visible.into_iter().map(LeaveInfo::from).collect())
    }

    /// Requests of a department's members overlapping `from..=to`.
    ///
    /// Rejected and cancelled requests are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if `to` precedes `from` or the store fails.
    pub fn team_calendar(
        &mut self,
        department: DepartmentId,
        from: Date,
        to: Date,
    ) -> Result<Vec<LeaveInfo>, ApiError> {
        let window = DateRange::new(from, to)?;
        let members: Vec<PersonId> = self.directory.members_of(department);
        if members.is_empty() {
            return Ok(Vec::new());
        }
        let filter = LeaveFilter {
            person_ids: Some(members),
            status: None,
            leave_type_id: None,
            from: Some(window.start()),
            to: Some(window.end()),
        };

        let mut leaves: Vec<LeaveInfo> = Vec::new();
        let mut page: u32 = 1;
        loop {
            let batch: LeavePage =
                with_retry(&mut self.persistence, &self.config, "team_calendar", |p| {
                    p.list_leaves(&filter, page, MAX_PAGE_SIZE)
                })?;
            let fetched = batch.items.len();
            leaves.extend(
                batch
                    .items
                    .iter()
                    .filter(|l| !matches!(l.status, LeaveStatus::Rejected | LeaveStatus::Cancelled))
                    .map(LeaveInfo::from),
            );
            let seen = u64::from(page) * u64::from(MAX_PAGE_SIZE);
            if fetched == 0 || seen >= batch.total {
                break;
            }
            page += 1;
        }
        Ok(leaves)
    }

    /// Request counts per status and usage per type for a balance year.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn leave_statistics(&mut self, year: i32) -> Result<LeaveStatistics, ApiError> {
        with_retry(&mut self.persistence, &self.config, "leave_statistics", |p| {
            p.leave_statistics(year)
        })
    }

    /// Active balances of a year with negative available days.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn overused_balances(&mut self, year: i32) -> Result<Vec<BalanceInfo>, ApiError> {
        let balances: Vec<StoredBalance> =
            with_retry(&mut self.persistence, &self.config, "overused_balances", |p| {
                p.overused_balances(year)
            })?;
        Ok(balances
            .iter()
            .map(|stored| BalanceInfo::from(&stored.balance))
            .collect())
    }

    /// Manager alerts falling due today.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn notifications_due(&mut self) -> Result<Vec<NotificationInfo>, ApiError> {
        let today = self.clock.today();
        let due: Vec<Leave> =
            with_retry(&mut self.persistence, &self.config, "notifications_due", |p| {
                p.notifications_due(today)
            })?;
        Ok(due
            .iter()
            .map(|leave| NotificationInfo {
                leave: LeaveInfo::from(leave),
                department_id: self.directory.department_of(leave.person_id),
                days_until_start: (leave.range.start() - today).whole_days(),
            })
            .collect())
    }

    // ========================================================================
    // Batches
    // ========================================================================

    /// Credits accrual to every due balance of `cutoff`'s year.
    ///
    /// Each balance commits on its own and a transient failure retries only
    /// that balance.
    ///
    /// # Errors
    ///
    /// Returns the first error that outlives its retries; balances processed
    /// before it stay credited.
    pub fn run_accrual(&mut self, cutoff: Date) -> Result<BatchReport, ApiError> {
        let now = self.clock.now();
        let policy = self.config.accrual_policy();
        let keys: Vec<BalanceKey> =
            with_retry(&mut self.persistence, &self.config, "accrue", |p| {
                p.active_balance_keys(cutoff.year())
            })?;

        let mut report = BatchReport::default();
        for key in keys {
            let credited: Option<Days> =
                with_retry(&mut self.persistence, &self.config, "accrue", |p| {
                    p.accrue_balance(key, cutoff, &policy, now)
                })?;
            report.record(credited.is_some());
        }
        info!(%cutoff, %report, "Accrual run finished");
        Ok(report)
    }

    /// Carries unused days of `from_year` into the following year.
    ///
    /// # Errors
    ///
    /// Returns the first error that outlives its retries; balances processed
    /// before it stay carried.
    pub fn run_carry_over(&mut self, from_year: i32) -> Result<BatchReport, ApiError> {
        let now = self.clock.now();
        let keys: Vec<BalanceKey> =
            with_retry(&mut self.persistence, &self.config, "carry_over", |p| {
                p.active_balance_keys(from_year)
            })?;

        let mut report = BatchReport::default();
        for key in keys {
            let carried: Option<Days> =
                with_retry(&mut self.persistence, &self.config, "carry_over", |p| {
                    p.carry_over_balance(key, now)
                })?;
            report.record(carried.is_some());
        }
        info!(from_year, %report, "Carry-over run finished");
        Ok(report)
    }

    /// Starts and completes approved requests according to today's date.
    ///
    /// # Errors
    ///
    /// Returns the first error that outlives its retries; requests processed
    /// before it stay advanced.
    pub fn advance_statuses(&mut self) -> Result<BatchReport, ApiError> {
        let today = self.clock.today();
        let now = self.clock.now();
        let ids: Vec<LeaveId> =
            with_retry(&mut self.persistence, &self.config, "advance_statuses", |p| {
                p.advanceable_leave_ids()
            })?;

        let mut report = BatchReport::default();
        for leave_id in ids {
            let steps: Vec<TransitionResult> =
                with_retry(&mut self.persistence, &self.config, "advance_statuses", |p| {
                    p.advance_leave(leave_id, today, now)
                })?;
            report.record(!steps.is_empty());
        }
        info!(%today, %report, "Status advancement finished");
        Ok(report)
    }
}
