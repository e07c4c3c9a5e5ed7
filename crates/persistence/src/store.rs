// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-neutral view of the generated query and mutation functions.
//!
//! `backend_fn!` produces a `_sqlite` and a `_mysql` copy of every
//! single-table operation. Orchestration code that chains several of them
//! inside one transaction is written once against `LedgerConnection`, which
//! both connection types implement by forwarding to their own copies.

use diesel::{MysqlConnection, SqliteConnection};
use leave_ledger_domain::{
    BalanceKey, DateRange, Leave, LeaveBalance, LeaveId, LeaveStatus, LeaveType, LeaveTypeId,
    LeaveTypeRules, PersonId,
};
use time::OffsetDateTime;

use crate::backend::PersistenceBackend;
use crate::data_models::{
    LeaveFilter, LeavePage, LedgerEntry, NewLedgerEntry, StoredBalance, StoredLeave,
};
use crate::error::PersistenceError;
use crate::{mutations, queries};

/// Every store operation the ledger workflows need.
pub trait LedgerConnection: PersistenceBackend {
    fn get_leave_type(&mut self, id: LeaveTypeId) -> Result<LeaveType, PersistenceError>;
    fn list_leave_types(&mut self) -> Result<Vec<LeaveType>, PersistenceError>;
    fn insert_leave_type(
        &mut self,
        name: &str,
        rules: &LeaveTypeRules,
        is_active: bool,
    ) -> Result<LeaveType, PersistenceError>;
    fn set_leave_type_active(
        &mut self,
        id: LeaveTypeId,
        is_active: bool,
    ) -> Result<(), PersistenceError>;

    fn find_balance(&mut self, key: BalanceKey) -> Result<Option<StoredBalance>, PersistenceError>;
    fn list_balances_for_year(
        &mut self,
        year: i32,
        active_only: bool,
    ) -> Result<Vec<StoredBalance>, PersistenceError>;
    fn insert_balance(
        &mut self,
        balance: &LeaveBalance,
        now: OffsetDateTime,
    ) -> Result<StoredBalance, PersistenceError>;
    fn update_balance(
        &mut self,
        stored: &StoredBalance,
        balance: &LeaveBalance,
        now: OffsetDateTime,
    ) -> Result<StoredBalance, PersistenceError>;

    fn insert_ledger_entry(&mut self, entry: &NewLedgerEntry) -> Result<(), PersistenceError>;
    fn list_ledger_entries(&mut self, balance_id: i64)
    -> Result<Vec<LedgerEntry>, PersistenceError>;

    fn find_leave(&mut self, id: LeaveId) -> Result<Option<StoredLeave>, PersistenceError>;
    fn find_overlapping(
        &mut self,
        person_id: PersonId,
        range: DateRange,
        exclude: Option<LeaveId>,
    ) -> Result<Vec<Leave>, PersistenceError>;
    fn list_leaves_in_status(
        &mut self,
        statuses: &[LeaveStatus],
    ) -> Result<Vec<Leave>, PersistenceError>;
    fn list_leaves_for_year(&mut self, year: i32) -> Result<Vec<Leave>, PersistenceError>;
    fn list_leaves(
        &mut self,
        filter: &LeaveFilter,
        page: u32,
        per_page: u32,
    ) -> Result<LeavePage, PersistenceError>;
    fn insert_leave(&mut self, leave: &Leave) -> Result<StoredLeave, PersistenceError>;
    fn update_leave(
        &mut self,
        stored: &StoredLeave,
        leave: &Leave,
    ) -> Result<StoredLeave, PersistenceError>;

    fn bump_person_guard(&mut self, person_id: PersonId) -> Result<i64, PersistenceError>;
}

macro_rules! impl_ledger_connection {
    ($conn:ty, $suffix:ident) => {
        pastey::paste! {
            impl LedgerConnection for $conn {
                fn get_leave_type(
                    &mut self,
                    id: LeaveTypeId,
                ) -> Result<LeaveType, PersistenceError> {
                    queries::leave_types::[<get_leave_type _ $suffix>](self, id)
                }

                fn list_leave_types(&mut self) -> Result<Vec<LeaveType>, PersistenceError> {
                    queries::leave_types::[<list_leave_types _ $suffix>](self)
                }

                fn insert_leave_type(
                    &mut self,
                    name: &str,
                    rules: &LeaveTypeRules,
                    is_active: bool,
                ) -> Result<LeaveType, PersistenceError> {
                    mutations::leave_types::[<insert_leave_type _ $suffix>](
                        self, name, rules, is_active,
                    )
                }

                fn set_leave_type_active(
                    &mut self,
                    id: LeaveTypeId,
                    is_active: bool,
                ) -> Result<(), PersistenceError> {
                    mutations::leave_types::[<set_leave_type_active _ $suffix>](self, id, is_active)
                }

                fn find_balance(
                    &mut self,
                    key: BalanceKey,
                ) -> Result<Option<StoredBalance>, PersistenceError> {
                    queries::balances::[<find_balance _ $suffix>](self, key)
                }

                fn list_balances_for_year(
                    &mut self,
                    year: i32,
                    active_only: bool,
                ) -> Result<Vec<StoredBalance>, PersistenceError> {
                    queries::balances::[<list_balances_for_year _ $suffix>](self, year, active_only)
                }

                fn insert_balance(
                    &mut self,
                    balance: &LeaveBalance,
                    now: OffsetDateTime,
                ) -> Result<StoredBalance, PersistenceError> {
                    mutations::balances::[<insert_balance _ $suffix>](self, balance, now)
                }

                fn update_balance(
                    &mut self,
                    stored: &StoredBalance,
                    balance: &LeaveBalance,
                    now: OffsetDateTime,
                ) -> Result<StoredBalance, PersistenceError> {
                    mutations::balances::[<update_balance _ $suffix>](self, stored, balance, now)
                }

                fn insert_ledger_entry(
                    &mut self,
                    entry: &NewLedgerEntry,
                ) -> Result<(), PersistenceError> {
                    mutations::journal::[<insert_ledger_entry _ $suffix>](self, entry)
                }

                fn list_ledger_entries(
                    &mut self,
                    balance_id: i64,
                ) -> Result<Vec<LedgerEntry>, PersistenceError> {
                    queries::journal::[<list_ledger_entries _ $suffix>](self, balance_id)
                }

                fn find_leave(
                    &mut self,
                    id: LeaveId,
                ) -> Result<Option<StoredLeave>, PersistenceError> {
                    queries::leaves::[<find_leave _ $suffix>](self, id)
                }

                fn find_overlapping(
                    &mut self,
                    person_id: PersonId,
                    range: DateRange,
                    exclude: Option<LeaveId>,
                ) -> Result<Vec<Leave>, PersistenceError> {
                    queries::leaves::[<find_overlapping _ $suffix>](self, person_id, range, exclude)
                }

                fn list_leaves_in_status(
                    &mut self,
                    statuses: &[LeaveStatus],
                ) -> Result<Vec<Leave>, PersistenceError> {
                    queries::leaves::[<list_leaves_in_status _ $suffix>](self, statuses)
                }

                fn list_leaves_for_year(
                    &mut self,
                    year: i32,
                ) -> Result<Vec<Leave>, PersistenceError> {
                    queries::leaves::[<list_leaves_for_year _ $suffix>](self, year)
                }

                fn list_leaves(
                    &mut self,
                    filter: &LeaveFilter,
                    page: u32,
                    per_page: u32,
                ) -> Result<LeavePage, PersistenceError> {
                    queries::leaves::[<list_leaves _ $suffix>](self, filter, page, per_page)
                }

                fn insert_leave(&mut self, leave: &Leave) -> Result<StoredLeave, PersistenceError> {
                    mutations::leaves::[<insert_leave _ $suffix>](self, leave)
                }

                fn update_leave(
                    &mut self,
                    stored: &StoredLeave,
                    leave: &Leave,
                ) -> Result<StoredLeave, PersistenceError> {
                    mutations::leaves::[<update_leave _ $suffix>](self, stored, leave)
                }

                fn bump_person_guard(
                    &mut self,
                    person_id: PersonId,
                ) -> Result<i64, PersistenceError> {
                    mutations::guards::[<bump_person_guard _ $suffix>](self, person_id)
                }
            }
        }
    };
}

impl_ledger_connection!(SqliteConnection, sqlite);
impl_ledger_connection!(MysqlConnection, mysql);
