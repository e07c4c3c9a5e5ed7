// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave request queries.
//!
//! Dates are stored as ISO-8601 text, so string comparison in SQL orders
//! them correctly and the overlap predicate can run in the database.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use leave_ledger_domain::{DateRange, Leave, LeaveId, LeaveStatus, PersonId};
use num_traits::ToPrimitive;
use tracing::debug;

use crate::data_models::{LeaveFilter, LeavePage, LeaveRow, MAX_PAGE_SIZE, StoredLeave};
use crate::diesel_schema::leaves;
use crate::error::PersistenceError;

fn status_values(statuses: &[LeaveStatus]) -> Vec<&'static str> {
    statuses.iter().map(LeaveStatus::as_str).collect()
}

fn rows_into_leaves(rows: Vec<LeaveRow>) -> Result<Vec<Leave>, PersistenceError> {
    rows.into_iter()
        .map(|row| row.into_domain().map(|(leave, _)| leave))
        .collect()
}

backend_fn! {
/// Retrieves a request and its version by id.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be reconstructed.
pub fn find_leave(
    conn: &mut _,
    leave_id: LeaveId,
) -> Result<Option<StoredLeave>, PersistenceError> {
    let row: Option<LeaveRow> = leaves::table
        .filter(leaves::leave_id.eq(leave_id.value()))
        .select(LeaveRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_leave: {e}")))?;

    row.map(|r| {
        r.into_domain()
            .map(|(leave, version)| StoredLeave { leave, version })
    })
    .transpose()
}
}

backend_fn! {
/// Finds the active requests of a person whose range overlaps `range`.
///
/// Active means `pending`, `approved` or `in_progress`. Both ranges are
/// inclusive, so requests that merely touch on one day overlap.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `person_id` - The request owner
/// * `range` - The candidate dates
/// * `exclude` - A request to leave out, used when editing
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn find_overlapping(
    conn: &mut _,
    person_id: PersonId,
    range: DateRange,
    exclude: Option<LeaveId>,
) -> Result<Vec<Leave>, PersistenceError> {
    debug!(person_id = person_id.value(), %range, "Looking for overlapping requests");

    let mut query = leaves::table
        .filter(leaves::person_id.eq(person_id.value()))
        .filter(leaves::status.eq_any(status_values(&LeaveStatus::ACTIVE)))
        .filter(leaves::start_date.le(range.end().to_string()))
        .filter(leaves::end_date.ge(range.start().to_string()))
        .select(LeaveRow::as_select())
        .into_boxed();
    if let Some(excluded) = exclude {
        query = query.filter(leaves::leave_id.ne(excluded.value()));
    }

    let rows: Vec<LeaveRow> = query
        .order((leaves::start_date.asc(), leaves::leave_id.asc()))
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("find_overlapping: {e}")))?;

    rows_into_leaves(rows)
}
}

backend_fn! {
/// Lists every request currently in one of `statuses`, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_leaves_in_status(
    conn: &mut _,
    statuses: &[LeaveStatus],
) -> Result<Vec<Leave>, PersistenceError> {
    let rows: Vec<LeaveRow> = leaves::table
        .filter(leaves::status.eq_any(status_values(statuses)))
        .order(leaves::leave_id.asc())
        .select(LeaveRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_leaves_in_status: {e}")))?;

    rows_into_leaves(rows)
}
}

backend_fn! {
/// Lists every request drawing from balances of `year`.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_leaves_for_year(conn: &mut _, year: i32) -> Result<Vec<Leave>, PersistenceError> {
    let rows: Vec<LeaveRow> = leaves::table
        .filter(leaves::balance_year.eq(year))
        .order(leaves::leave_id.asc())
        .select(LeaveRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_leaves_for_year: {e}")))?;

    rows_into_leaves(rows)
}
}

backend_fn! {
/// Lists one page of requests matching `filter`.
///
/// Results are ordered by start date, then id. `page` is 1-based and
/// `per_page` is clamped to `1..=MAX_PAGE_SIZE`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `filter` - Which requests to include
/// * `page` - The 1-based page number
/// * `per_page` - The page size
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_leaves(
    conn: &mut _,
    filter: &LeaveFilter,
    page: u32,
    per_page: u32,
) -> Result<LeavePage, PersistenceError> {
    let page: u32 = page.max(1);
    let per_page: u32 = per_page.clamp(1, MAX_PAGE_SIZE);

    if filter.person_ids.as_ref().is_some_and(Vec::is_empty) {
        return Ok(LeavePage {
            items: Vec::new(),
            page,
            per_page,
            total: 0,
        });
    }

    let person_ids: Option<Vec<i64>> = filter
        .person_ids
        .as_ref()
        .map(|ids| ids.iter().map(PersonId::value).collect());
    let status: Option<&'static str> = filter.status.as_ref().map(LeaveStatus::as_str);
    let leave_type_id: Option<i64> = filter.leave_type_id.map(|id| id.value());
    let from: Option<String> = filter.from.map(|d| d.to_string());
    let to: Option<String> = filter.to.map(|d| d.to_string());

    let mut count_query = leaves::table
        .select(diesel::dsl::count_star())
        .into_boxed();
    let mut page_query = leaves::table.select(LeaveRow::as_select()).into_boxed();

    if let Some(ids) = &person_ids {
        count_query = count_query.filter(leaves::person_id.eq_any(ids.clone()));
        page_query = page_query.filter(leaves::person_id.eq_any(ids.clone()));
    }
    if let Some(status) = status {
        count_query = count_query.filter(leaves::status.eq(status));
        page_query = page_query.filter(leaves::status.eq(status));
    }
    if let Some(leave_type_id) = leave_type_id {
        count_query = count_query.filter(leaves::leave_type_id.eq(leave_type_id));
        page_query = page_query.filter(leaves::leave_type_id.eq(leave_type_id));
    }
    if let Some(from) = &from {
        count_query = count_query.filter(leaves::end_date.ge(from.clone()));
        page_query = page_query.filter(leaves::end_date.ge(from.clone()));
    }
    if let Some(to) = &to {
        count_query = count_query.filter(leaves::start_date.le(to.clone()));
        page_query = page_query.filter(leaves::start_date.le(to.clone()));
    }

    let total: i64 = count_query
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_leaves count: {e}")))?;

    let offset: i64 = i64::from(page - 1) * i64::from(per_page);
    let rows: Vec<LeaveRow> = page_query
        .order((leaves::start_date.asc(), leaves::leave_id.asc()))
        .limit(i64::from(per_page))
        .offset(offset)
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_leaves: {e}")))?;

    Ok(LeavePage {
        items: rows_into_leaves(rows)?,
        page,
        per_page,
        total: total.to_u64().unwrap_or(0),
    })
}
}
