// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Working-day predicates used to size leave requests.

use crate::leave_type::LeaveTypeRules;
use crate::types::{DateRange, Days};
use std::collections::BTreeSet;
use time::{Date, Weekday};

/// Decides whether a calendar day counts toward a leave request.
pub trait WorkingDayPredicate: Send + Sync {
    /// Returns true if `date` is a working day.
    fn is_working_day(&self, date: Date) -> bool;
}

/// Monday through Friday.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekdaysOnly;

impl WorkingDayPredicate for WeekdaysOnly {
    fn is_working_day(&self, date: Date) -> bool {
        !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
    }
}

/// Every calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllCalendarDays;

impl WorkingDayPredicate for AllCalendarDays {
    fn is_working_day(&self, _date: Date) -> bool {
        true
    }
}

/// Weekdays minus a fixed set of public holidays.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    holidays: BTreeSet<Date>,
}

impl HolidayCalendar {
    /// Creates a calendar with the given holidays.
    #[must_use]
    pub fn new(holidays: impl IntoIterator<Item = Date>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Whether the date is a listed holiday.
    #[must_use]
    pub fn is_holiday(&self, date: Date) -> bool {
        self.holidays.contains(&date)
    }
}

impl WorkingDayPredicate for HolidayCalendar {
    fn is_working_day(&self, date: Date) -> bool {
        WeekdaysOnly.is_working_day(date) && !self.is_holiday(date)
    }
}

/// Counts the days in `range` accepted by `predicate`.
#[must_use]
pub fn count_working_days(range: &DateRange, predicate: &dyn WorkingDayPredicate) -> u32 {
    let count = range
        .dates()
        .filter(|d| predicate.is_working_day(*d))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Sizes a leave request for a leave type.
///
/// Types configured with `counts_weekends` count every calendar day;
/// all others defer to the supplied predicate.
#[must_use]
pub fn count_leave_days(
    range: &DateRange,
    rules: &LeaveTypeRules,
    predicate: &dyn WorkingDayPredicate,
) -> Days {
    if rules.counts_weekends {
        Days::whole(count_working_days(range, &AllCalendarDays))
    } else {
        Days::whole(count_working_days(range, predicate))
    }
}
