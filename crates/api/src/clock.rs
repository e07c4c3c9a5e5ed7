// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time sources.

use time::{Date, OffsetDateTime};

/// Supplies the business date and the timestamp recorded on writes.
pub trait Clock: Send {
    /// The current instant.
    fn now(&self) -> OffsetDateTime;

    /// The current business date.
    fn today(&self) -> Date {
        self.now().date()
    }
}

/// The system clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock frozen at one instant. Used by tests and replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    instant: OffsetDateTime,
}

impl FixedClock {
    /// Creates a clock that always reports `instant`.
    #[must_use]
    pub const fn new(instant: OffsetDateTime) -> Self {
        Self { instant }
    }

    /// Moves the clock to `instant`.
    pub const fn set(&mut self, instant: OffsetDateTime) {
        self.instant = instant;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.instant
    }
}
