// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service boundary for the leave ledger.
//!
//! `LeaveEngine` is the single entry point for callers. It resolves people
//! through a `PersonDirectory`, reads time from a `Clock`, and returns
//! request/response DTOs and `ApiError` values rather than domain or
//! storage types.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod clock;
mod config;
mod directory;
mod engine;
mod error;
mod request_response;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, EngineConfig};
pub use directory::{InMemoryDirectory, PersonDirectory};
pub use engine::LeaveEngine;
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use request_response::{
    BalanceInfo, CreateLeaveResponse, LeaveInfo, ListLeavesRequest, ListLeavesResponse,
    NotificationInfo, ReserveResponse, SubmitLeaveRequest, TransitionLeaveResponse,
    UpdateLeaveResponse,
};
