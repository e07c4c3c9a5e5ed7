// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod actor;
mod apply;
mod batch;
mod command;
mod error;
mod plan;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use actor::{Actor, Approver, ApproverScope};
pub use apply::apply;
pub use batch::{
    AdvanceStep, BatchReport, CarryOverPlan, plan_accrual, plan_carry_over, plan_status_advance,
};
pub use command::Command;
pub use error::CoreError;
pub use plan::{check_reservation, find_conflicts, plan_creation, plan_update};
pub use state::{CreationPlan, TransitionContext, TransitionResult, UpdatePlan};
