// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Single-table writes use Diesel DSL and are generated per backend by
//! `backend_fn!`. Multi-step workflows are written once, generic over
//! `LedgerConnection`, and always run inside a write transaction opened by
//! the `Persistence` adapter.
//!
//! ## Module Organization
//!
//! - `leave_types`: Leave type registration and activation
//! - `balances`: Version-checked balance row writes
//! - `journal`: Ledger entry appends
//! - `leaves`: Version-checked request row writes
//! - `guards`: Per-person write guard
//! - `ledger`: Balance operations with journaling (orchestration)
//! - `requests`: Request creation, edits and transitions (orchestration)
//! - `batch`: Per-row accrual, carry-over and status advancement (orchestration)

pub mod balances;
pub mod batch;
pub mod guards;
pub mod journal;
pub mod leave_types;
pub mod ledger;
pub mod leaves;
pub mod requests;
