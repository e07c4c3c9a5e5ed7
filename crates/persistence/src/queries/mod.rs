// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic query modules.
//!
//! All read operations use Diesel DSL and are generated once per backend by
//! `backend_fn!`.
//!
//! ## Module Organization
//!
//! - `leave_types`: Leave type reference data
//! - `balances`: Balance rows by key and by year
//! - `leaves`: Request lookup, overlap candidates, listings
//! - `journal`: Ledger entries of a balance

pub mod balances;
pub mod journal;
pub mod leave_types;
pub mod leaves;
