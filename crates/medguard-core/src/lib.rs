// Copyright (c) 2026 Med-Block-Guard Contributors
// SPDX-License-Identifier: Apache-2.0

//! medguard-core
//!
//! Client-side model and derived views for the Med-Block-Guard clinical-trial
//! integrity ledger.
//!
//! This crate implements:
//! - Ledger snapshot decoding from the `/all-trials` wire shape
//! - View derivation (case-insensitive search, ledger-wide health statistics)
//! - CSV export of the full snapshot or a filtered view
//! - Compact integrity-hash display helpers

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod display;
pub mod error;
pub mod export;
pub mod record;
pub mod view;

pub use crate::error::{MedGuardError, MedGuardResult};
pub use crate::record::{BiasRisk, ContractViolation, LedgerRecord, LedgerSnapshot, TrialStatus};
pub use crate::view::{compute_stats, filtered_entries, AggregateStats};
