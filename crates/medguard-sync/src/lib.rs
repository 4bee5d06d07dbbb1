// Copyright (c) 2026 Med-Block-Guard Contributors
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod clock;
pub mod config;
pub mod error;
pub mod source;
pub mod synchronizer;

pub use crate::clock::{SyncClock, SystemClock};
pub use crate::config::SyncConfig;
pub use crate::error::{SyncError, SyncErrorKind};
pub use crate::source::{HttpLedgerSource, LedgerSource};
pub use crate::synchronizer::{FetchOutcome, SyncState, SyncStatus, Synchronizer};
