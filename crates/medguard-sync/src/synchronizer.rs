// Copyright (c) 2026 Med-Block-Guard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Snapshot synchronizer.
//!
//! Owns the only mutable copy of the ledger state. Every fetch is stamped with
//! an issue sequence number and the lifecycle epoch it was issued in; results
//! are applied in completion order under the lifecycle lock, so readers only
//! ever see whole snapshots and nothing is applied once `stop()` returns.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use medguard_core::LedgerSnapshot;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::clock::{SyncClock, SystemClock};
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncErrorKind, CONNECTION_ADVISORY};
use crate::source::LedgerSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// No fetch has completed yet.
    Loading,
    Ready,
    /// The last fetch failed. The snapshot still holds the last good data.
    Error {
        kind: SyncErrorKind,
        message: String,
        detail: String,
    },
}

impl SyncStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            Self::Loading | Self::Ready => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncState {
    pub snapshot: Arc<LedgerSnapshot>,
    pub status: SyncStatus,
    /// Wall-clock millis of the last successful apply.
    pub last_updated_ms: Option<u64>,
    /// Issue sequence of the fetch whose snapshot is showing.
    pub snapshot_seq: Option<u64>,
    /// Bumped on every applied completion, success or failure.
    pub revision: u64,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            snapshot: Arc::new(LedgerSnapshot::empty()),
            status: SyncStatus::Loading,
            last_updated_ms: None,
            snapshot_seq: None,
            revision: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed(SyncErrorKind),
    /// Completed after its epoch closed; result dropped.
    Discarded,
    /// Not issued because the synchronizer is stopped.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug)]
struct Lifecycle {
    phase: Phase,
    epoch: u64,
    poller: Option<JoinHandle<()>>,
}

#[derive(Debug, Clone, Copy)]
struct FetchTicket {
    seq: u64,
    epoch: u64,
}

struct Inner<S> {
    source: S,
    config: SyncConfig,
    clock: Arc<dyn SyncClock>,
    state: watch::Sender<SyncState>,
    lifecycle: Mutex<Lifecycle>,
    next_seq: AtomicU64,
    discarded: AtomicU64,
}

/// Cloneable handle; all clones drive the same state.
pub struct Synchronizer<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for Synchronizer<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: LedgerSource> Synchronizer<S> {
    pub fn new(source: S, config: SyncConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock))
    }

    pub fn with_clock(source: S, config: SyncConfig, clock: Arc<dyn SyncClock>) -> Self {
        let (state, _rx) = watch::channel(SyncState::default());
        Self {
            inner: Arc::new(Inner {
                source,
                config,
                clock,
                state,
                lifecycle: Mutex::new(Lifecycle {
                    phase: Phase::Idle,
                    epoch: 0,
                    poller: None,
                }),
                next_seq: AtomicU64::new(0),
                discarded: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    pub fn state(&self) -> SyncState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.inner.state.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.inner.lifecycle.lock().phase == Phase::Running
    }

    pub fn discarded_completions(&self) -> u64 {
        self.inner.discarded.load(Ordering::Relaxed)
    }

    /// Spawns the polling task: one fetch now, then one per interval.
    ///
    /// Calling `start` while running is a no-op. Starting after `stop` opens a
    /// new epoch; fetches from the old one stay discarded.
    pub fn start(&self) -> Result<(), tokio::runtime::TryCurrentError> {
        let handle = tokio::runtime::Handle::try_current()?;
        let mut lifecycle = self.inner.lifecycle.lock();
        if lifecycle.phase == Phase::Running {
            return Ok(());
        }
        if lifecycle.phase == Phase::Stopped {
            lifecycle.epoch = lifecycle.epoch.saturating_add(1);
        }
        lifecycle.phase = Phase::Running;
        let inner = Arc::downgrade(&self.inner);
        lifecycle.poller = Some(handle.spawn(run_poller(inner)));
        tracing::info!(
            target: "medguard.sync",
            url = %self.inner.config.ledger_url,
            interval_ms = self.inner.config.poll_interval_ms,
            epoch = lifecycle.epoch,
            "ledger synchronizer started"
        );
        Ok(())
    }

    /// Cancels the polling task. In-flight fetches may still finish, but no
    /// state change is observable after this returns.
    pub fn stop(&self) {
        let mut lifecycle = self.inner.lifecycle.lock();
        if lifecycle.phase == Phase::Stopped {
            return;
        }
        lifecycle.phase = Phase::Stopped;
        lifecycle.epoch = lifecycle.epoch.saturating_add(1);
        if let Some(poller) = lifecycle.poller.take() {
            poller.abort();
        }
        tracing::info!(target: "medguard.sync", epoch = lifecycle.epoch, "ledger synchronizer stopped");
    }

    /// Out-of-cycle fetch with the same semantics as a scheduled tick.
    pub async fn refresh(&self) -> FetchOutcome {
        self.inner.fetch_and_apply().await
    }
}

impl<S: LedgerSource> Inner<S> {
    fn issue(&self) -> Option<FetchTicket> {
        let lifecycle = self.lifecycle.lock();
        if lifecycle.phase == Phase::Stopped {
            return None;
        }
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed).saturating_add(1);
        Some(FetchTicket {
            seq,
            epoch: lifecycle.epoch,
        })
    }

    async fn fetch_and_apply(&self) -> FetchOutcome {
        let Some(ticket) = self.issue() else {
            return FetchOutcome::Skipped;
        };
        tracing::debug!(target: "medguard.sync", seq = ticket.seq, "ledger fetch issued");
        let result = self.source.fetch().await;
        self.apply(ticket, result)
    }

    fn apply(&self, ticket: FetchTicket, result: Result<LedgerSnapshot, SyncError>) -> FetchOutcome {
        // Held across the state write so `stop()` cannot interleave.
        let lifecycle = self.lifecycle.lock();
        if lifecycle.phase == Phase::Stopped || lifecycle.epoch != ticket.epoch {
            self.discarded.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                target: "medguard.sync",
                seq = ticket.seq,
                issued_epoch = ticket.epoch,
                current_epoch = lifecycle.epoch,
                "discarding fetch completed after its epoch closed"
            );
            return FetchOutcome::Discarded;
        }

        let outcome = match result {
            Ok(snapshot) => {
                let now = self.clock.now_ms();
                let records = snapshot.len();
                let violations = snapshot.violations().len();
                snapshot.log_new_violations(&self.state.borrow().snapshot);
                self.state.send_modify(|state| {
                    state.snapshot = Arc::new(snapshot);
                    state.status = SyncStatus::Ready;
                    state.last_updated_ms = Some(now);
                    state.snapshot_seq = Some(ticket.seq);
                    state.revision = state.revision.saturating_add(1);
                });
                tracing::debug!(
                    target: "medguard.sync",
                    seq = ticket.seq,
                    records,
                    violations,
                    "ledger snapshot applied"
                );
                FetchOutcome::Applied
            }
            Err(err) => {
                let kind = err.kind();
                tracing::warn!(
                    target: "medguard.sync",
                    seq = ticket.seq,
                    kind = kind.as_str(),
                    error = %err,
                    "ledger fetch failed; keeping last-known-good snapshot"
                );
                self.state.send_modify(|state| {
                    state.status = SyncStatus::Error {
                        kind,
                        message: CONNECTION_ADVISORY.to_string(),
                        detail: err.to_string(),
                    };
                    state.revision = state.revision.saturating_add(1);
                });
                FetchOutcome::Failed(kind)
            }
        };
        drop(lifecycle);
        outcome
    }
}

impl<S> Drop for Inner<S> {
    fn drop(&mut self) {
        if let Some(poller) = self.lifecycle.get_mut().poller.take() {
            poller.abort();
        }
    }
}

/// Holds only a weak reference so dropping the last handle ends polling.
async fn run_poller<S: LedgerSource>(inner: Weak<Inner<S>>) {
    let Some(period) = inner.upgrade().map(|strong| strong.config.poll_interval()) else {
        return;
    };
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let Some(strong) = inner.upgrade() else {
            tracing::debug!(target: "medguard.sync", "synchronizer dropped; poller exiting");
            break;
        };
        // Awaited inline: the next tick cannot fire a second request while this
        // one is still outstanding.
        let _ = strong.fetch_and_apply().await;
    }
}
