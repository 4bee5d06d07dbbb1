// Copyright (c) 2026 Med-Block-Guard Contributors
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod render;

use std::io::{BufRead as _, Write as _};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use medguard_core::export::{to_csv, to_csv_rows, EXPORT_FILE_NAME, EXPORT_MIME_TYPE};
use medguard_core::view::{compute_stats, filtered_entries, is_blank_query};
use medguard_sync::{
    FetchOutcome, HttpLedgerSource, SyncConfig, SyncState, SyncStatus, Synchronizer,
};
use serde_json::json;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "medguard-dash")]
#[command(about = "Monitor the Med-Block-Guard clinical-trial integrity ledger")]
struct Cli {
    /// Ledger snapshot endpoint. Falls back to MEDGUARD_LEDGER_URL.
    #[arg(long, global = true)]
    url: Option<String>,

    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: Option<u64>,

    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: Option<u64>,

    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Poll the ledger and redraw the dashboard on every update. Enter refreshes now.
    Watch {
        #[arg(long, default_value = "")]
        query: String,
        /// Append frames instead of clearing the terminal.
        #[arg(long)]
        no_clear: bool,
    },
    /// Fetch once and write the snapshot as CSV.
    Export {
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,
        /// Export only records matching this search.
        #[arg(long)]
        query: Option<String>,
    },
    /// Fetch once and print ledger-wide health counters as JSON.
    Stats,
    /// Print the full integrity hash of one trial, for piping into a clipboard tool.
    Hash { id: String },
}

impl Cli {
    fn sync_config(&self) -> SyncConfig {
        let mut cfg = SyncConfig::from_env();
        if let Some(url) = &self.url {
            cfg.ledger_url = url.clone();
        }
        if let Some(interval) = self.interval_ms {
            cfg.poll_interval_ms = interval;
        }
        if let Some(timeout) = self.timeout_ms {
            cfg.request_timeout_ms = Some(timeout);
        }
        cfg
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log))
        .with_writer(std::io::stderr)
        .init();

    let cfg = cli.sync_config();
    let source = HttpLedgerSource::new(&cfg).context("building ledger client")?;
    let sync = Synchronizer::new(source, cfg);

    match cli.cmd {
        Command::Watch { query, no_clear } => watch(sync, &query, !no_clear).await,
        Command::Export { output, query } => {
            let state = fetch_once(&sync).await?;
            let doc = match query.as_deref() {
                Some(q) if !is_blank_query(q) => to_csv_rows(filtered_entries(&state.snapshot, q)),
                _ => to_csv(&state.snapshot),
            };
            std::fs::write(&output, doc)
                .with_context(|| format!("writing export to {}", output.display()))?;
            tracing::info!(
                path = %output.display(),
                mime = EXPORT_MIME_TYPE,
                records = state.snapshot.len(),
                "ledger export written"
            );
            Ok(())
        }
        Command::Stats => {
            let state = fetch_once(&sync).await?;
            let stats = compute_stats(&state.snapshot);
            println!(
                "{}",
                json!({
                    "stats": stats,
                    "contract_violations": state.snapshot.violations().len(),
                    "last_updated_ms": state.last_updated_ms,
                })
            );
            Ok(())
        }
        Command::Hash { id } => {
            let state = fetch_once(&sync).await?;
            match state.snapshot.get(&id) {
                Some(record) => println!("{}", record.integrity_hash()),
                None => tracing::warn!(trial_id = %id, "trial not in ledger; nothing copied"),
            }
            Ok(())
        }
    }
}

async fn fetch_once(sync: &Synchronizer<HttpLedgerSource>) -> Result<SyncState> {
    let outcome = sync.refresh().await;
    let state = sync.state();
    match (&outcome, &state.status) {
        (FetchOutcome::Applied, _) => Ok(state),
        (_, SyncStatus::Error { message, detail, .. }) => bail!("{message} ({detail})"),
        _ => bail!("ledger fetch did not complete: {outcome:?}"),
    }
}

async fn watch(sync: Synchronizer<HttpLedgerSource>, query: &str, clear: bool) -> Result<()> {
    let mut rx = sync.subscribe();
    sync.start().context("starting synchronizer")?;
    draw(&rx.borrow_and_update(), query, clear)?;

    let mut enter = spawn_enter_listener();
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                draw(&state, query, clear)?;
            }
            Some(()) = enter.recv() => {
                tracing::debug!("manual refresh requested");
                let sync = sync.clone();
                tokio::spawn(async move {
                    let _ = sync.refresh().await;
                });
            }
            _ = &mut interrupt => {
                tracing::info!("interrupt received; stopping");
                break;
            }
        }
    }
    sync.stop();
    Ok(())
}

/// One message per line read from stdin. The reader runs on a detached thread
/// so a pending read never holds up runtime shutdown.
fn spawn_enter_listener() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if line.is_err() || tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

fn draw(state: &SyncState, query: &str, clear: bool) -> Result<()> {
    let frame = render::render_dashboard(state, query);
    let mut stdout = std::io::stdout().lock();
    if clear {
        stdout.write_all(b"\x1b[2J\x1b[H")?;
    }
    stdout.write_all(frame.as_bytes())?;
    writeln!(stdout, "\n{}", render::WATCH_HINT)?;
    stdout.flush()?;
    Ok(())
}
