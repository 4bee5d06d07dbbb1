use std::fmt::Write as _;

use medguard_core::display::{
    bias_risk_label, bias_risk_tone, status_label, status_tone, truncate_hash, BadgeTone,
};
use medguard_core::view::{compute_stats, empty_table_message, filtered_entries};
use medguard_core::LedgerRecord;
use medguard_sync::{SyncState, SyncStatus};

pub const APP_TITLE: &str = "MED-BLOCK-GUARD";
pub const APP_SUBTITLE: &str = "Clinical Trial Integrity Ledger";
pub const LOADING_MESSAGE: &str = "Loading ledger...";
pub const WATCH_HINT: &str = "Enter: refresh  Ctrl-C: quit";

const TITLE_COLUMN_CHARS: usize = 40;
const HEADERS: [&str; 5] = [
    "NCT ID",
    "Trial Title",
    "Integrity Hash",
    "Bias Risk (ML)",
    "Status",
];

/// `HH:MM:SS UTC` for a unix-millis timestamp.
pub fn format_clock(unix_ms: u64) -> String {
    let secs = unix_ms / 1_000;
    let h = (secs / 3_600) % 24;
    let m = (secs / 60) % 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02} UTC")
}

fn badge(label: String, tone: BadgeTone) -> String {
    match tone {
        BadgeTone::Neutral => format!("[{label}]"),
        BadgeTone::Warning => format!("*{label}*"),
        BadgeTone::Alert => format!("!{label}!"),
    }
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

fn row_cells(record: &LedgerRecord) -> [String; 5] {
    [
        record.id().to_string(),
        clip(record.title(), TITLE_COLUMN_CHARS),
        truncate_hash(record.integrity_hash()),
        badge(
            bias_risk_label(record.bias_risk()),
            bias_risk_tone(record.bias_risk()),
        ),
        badge(status_label(record.status()), status_tone(record.status())),
    ]
}

fn render_table(out: &mut String, rows: &[[String; 5]]) {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let line = |cells: [&str; 5]| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    let _ = writeln!(out, "{}", line(HEADERS));
    let rule = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    let _ = writeln!(out, "{}", "-".repeat(rule));
    for row in rows {
        let cells = [
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
            row[4].as_str(),
        ];
        let _ = writeln!(out, "{}", line(cells));
    }
}

/// One full frame of the dashboard for `state` searched by `query`.
pub fn render_dashboard(state: &SyncState, query: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{APP_TITLE}  {APP_SUBTITLE}");
    if let Some(ms) = state.last_updated_ms {
        let _ = writeln!(out, "Last updated: {}", format_clock(ms));
    }
    out.push('\n');

    let stats = compute_stats(&state.snapshot);
    let _ = writeln!(
        out,
        "Total Trials: {}  Verified: {}  Tampered: {}  High Risk (ML): {}",
        stats.total, stats.verified_count, stats.tampered_count, stats.high_risk_count
    );
    out.push('\n');

    if let SyncStatus::Error { message, .. } = &state.status {
        let _ = writeln!(out, "!! {message}");
        out.push('\n');
    }

    if state.status.is_loading() {
        let _ = writeln!(out, "{LOADING_MESSAGE}");
        return out;
    }

    if !query.trim().is_empty() {
        let _ = writeln!(out, "Search: {query}");
    }
    let rows: Vec<[String; 5]> = filtered_entries(&state.snapshot, query)
        .into_iter()
        .map(row_cells)
        .collect();
    render_table(&mut out, &rows);
    if rows.is_empty() {
        let _ = writeln!(out, "{}", empty_table_message(query));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use medguard_core::{BiasRisk, LedgerSnapshot, TrialStatus};
    use medguard_sync::SyncErrorKind;

    use super::*;

    fn ready(snapshot: LedgerSnapshot) -> SyncState {
        SyncState {
            snapshot: Arc::new(snapshot),
            status: SyncStatus::Ready,
            last_updated_ms: Some(45_296_000),
            snapshot_seq: Some(1),
            revision: 1,
        }
    }

    fn scenario() -> LedgerSnapshot {
        LedgerSnapshot::from_records([
            LedgerRecord::new(
                "NCT001",
                "Trial A",
                "abc123abc123abc123abc123",
                TrialStatus::Verified,
                BiasRisk::Low,
            ),
            LedgerRecord::new(
                "NCT002",
                "Trial B",
                "def456def456def456def456",
                TrialStatus::Tampered,
                BiasRisk::High,
            ),
        ])
    }

    #[test]
    fn clock_formats_utc_time_of_day() {
        assert_eq!(format_clock(0), "00:00:00 UTC");
        assert_eq!(format_clock(45_296_000), "12:34:56 UTC");
        assert_eq!(format_clock(86_400_000 + 1_000), "00:00:01 UTC");
    }

    #[test]
    fn frame_shows_stats_rows_and_badges() {
        let frame = render_dashboard(&ready(scenario()), "");
        assert!(frame.contains("Last updated: 12:34:56 UTC"));
        assert!(frame.contains("Total Trials: 2  Verified: 1  Tampered: 1  High Risk (ML): 1"));
        assert!(frame.contains("abc123abc123abc1..."));
        assert!(!frame.contains("abc123abc123abc123abc123"));
        assert!(frame.contains("!TAMPERED!"));
        assert!(frame.contains("[VERIFIED]"));
        assert!(frame.contains("*HIGH RISK*"));
        assert!(frame.contains("[LOW RISK]"));
    }

    #[test]
    fn search_filters_rows_but_not_stats() {
        let frame = render_dashboard(&ready(scenario()), "trial b");
        assert!(frame.contains("NCT002"));
        assert!(!frame.contains("NCT001"));
        assert!(frame.contains("Total Trials: 2"));
    }

    #[test]
    fn empty_table_messages() {
        let empty = render_dashboard(&ready(LedgerSnapshot::empty()), "");
        assert!(empty.contains("No trials in ledger"));
        let no_match = render_dashboard(&ready(scenario()), "zzz");
        assert!(no_match.contains("No trials match your search"));
    }

    #[test]
    fn error_banner_keeps_last_known_rows() {
        let mut state = ready(scenario());
        state.status = SyncStatus::Error {
            kind: SyncErrorKind::Transport,
            message: "Connection to API failed. Make sure backend is running.".to_string(),
            detail: "connection refused".to_string(),
        };
        let frame = render_dashboard(&state, "");
        assert!(frame.contains("!! Connection to API failed. Make sure backend is running."));
        assert!(frame.contains("NCT001"));
        assert!(frame.contains("NCT002"));
    }

    #[test]
    fn loading_frame_has_no_table() {
        let frame = render_dashboard(&SyncState::default(), "");
        assert!(frame.contains(LOADING_MESSAGE));
        assert!(!frame.contains("Integrity Hash"));
        assert!(!frame.contains("Last updated"));
    }

    #[test]
    fn long_titles_are_clipped_for_display() {
        let long = "A".repeat(80);
        assert_eq!(clip(&long, 10), "AAAAAAA...");
        assert_eq!(clip("short", 10), "short");
    }
}
