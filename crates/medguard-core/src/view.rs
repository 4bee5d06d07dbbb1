// Copyright (c) 2026 Med-Block-Guard Contributors
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

use crate::record::{LedgerRecord, LedgerSnapshot, TrialStatus};

pub const EMPTY_LEDGER_MESSAGE: &str = "No trials in ledger";
pub const NO_MATCH_MESSAGE: &str = "No trials match your search";

/// Ledger-wide health counters shown on the stat cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    pub total: usize,
    pub verified_count: usize,
    pub tampered_count: usize,
    pub high_risk_count: usize,
}

pub fn is_blank_query(query: &str) -> bool {
    query.trim().is_empty()
}

/// Per-character simple lowercase with final sigma folded onto `σ`.
///
/// Context-free, unlike `str::to_lowercase`: a substring folds to a substring
/// of the folded whole.
pub fn fold_case(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ς' { 'σ' } else { c })
        .collect()
}

/// Records whose id or title contains `query`, ignoring case, in snapshot order.
///
/// A blank query selects every record.
pub fn filtered_entries<'a>(snapshot: &'a LedgerSnapshot, query: &str) -> Vec<&'a LedgerRecord> {
    if is_blank_query(query) {
        return snapshot.iter().collect();
    }
    let needle = fold_case(query);
    snapshot
        .iter()
        .filter(|record| {
            fold_case(record.id()).contains(&needle) || fold_case(record.title()).contains(&needle)
        })
        .collect()
}

/// Counts over the unfiltered snapshot. The search box never moves these.
pub fn compute_stats(snapshot: &LedgerSnapshot) -> AggregateStats {
    snapshot
        .iter()
        .fold(AggregateStats::default(), |mut stats, record| {
            stats.total += 1;
            match record.status() {
                TrialStatus::Verified => stats.verified_count += 1,
                TrialStatus::Tampered => stats.tampered_count += 1,
                TrialStatus::Unrecognized(_) => {}
            }
            if record.bias_risk().is_high() {
                stats.high_risk_count += 1;
            }
            stats
        })
}

/// Placeholder row text for an empty table.
pub fn empty_table_message(query: &str) -> &'static str {
    if is_blank_query(query) {
        EMPTY_LEDGER_MESSAGE
    } else {
        NO_MATCH_MESSAGE
    }
}
