// Copyright (c) 2026 Med-Block-Guard Contributors
// SPDX-License-Identifier: Apache-2.0

//! CSV rendering of ledger records.
//!
//! Only the title column is quoted. Ids, hashes, and the enumerated columns are
//! written verbatim, so the document is byte-for-byte what the dashboard's
//! "Export CSV" button has always produced.

use crate::record::{LedgerRecord, LedgerSnapshot};

pub const CSV_HEADER: [&str; 5] = ["NCT ID", "Title", "Hash", "Bias Risk", "Status"];
pub const EXPORT_FILE_NAME: &str = "ledger_export.csv";
pub const EXPORT_MIME_TYPE: &str = "text/csv";

/// Quotes `title` and doubles any embedded `"`.
pub fn quote_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len() + 2);
    out.push('"');
    for ch in title.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

fn render_row(record: &LedgerRecord) -> String {
    [
        record.id().to_string(),
        quote_title(record.title()),
        record.integrity_hash().to_string(),
        record.bias_risk().as_str().to_string(),
        record.status().as_str().to_string(),
    ]
    .join(",")
}

/// Header plus one row per record, newline-joined, in iteration order.
pub fn to_csv_rows<'a>(records: impl IntoIterator<Item = &'a LedgerRecord>) -> String {
    std::iter::once(CSV_HEADER.join(","))
        .chain(records.into_iter().map(render_row))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn to_csv(snapshot: &LedgerSnapshot) -> String {
    to_csv_rows(snapshot.iter())
}
