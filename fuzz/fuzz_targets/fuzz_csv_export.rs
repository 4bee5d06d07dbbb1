#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use medguard_core::export::{quote_title, to_csv};
use medguard_core::{BiasRisk, LedgerRecord, LedgerSnapshot, TrialStatus};

#[derive(Arbitrary, Debug)]
struct Row {
    id: u32,
    title: String,
    hash: String,
    status: Option<String>,
    bias: Option<String>,
}

fuzz_target!(|rows: Vec<Row>| {
    let snap = LedgerSnapshot::from_records(rows.into_iter().map(|r| {
        LedgerRecord::new(
            format!("NCT{:08}", r.id),
            r.title,
            r.hash,
            r.status
                .as_deref()
                .map(TrialStatus::parse)
                .unwrap_or(TrialStatus::Verified),
            BiasRisk::parse(r.bias.as_deref()),
        )
    }));
    let doc = to_csv(&snap);
    for record in snap.iter() {
        let quoted = quote_title(record.title());
        assert!(quoted.starts_with('"') && quoted.ends_with('"'));
        assert!(doc.contains(&quoted));
    }
});
