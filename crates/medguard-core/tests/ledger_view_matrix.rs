use medguard_core::display::truncate_hash;
use medguard_core::export::{to_csv, to_csv_rows};
use medguard_core::{compute_stats, filtered_entries, AggregateStats, LedgerSnapshot};
use serde_json::json;

fn snapshot(v: serde_json::Value) -> LedgerSnapshot {
    LedgerSnapshot::from_json_slice(&serde_json::to_vec(&v).expect("json")).expect("decode")
}

#[test]
fn ledger_public_api_matrix() {
    let snap = snapshot(json!({
        "NCT01111111": {"title": "Cardiovascular Risk Study A", "hash": "6a1f0c3e9b2d4f5a7c8e9d0b1a2c3d4e", "status": "Verified", "bias_risk": "low risk"},
        "NCT02222222": {"title": "Neuropathy Baseline Analysis", "hash": "0c9d8e7f6a5b4c3d2e1f0a9b8c7d6e5f", "status": "Tampered", "bias_risk": "high risk"},
        "NCT03333333": {"title": "Diabetes Prevention Phase II", "hash": "ffeeddccbbaa99887766554433221100", "status": "Verified"}
    }));

    let stats = compute_stats(&snap);
    assert_eq!(
        stats,
        AggregateStats {
            total: 3,
            verified_count: 2,
            tampered_count: 1,
            high_risk_count: 1,
        }
    );

    for query in ["", "study", "NCT0333", "no such trial"] {
        let _ = filtered_entries(&snap, query);
        assert_eq!(compute_stats(&snap), stats);
    }

    let hits = filtered_entries(&snap, "DIABETES");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id(), "NCT03333333");
    assert_eq!(truncate_hash(hits[0].integrity_hash()), "ffeeddccbbaa9988...");
    assert_eq!(hits[0].integrity_hash().len(), 32);

    let doc = to_csv(&snap);
    let lines: Vec<&str> = doc.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "NCT ID,Title,Hash,Bias Risk,Status");
    assert_eq!(
        lines[3],
        "NCT03333333,\"Diabetes Prevention Phase II\",ffeeddccbbaa99887766554433221100,low risk,Verified"
    );

    let filtered_doc = to_csv_rows(filtered_entries(&snap, "neuro"));
    assert_eq!(filtered_doc.lines().count(), 2);
}

#[test]
fn quoted_title_survives_standard_reader() {
    let snap = snapshot(json!({
        "NCT04444444": {"title": "He said \"go\"", "hash": "aa", "status": "Verified"}
    }));
    let doc = to_csv(&snap);
    assert!(doc.ends_with("NCT04444444,\"He said \"\"go\"\"\",aa,low risk,Verified"));

    let mut reader = csv::Reader::from_reader(doc.as_bytes());
    let row = reader
        .records()
        .next()
        .expect("one row")
        .expect("valid row");
    assert_eq!(&row[0], "NCT04444444");
    assert_eq!(&row[1], "He said \"go\"");
    assert_eq!(&row[3], "low risk");
    assert_eq!(&row[4], "Verified");
}
