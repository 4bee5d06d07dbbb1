#![no_main]

use medguard_core::export::to_csv;
use medguard_core::{compute_stats, filtered_entries, LedgerSnapshot};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(snap) = LedgerSnapshot::from_json_slice(data) {
        let stats = compute_stats(&snap);
        assert_eq!(stats.total, snap.len());
        assert!(stats.verified_count + stats.tampered_count <= stats.total);
        assert_eq!(filtered_entries(&snap, "").len(), snap.len());
        let doc = to_csv(&snap);
        assert!(doc.starts_with("NCT ID,Title,Hash,Bias Risk,Status"));
    }
});
