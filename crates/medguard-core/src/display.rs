use crate::record::{BiasRisk, TrialStatus};

pub const HASH_PREVIEW_CHARS: usize = 16;
pub const HASH_ELLIPSIS: &str = "...";

/// Short form of an integrity hash for table cells. Never feed this back into
/// export or lookups; use `LedgerRecord::integrity_hash` for the full value.
pub fn truncate_hash(hash: &str) -> String {
    let mut out: String = hash.chars().take(HASH_PREVIEW_CHARS).collect();
    out.push_str(HASH_ELLIPSIS);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Neutral,
    Warning,
    Alert,
}

pub fn status_label(status: &TrialStatus) -> String {
    status.as_str().to_uppercase()
}

/// Anything that is not `Verified` is shown in the alert bucket.
pub fn status_tone(status: &TrialStatus) -> BadgeTone {
    match status {
        TrialStatus::Verified => BadgeTone::Neutral,
        TrialStatus::Tampered | TrialStatus::Unrecognized(_) => BadgeTone::Alert,
    }
}

pub fn bias_risk_label(bias: &BiasRisk) -> String {
    bias.as_str().to_uppercase()
}

pub fn bias_risk_tone(bias: &BiasRisk) -> BadgeTone {
    if bias.is_high() {
        BadgeTone::Warning
    } else {
        BadgeTone::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_to_sixteen_chars_plus_ellipsis() {
        let hash = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";
        assert_eq!(truncate_hash(hash), "9f86d081884c7d65...");
    }

    #[test]
    fn short_hash_keeps_all_chars() {
        assert_eq!(truncate_hash("abc"), "abc...");
        assert_eq!(truncate_hash(""), "...");
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let hash = "ééééééééééééééééééé";
        assert_eq!(truncate_hash(hash).chars().count(), HASH_PREVIEW_CHARS + 3);
    }

    #[test]
    fn labels_are_uppercased_for_display_only() {
        assert_eq!(status_label(&TrialStatus::Tampered), "TAMPERED");
        assert_eq!(TrialStatus::Tampered.as_str(), "Tampered");
        assert_eq!(bias_risk_label(&BiasRisk::Low), "LOW RISK");
        assert_eq!(bias_risk_label(&BiasRisk::High), "HIGH RISK");
    }

    #[test]
    fn unrecognized_status_falls_into_alert_bucket() {
        assert_eq!(
            status_tone(&TrialStatus::Unrecognized("Pending".to_string())),
            BadgeTone::Alert
        );
        assert_eq!(status_tone(&TrialStatus::Verified), BadgeTone::Neutral);
        assert_eq!(bias_risk_tone(&BiasRisk::High), BadgeTone::Warning);
        assert_eq!(
            bias_risk_tone(&BiasRisk::Unrecognized("x".to_string())),
            BadgeTone::Neutral
        );
    }
}
