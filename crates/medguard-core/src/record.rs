// Copyright (c) 2026 Med-Block-Guard Contributors
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MedGuardError, MedGuardResult};

pub const STATUS_VERIFIED: &str = "Verified";
pub const STATUS_TAMPERED: &str = "Tampered";
pub const BIAS_HIGH_RISK: &str = "high risk";
pub const BIAS_LOW_RISK: &str = "low risk";

/// Integrity verdict reported by the ledger for one trial.
///
/// The ledger sends this as a free-form string. Values outside the known pair
/// are kept verbatim so they survive export unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TrialStatus {
    Verified,
    Tampered,
    Unrecognized(String),
}

impl TrialStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            STATUS_VERIFIED => Self::Verified,
            STATUS_TAMPERED => Self::Tampered,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Canonical wire spelling, or the raw value for unrecognized statuses.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Verified => STATUS_VERIFIED,
            Self::Tampered => STATUS_TAMPERED,
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for TrialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ML-derived bias classification. An absent value means low risk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BiasRisk {
    High,
    #[default]
    Low,
    Unrecognized(String),
}

impl BiasRisk {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some(BIAS_LOW_RISK) => Self::Low,
            Some(BIAS_HIGH_RISK) => Self::High,
            Some(other) => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::High => BIAS_HIGH_RISK,
            Self::Low => BIAS_LOW_RISK,
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, Self::High)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for BiasRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    id: String,
    title: String,
    integrity_hash: String,
    status: TrialStatus,
    bias_risk: BiasRisk,
}

impl LedgerRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        integrity_hash: impl Into<String>,
        status: TrialStatus,
        bias_risk: BiasRisk,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            integrity_hash: integrity_hash.into(),
            status,
            bias_risk,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Full, untruncated fingerprint as served by the ledger.
    pub fn integrity_hash(&self) -> &str {
        &self.integrity_hash
    }

    pub fn status(&self) -> &TrialStatus {
        &self.status
    }

    pub fn bias_risk(&self) -> &BiasRisk {
        &self.bias_risk
    }
}

/// One trial entry as served by `GET /all-trials`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireTrial {
    pub title: String,
    pub hash: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias_risk: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractField {
    Status,
    BiasRisk,
}

impl ContractField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::BiasRisk => "bias_risk",
        }
    }
}

impl fmt::Display for ContractField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record field whose value fell outside the enumerated set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractViolation {
    pub id: String,
    pub field: ContractField,
    pub value: String,
}

/// Immutable copy of the whole ledger as of one successful fetch.
///
/// Iteration is ascending by trial id, which is the presentation and export
/// order everywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    records: BTreeMap<String, LedgerRecord>,
    violations: Vec<ContractViolation>,
}

impl LedgerSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decodes a full `/all-trials` payload.
    ///
    /// Shape errors reject the whole payload, including a `status` or
    /// `bias_risk` of a non-string JSON type (`bias_risk: null` reads as
    /// absent). Out-of-set string values are accepted and recorded as
    /// violations.
    pub fn from_json_slice(payload: &[u8]) -> MedGuardResult<Self> {
        let value: Value = serde_json::from_slice(payload)?;
        let Value::Object(entries) = value else {
            return Err(MedGuardError::NotAnObject);
        };

        let mut records = BTreeMap::new();
        for (id, entry) in entries {
            let wire: WireTrial = serde_json::from_value(entry).map_err(|source| {
                MedGuardError::MalformedEntry {
                    id: id.clone(),
                    source,
                }
            })?;
            let record = LedgerRecord::new(
                id.clone(),
                wire.title,
                wire.hash,
                TrialStatus::parse(&wire.status),
                BiasRisk::parse(wire.bias_risk.as_deref()),
            );
            records.insert(id, record);
        }
        Ok(Self::from_records(records.into_values()))
    }

    pub fn from_records(records: impl IntoIterator<Item = LedgerRecord>) -> Self {
        let records: BTreeMap<String, LedgerRecord> = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();

        let mut violations = Vec::new();
        for record in records.values() {
            if let TrialStatus::Unrecognized(raw) = &record.status {
                violations.push(ContractViolation {
                    id: record.id.clone(),
                    field: ContractField::Status,
                    value: raw.clone(),
                });
            }
            if let BiasRisk::Unrecognized(raw) = &record.bias_risk {
                violations.push(ContractViolation {
                    id: record.id.clone(),
                    field: ContractField::BiasRisk,
                    value: raw.clone(),
                });
            }
        }

        Self {
            records,
            violations,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LedgerRecord> {
        self.records.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerRecord> + '_ {
        self.records.values()
    }

    pub fn violations(&self) -> &[ContractViolation] {
        &self.violations
    }

    /// Violations in `self` that `previous` did not already carry.
    pub fn new_violations<'a>(
        &'a self,
        previous: &'a LedgerSnapshot,
    ) -> impl Iterator<Item = &'a ContractViolation> + 'a {
        self.violations
            .iter()
            .filter(move |v| !previous.violations.contains(v))
    }

    /// Emits one warning per violation that `previous` did not already carry.
    pub fn log_new_violations(&self, previous: &LedgerSnapshot) {
        for v in self.new_violations(previous) {
            tracing::warn!(
                target: "medguard.contract",
                trial_id = %v.id,
                field = %v.field,
                value = %v.value,
                "ledger value outside expected set"
            );
        }
    }
}
