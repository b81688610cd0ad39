//! In-memory triage ledger: aggregate counts for the doctor dashboard.
//!
//! Only counts are kept. Individual assessments and results are never stored.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::triage::RiskLevel;

#[derive(Debug, Default)]
pub struct TriageLedger {
    total: u64,
    by_risk: BTreeMap<RiskLevel, u64>,
    by_department: BTreeMap<String, u64>,
    fallbacks: u64,
}

/// Snapshot returned by `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageStats {
    pub total_triages: u64,
    /// Every risk level is present, zero when unseen.
    pub risk_distribution: BTreeMap<&'static str, u64>,
    pub department_load: BTreeMap<String, u64>,
    pub fallback_count: u64,
}

impl TriageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one completed triage.
    pub fn record(&mut self, level: RiskLevel, department: &str, fallback: bool) {
        self.total += 1;
        *self.by_risk.entry(level).or_default() += 1;
        *self.by_department.entry(department.to_string()).or_default() += 1;
        if fallback {
            self.fallbacks += 1;
        }
    }

    pub fn snapshot(&self) -> TriageStats {
        let risk_distribution = RiskLevel::ALL
            .iter()
            .map(|level| (level.as_str(), self.by_risk.get(level).copied().unwrap_or(0)))
            .collect();

        TriageStats {
            total_triages: self.total,
            risk_distribution,
            department_load: self.by_department.clone(),
            fallback_count: self.fallbacks,
        }
    }
}
