use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Patient gender as submitted on the triage form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M", alias = "Male", alias = "male", alias = "m")]
    Male,
    #[serde(rename = "F", alias = "Female", alias = "female", alias = "f")]
    Female,
    #[serde(rename = "Other", alias = "other")]
    Other,
}

/// Canonical vital signs. Always fully populated after normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    pub bp_systolic: u32,
    pub bp_diastolic: u32,
    pub heart_rate: u32,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Oxygen saturation, percent.
    pub spo2: f64,
}

impl Default for Vitals {
    /// Physiologically normal values used for fields missing on the form.
    fn default() -> Self {
        Self {
            bp_systolic: 120,
            bp_diastolic: 80,
            heart_rate: 75,
            temperature: 37.0,
            spo2: 98.0,
        }
    }
}

/// One triage submission, validated and normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientAssessment {
    pub age: u32,
    pub gender: Gender,
    pub vitals: Vitals,
    pub symptoms: BTreeSet<String>,
    pub pre_existing_conditions: BTreeSet<String>,
}

/// Ordinal urgency. Declaration order gives `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increases,
    Decreases,
}

/// An input feature that crossed its threshold and pushed the assessment
/// toward higher risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributingFactor {
    pub feature: String,
    pub contribution: f64,
    pub direction: Direction,
}

/// Classifier output for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessmentResult {
    pub risk_level: RiskLevel,
    pub explanation: String,
    pub confidence: f64,
    pub department: String,
    pub top_factors: Vec<ContributingFactor>,
    pub recommended_actions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_levels_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn risk_level_serializes_uppercase() {
        let json = serde_json::to_string(&RiskLevel::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
        let parsed: RiskLevel = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(parsed, RiskLevel::Medium);
    }

    #[test]
    fn gender_accepts_short_and_long_forms() {
        let m: Gender = serde_json::from_str("\"M\"").unwrap();
        let f: Gender = serde_json::from_str("\"Female\"").unwrap();
        let o: Gender = serde_json::from_str("\"Other\"").unwrap();
        assert_eq!((m, f, o), (Gender::Male, Gender::Female, Gender::Other));
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), "\"M\"");
    }

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Direction::Decreases).unwrap(),
            "\"decreases\""
        );
    }

    #[test]
    fn default_vitals_are_normal() {
        let v = Vitals::default();
        assert_eq!(v.bp_systolic, 120);
        assert_eq!(v.bp_diastolic, 80);
        assert_eq!(v.heart_rate, 75);
        assert_eq!(v.temperature, 37.0);
        assert_eq!(v.spo2, 98.0);
    }
}
