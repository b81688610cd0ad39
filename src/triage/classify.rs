use super::explain::{compose_explanation, compose_factors};
use super::route::route_department;
use super::types::{PatientAssessment, RiskAssessmentResult, RiskLevel};

/// Tier thresholds. All comparisons are strict.
pub mod thresholds {
    pub mod critical {
        pub const TEMPERATURE_ABOVE: f64 = 39.0;
        pub const SPO2_BELOW: f64 = 90.0;
        pub const HEART_RATE_ABOVE: u32 = 120;
        pub const BP_SYSTOLIC_ABOVE: u32 = 180;
    }

    pub mod abnormal {
        pub const TEMPERATURE_ABOVE: f64 = 37.5;
        pub const SPO2_BELOW: f64 = 95.0;
        pub const HEART_RATE_ABOVE: u32 = 100;
        pub const BP_SYSTOLIC_ABOVE: u32 = 140;
        /// Inside the abnormal bracket, temperature alone escalates MEDIUM to HIGH.
        pub const HIGH_TEMPERATURE_ABOVE: f64 = 38.5;
    }
}

pub mod confidence {
    pub const CRITICAL: f64 = 0.98;
    pub const ABNORMAL: f64 = 0.89;
    pub const LOW: f64 = 0.92;
}

const CRITICAL_HEADLINE: &str =
    "CRITICAL: Patient shows signs of severe distress. Immediate medical attention required.";
const ABNORMAL_HEADLINE: &str = "Abnormal vitals detected. Medical evaluation recommended to rule out infection or underlying issues.";
const LOW_HEADLINE: &str = "Vitals are within normal ranges. No immediate distress detected.";

const CRITICAL_ACTIONS: [&str; 3] = [
    "IMMEDIATE ER ADMISSION",
    "Administer Oxygen",
    "Continuous Monitoring",
];
const ABNORMAL_ACTIONS: [&str; 3] = ["Schedule appointment", "Monitor symptoms", "Hydration"];
const LOW_ACTIONS: [&str; 2] = ["Routine checkup recommended", "Maintain healthy lifestyle"];

/// Classify an assessment. Pure and deterministic.
///
/// First match wins: CRITICAL, then the abnormal bracket (MEDIUM, or HIGH
/// when temperature alone exceeds 38.5 °C), then LOW. Crossing several
/// thresholds never raises the tier or confidence. Symptoms and history do
/// not affect the tier; they only appear in the explanation.
pub fn classify(assessment: &PatientAssessment) -> RiskAssessmentResult {
    let (risk_level, confidence, headline, actions): (_, _, _, &[&str]) =
        if is_critical(assessment) {
            (
                RiskLevel::Critical,
                confidence::CRITICAL,
                CRITICAL_HEADLINE,
                &CRITICAL_ACTIONS[..],
            )
        } else if is_abnormal(assessment) {
            let level = if assessment.vitals.temperature
                > thresholds::abnormal::HIGH_TEMPERATURE_ABOVE
            {
                RiskLevel::High
            } else {
                RiskLevel::Medium
            };
            (level, confidence::ABNORMAL, ABNORMAL_HEADLINE, &ABNORMAL_ACTIONS[..])
        } else {
            (RiskLevel::Low, confidence::LOW, LOW_HEADLINE, &LOW_ACTIONS[..])
        };

    let recommended_actions: Vec<String> = actions.iter().map(|a| a.to_string()).collect();

    RiskAssessmentResult {
        risk_level,
        explanation: compose_explanation(headline, &recommended_actions, assessment),
        confidence,
        department: route_department(risk_level).to_string(),
        top_factors: compose_factors(assessment),
        recommended_actions,
    }
}

fn is_critical(assessment: &PatientAssessment) -> bool {
    use thresholds::critical::*;
    let v = &assessment.vitals;
    v.temperature > TEMPERATURE_ABOVE
        || v.spo2 < SPO2_BELOW
        || v.heart_rate > HEART_RATE_ABOVE
        || v.bp_systolic > BP_SYSTOLIC_ABOVE
}

fn is_abnormal(assessment: &PatientAssessment) -> bool {
    use thresholds::abnormal::*;
    let v = &assessment.vitals;
    v.temperature > TEMPERATURE_ABOVE
        || v.spo2 < SPO2_BELOW
        || v.heart_rate > HEART_RATE_ABOVE
        || v.bp_systolic > BP_SYSTOLIC_ABOVE
}
