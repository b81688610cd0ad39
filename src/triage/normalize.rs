use std::collections::BTreeSet;

use serde::Deserialize;

use super::types::{Gender, PatientAssessment, Vitals};
use super::TriageError;

pub const NO_SYMPTOMS_MESSAGE: &str = "at least one symptom required";

/// Outer bounds for well-formed input. They only catch malformed numbers;
/// every physiologically possible reading, however critical, passes.
pub mod limits {
    pub const AGE: (u32, u32) = (1, 120);
    pub const BP_SYSTOLIC: (u32, u32) = (1, 350);
    pub const BP_DIASTOLIC: (u32, u32) = (1, 250);
    pub const HEART_RATE: (u32, u32) = (1, 350);
    pub const TEMPERATURE: (f64, f64) = (20.0, 46.0);
    pub const SPO2: (f64, f64) = (0.0, 100.0);
}

/// Triage form exactly as received. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTriageForm {
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub bp_systolic: Option<u32>,
    pub bp_diastolic: Option<u32>,
    pub heart_rate: Option<u32>,
    pub temperature: Option<f64>,
    pub spo2: Option<f64>,
    #[serde(default)]
    pub pre_existing: Vec<String>,
}

/// Build a `PatientAssessment` from raw form input.
///
/// Missing vitals fall back to [`Vitals::default`]. Symptoms and conditions
/// are trimmed, lower-cased and de-duplicated; unknown strings are kept as-is.
pub fn normalize(form: RawTriageForm) -> Result<PatientAssessment, TriageError> {
    let symptoms = clean_terms(&form.symptoms);
    if symptoms.is_empty() {
        return Err(TriageError::Validation(NO_SYMPTOMS_MESSAGE.into()));
    }

    let age = form
        .age
        .ok_or_else(|| TriageError::Validation("age is required".into()))?;
    check_int("age", age, limits::AGE)?;

    let gender = form
        .gender
        .ok_or_else(|| TriageError::Validation("gender is required".into()))?;

    let defaults = Vitals::default();
    let vitals = Vitals {
        bp_systolic: form.bp_systolic.unwrap_or(defaults.bp_systolic),
        bp_diastolic: form.bp_diastolic.unwrap_or(defaults.bp_diastolic),
        heart_rate: form.heart_rate.unwrap_or(defaults.heart_rate),
        temperature: form.temperature.unwrap_or(defaults.temperature),
        spo2: form.spo2.unwrap_or(defaults.spo2),
    };
    check_int("bp_systolic", vitals.bp_systolic, limits::BP_SYSTOLIC)?;
    check_int("bp_diastolic", vitals.bp_diastolic, limits::BP_DIASTOLIC)?;
    check_int("heart_rate", vitals.heart_rate, limits::HEART_RATE)?;
    check_float("temperature", vitals.temperature, limits::TEMPERATURE)?;
    check_float("spo2", vitals.spo2, limits::SPO2)?;

    Ok(PatientAssessment {
        age,
        gender,
        vitals,
        symptoms,
        pre_existing_conditions: clean_terms(&form.pre_existing),
    })
}

/// Reject an empty symptom selection. Shared by the triage and quick-fix flows.
pub fn require_symptoms(symptoms: &[String]) -> Result<BTreeSet<String>, TriageError> {
    let cleaned = clean_terms(symptoms);
    if cleaned.is_empty() {
        return Err(TriageError::Validation(NO_SYMPTOMS_MESSAGE.into()));
    }
    Ok(cleaned)
}

/// Trim, lower-case and de-duplicate free-text terms, dropping blanks.
pub fn clean_terms(terms: &[String]) -> BTreeSet<String> {
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn check_int(field: &str, value: u32, (min, max): (u32, u32)) -> Result<(), TriageError> {
    if value < min || value > max {
        return Err(TriageError::Validation(format!(
            "{field} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

fn check_float(field: &str, value: f64, (min, max): (f64, f64)) -> Result<(), TriageError> {
    if !value.is_finite() || value < min || value > max {
        return Err(TriageError::Validation(format!(
            "{field} must be between {min:.1} and {max:.1}, got {value}"
        )));
    }
    Ok(())
}
