//! Quick-fix classifier: a lightweight symptom + history lookup that
//! suggests a likely condition and a first-line remedy.
//!
//! Separate from the triage engine. Shares only the empty-symptom rule.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::triage::{require_symptoms, TriageError};

pub const UNDETERMINED: &str = "Undetermined";
pub const CONSULT_DOCTOR: &str = "Consult Doctor";
pub const NO_HISTORY: &str = "None";

/// Score bonus when the reported history is one the profile lists.
const HISTORY_BONUS: f64 = 0.10;

struct DiseaseProfile {
    disease: &'static str,
    symptoms: &'static [&'static str],
    history: &'static [&'static str],
    medicine: &'static str,
}

const PROFILES: &[DiseaseProfile] = &[
    DiseaseProfile {
        disease: "Common Cold",
        symptoms: &["Cough", "Sore Throat", "Runny Nose", "Sneezing", "Low Grade Fever", "Congestion"],
        history: &["None", "Asthma"],
        medicine: "Paracetamol, Decongestants, Rest",
    },
    DiseaseProfile {
        disease: "Influenza (Flu)",
        symptoms: &["High Fever", "Chills", "Muscle Aches", "Fatigue", "Dry Cough", "Headache", "Weakness"],
        history: &["None", "Diabetes", "Asthma", "Heart Disease"],
        medicine: "Oseltamivir (Tamiflu), Ibuprofen, Fluids",
    },
    DiseaseProfile {
        disease: "COVID-19",
        symptoms: &[
            "Fever",
            "Dry Cough",
            "Loss of Taste",
            "Loss of Smell",
            "Shortness of Breath",
            "Fatigue",
            "Sore Throat",
        ],
        history: &["None", "Diabetes", "Hypertension", "Obesity"],
        medicine: "Paxlovid (if severe), Paracetamol, Isolation",
    },
    DiseaseProfile {
        disease: "Migraine",
        symptoms: &[
            "Severe Headache",
            "Nausea",
            "Sensitivity to Light",
            "Sensitivity to Sound",
            "Visual Aura",
            "Throbbing Pain",
        ],
        history: &["None", "Family History of Migraine"],
        medicine: "Sumatriptan, Ibuprofen, Dark Room Rest",
    },
    DiseaseProfile {
        disease: "Tension Headache",
        symptoms: &["Dull Headache", "Neck Pain", "Scalp Tenderness", "Shoulder Pain", "Pressure Sensation"],
        history: &["None", "Stress"],
        medicine: "Ibuprofen, Aspirin, Stress Management",
    },
    DiseaseProfile {
        disease: "Gastroenteritis (Stomach Flu)",
        symptoms: &["Nausea", "Vomiting", "Diarrhea", "Stomach Cramps", "Low Grade Fever", "Dehydration"],
        history: &["None"],
        medicine: "ORS (Rehydration), Loperamide (if non-infectious), Probiotics",
    },
    DiseaseProfile {
        disease: "GERD (Acid Reflux)",
        symptoms: &["Heartburn", "Acid Regurgitation", "Chest Pain", "Difficulty Swallowing", "Chronic Cough"],
        history: &["None", "Obesity", "Smoking"],
        medicine: "Omeprazole, Antacids, Lifestyle Changes",
    },
    DiseaseProfile {
        disease: "Hypertension (High BP Episode)",
        symptoms: &[
            "Severe Headache",
            "Vision Problems",
            "Chest Pain",
            "Difficulty Breathing",
            "Irregular Heartbeat",
        ],
        history: &["Hypertension", "Diabetes", "High Cholesterol"],
        medicine: "Consult Doctor Immediately (Emergency), Amlodipine (Maintenance)",
    },
    DiseaseProfile {
        disease: "Type 2 Diabetes (Hyperglycemia)",
        symptoms: &["Increased Thirst", "Frequent Urination", "Blurry Vision", "Fatigue", "Slow Healing Sores"],
        history: &["Diabetes", "Obesity", "Family History"],
        medicine: "Metformin, Insulin, Hydration",
    },
    DiseaseProfile {
        disease: "Asthma Exacerbation",
        symptoms: &["Wheezing", "Shortness of Breath", "Chest Tightness", "Coughing"],
        history: &["Asthma", "Allergies", "Smoking"],
        medicine: "Salbutamol Inhaler, Corticosteroids",
    },
    DiseaseProfile {
        disease: "Allergic Rhinitis",
        symptoms: &["Sneezing", "Runny Nose", "Itchy Eyes", "Congestion", "Watery Eyes"],
        history: &["Allergies", "Eczema"],
        medicine: "Cetirizine, Loratadine, Nasal Sprays",
    },
    DiseaseProfile {
        disease: "Urinary Tract Infection (UTI)",
        symptoms: &["Burning Urination", "Frequent Urination", "Pelvic Pain", "Cloudy Urine"],
        history: &["None", "Diabetes", "Kidney Stones"],
        medicine: "Antibiotics (Nitrofurantoin), Cranberry Juice, Hydration",
    },
    DiseaseProfile {
        disease: "Pneumonia",
        symptoms: &["High Fever", "Chills", "Cough with Phlegm", "Shortness of Breath", "Chest Pain (Sharp)"],
        history: &["Smoking", "Asthma", "COPD"],
        medicine: "Antibiotics (Amoxicillin), Rest, Fluids - SEVERE: Hospital",
    },
    DiseaseProfile {
        disease: "Anemia",
        symptoms: &["Fatigue", "Weakness", "Pale Skin", "Dizziness", "Cold Hands/Feet"],
        history: &["None", "Heavy Periods", "Kidney Disease"],
        medicine: "Iron Supplements, Vitamin C, Dietary Changes",
    },
    DiseaseProfile {
        disease: "Food Poisoning",
        symptoms: &["Nausea", "Vomiting", "Watery Diarrhea", "Stomach Cramps", "Fever"],
        history: &["None"],
        medicine: "Fluids, ORS, Rest, Anti-emetics",
    },
    DiseaseProfile {
        disease: "Insomnia",
        symptoms: &["Difficulty Sleeping", "Waking Up Early", "Daytime Tiredness", "Irritability"],
        history: &["Stress", "Anxiety", "Depression"],
        medicine: "Melatonin, Sleep Hygiene, CBT-I",
    },
    DiseaseProfile {
        disease: "Anxiety Attack",
        symptoms: &["Palpitations", "Sweating", "Trembling", "Feelings of Doom", "Shortness of Breath"],
        history: &["Anxiety", "Stress", "Trauma"],
        medicine: "Breathing Exercises, SSRIs (Long term), Therapy",
    },
];

#[derive(Debug, Clone, Deserialize)]
pub struct QuickFixRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub history: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickFixResult {
    pub disease: String,
    pub medicine: String,
    pub confidence: f64,
}

/// Known symptom and history vocabularies, for building pick lists.
#[derive(Debug, Clone, Serialize)]
pub struct SymptomCatalog {
    pub symptoms: Vec<&'static str>,
    pub history: Vec<&'static str>,
}

/// Suggest the best-matching condition for the reported symptoms.
///
/// Score is the Jaccard overlap between reported and profile symptoms, plus
/// a bonus when the reported history is one the profile lists. Ties keep
/// table order. Unknown history counts as "None"; unknown symptoms simply
/// never match.
pub fn quick_fix(request: &QuickFixRequest) -> Result<QuickFixResult, TriageError> {
    let reported: BTreeSet<String> = require_symptoms(&request.symptoms)?
        .iter()
        .map(|s| symptom_key(s))
        .collect();
    let history = canonical_history(&request.history);

    let mut best: Option<(&DiseaseProfile, f64)> = None;
    for profile in PROFILES {
        let score = score_profile(profile, &reported, history);
        if score > best.map_or(0.0, |(_, s)| s) {
            best = Some((profile, score));
        }
    }

    let result = match best {
        Some((profile, score)) => QuickFixResult {
            disease: profile.disease.to_string(),
            medicine: profile.medicine.to_string(),
            confidence: round2(score.clamp(0.0, 1.0)),
        },
        None => QuickFixResult {
            disease: UNDETERMINED.to_string(),
            medicine: CONSULT_DOCTOR.to_string(),
            confidence: 0.0,
        },
    };

    tracing::debug!(
        disease = %result.disease,
        confidence = result.confidence,
        history,
        "Quick fix suggestion"
    );

    Ok(result)
}

/// Symptom and history vocabularies known to the classifier, each sorted
/// and de-duplicated across all profiles.
pub fn symptom_catalog() -> SymptomCatalog {
    let symptoms: BTreeSet<&'static str> = PROFILES
        .iter()
        .flat_map(|p| p.symptoms.iter().copied())
        .collect();

    SymptomCatalog {
        symptoms: symptoms.into_iter().collect(),
        history: history_options().into_iter().collect(),
    }
}

fn history_options() -> BTreeSet<&'static str> {
    PROFILES
        .iter()
        .flat_map(|p| p.history.iter().copied())
        .collect()
}

fn score_profile(
    profile: &DiseaseProfile,
    reported: &BTreeSet<String>,
    history: &'static str,
) -> f64 {
    let overlap = profile
        .symptoms
        .iter()
        .filter(|s| reported.contains(&symptom_key(s)))
        .count();
    if overlap == 0 {
        return 0.0;
    }

    let union = reported.len() + profile.symptoms.len() - overlap;
    let mut score = overlap as f64 / union as f64;
    if history != NO_HISTORY && profile.history.contains(&history) {
        score += HISTORY_BONUS;
    }
    score
}

/// `"Loss-of  TASTE"` → `"loss of taste"`.
fn symptom_key(symptom: &str) -> String {
    symptom
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve free-text history against the known options; unknown means none.
fn canonical_history(history: &str) -> &'static str {
    let wanted = history.trim();
    history_options()
        .into_iter()
        .find(|option| option.eq_ignore_ascii_case(wanted))
        .unwrap_or(NO_HISTORY)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::NO_SYMPTOMS_MESSAGE;

    fn request(symptoms: &[&str], history: &str) -> QuickFixRequest {
        QuickFixRequest {
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            history: history.to_string(),
        }
    }

    #[test]
    fn empty_symptoms_rejected_like_triage() {
        let err = quick_fix(&request(&[], "None")).unwrap_err();
        assert_eq!(err, TriageError::Validation(NO_SYMPTOMS_MESSAGE.into()));
    }

    #[test]
    fn every_profile_matches_its_own_symptoms() {
        assert_eq!(PROFILES.len(), 17);
        for profile in PROFILES {
            let result = quick_fix(&request(profile.symptoms, "None")).unwrap();
            assert_eq!(result.disease, profile.disease);
            assert_eq!(result.medicine, profile.medicine);
            assert_eq!(result.confidence, 1.0, "{}", profile.disease);
        }
    }

    #[test]
    fn covid_symptom_subset() {
        let result = quick_fix(&request(
            &["Loss of Taste", "Loss of Smell", "Fever", "Dry Cough"],
            "None",
        ))
        .unwrap();
        assert_eq!(result.disease, "COVID-19");
        assert_eq!(result.medicine, "Paxlovid (if severe), Paracetamol, Isolation");
        // 4 shared of 7 total
        assert_eq!(result.confidence, 0.57);
    }

    #[test]
    fn urinary_symptoms_suggest_uti() {
        let result = quick_fix(&request(&["Burning Urination", "Frequent Urination"], "None")).unwrap();
        assert_eq!(result.disease, "Urinary Tract Infection (UTI)");
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn reflux_with_obesity_history() {
        let result = quick_fix(&request(&["Heartburn", "Acid Regurgitation"], "Obesity")).unwrap();
        assert_eq!(result.disease, "GERD (Acid Reflux)");
        assert_eq!(result.medicine, "Omeprazole, Antacids, Lifestyle Changes");
        // 2/5 overlap plus the history bonus
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn free_text_symptoms_are_canonicalized() {
        let result = quick_fix(&request(&["loss-of-taste", "LOSS OF SMELL"], "none")).unwrap();
        assert_eq!(result.disease, "COVID-19");
        assert_eq!(result.confidence, 0.29);
    }

    #[test]
    fn history_breaks_ambiguity() {
        let without = quick_fix(&request(&["Shortness of Breath"], "None")).unwrap();
        assert_eq!(without.disease, "Asthma Exacerbation");

        let with = quick_fix(&request(&["Shortness of Breath"], "copd")).unwrap();
        assert_eq!(with.disease, "Pneumonia");
        assert_eq!(with.confidence, 0.3);
    }

    #[test]
    fn ties_keep_table_order() {
        // Chest Pain is 1/5 for both GERD and the hypertensive episode.
        let result = quick_fix(&request(&["Chest Pain"], "None")).unwrap();
        assert_eq!(result.disease, "GERD (Acid Reflux)");

        let result = quick_fix(&request(&["Chest Pain"], "Hypertension")).unwrap();
        assert_eq!(result.disease, "Hypertension (High BP Episode)");
    }

    #[test]
    fn unknown_history_treated_as_none() {
        let a = quick_fix(&request(&["Shortness of Breath"], "Gout")).unwrap();
        let b = quick_fix(&request(&["Shortness of Breath"], "None")).unwrap();
        assert_eq!(a, b);
        assert_eq!(canonical_history("Gout"), NO_HISTORY);
        assert_eq!(canonical_history(" smoking "), "Smoking");
    }

    #[test]
    fn no_overlap_is_undetermined() {
        let result = quick_fix(&request(&["glowing left ear"], "None")).unwrap();
        assert_eq!(result.disease, UNDETERMINED);
        assert_eq!(result.medicine, CONSULT_DOCTOR);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn catalog_is_derived_from_profiles() {
        let catalog = symptom_catalog();
        let mut sorted = catalog.symptoms.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, catalog.symptoms);
        assert!(catalog.symptoms.contains(&"Loss of Taste"));
        assert!(catalog.symptoms.contains(&"Cold Hands/Feet"));

        for option in ["None", "Obesity", "Smoking", "Allergies", "COPD", "Diabetes"] {
            assert!(catalog.history.contains(&option), "missing {option}");
        }
        let mut sorted = catalog.history.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, catalog.history);
    }
}
