use super::types::{ContributingFactor, Direction, PatientAssessment};

/// Maximum number of recommended actions surfaced to callers.
pub const MAX_SURFACED_ACTIONS: usize = 3;

/// Thresholds at which a vital is reported as a contributing factor.
pub mod factor_thresholds {
    pub const TEMPERATURE_ABOVE: f64 = 37.5;
    pub const SPO2_BELOW: f64 = 95.0;
    pub const HEART_RATE_ABOVE: u32 = 100;
}

/// Contributing factors for an assessment, independent of the risk tier.
///
/// Emission order is fixed: temperature, SpO2, heart rate. Blood pressure
/// takes part in tier selection but is never reported here.
pub fn compose_factors(assessment: &PatientAssessment) -> Vec<ContributingFactor> {
    let vitals = &assessment.vitals;
    let mut factors = Vec::with_capacity(3);

    if vitals.temperature > factor_thresholds::TEMPERATURE_ABOVE {
        factors.push(factor("Temperature", 0.45, Direction::Increases));
    }
    if vitals.spo2 < factor_thresholds::SPO2_BELOW {
        factors.push(factor("SpO2 (Oxygen)", 0.35, Direction::Decreases));
    }
    if vitals.heart_rate > factor_thresholds::HEART_RATE_ABOVE {
        factors.push(factor("Heart Rate", 0.20, Direction::Increases));
    }

    factors
}

/// Build the explanation text: headline, one bullet per surfaced action,
/// then the reported symptoms and history when present.
pub fn compose_explanation(
    headline: &str,
    actions: &[String],
    assessment: &PatientAssessment,
) -> String {
    let mut lines = vec![headline.to_string()];
    lines.extend(
        actions
            .iter()
            .take(MAX_SURFACED_ACTIONS)
            .map(|a| format!("- {a}")),
    );

    if !assessment.symptoms.is_empty() {
        lines.push(format!(
            "Reported symptoms: {}",
            join(assessment.symptoms.iter())
        ));
    }
    if !assessment.pre_existing_conditions.is_empty() {
        lines.push(format!(
            "Pre-existing conditions: {}",
            join(assessment.pre_existing_conditions.iter())
        ));
    }

    lines.join("\n")
}

/// Sort factors by descending contribution, keeping input order among equals.
pub fn rank_factors(factors: &mut [ContributingFactor]) {
    factors.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
}

fn factor(feature: &str, contribution: f64, direction: Direction) -> ContributingFactor {
    ContributingFactor {
        feature: feature.to_string(),
        contribution,
        direction,
    }
}

fn join<'a>(terms: impl Iterator<Item = &'a String>) -> String {
    terms.map(String::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::types::{Gender, Vitals};
    use std::collections::BTreeSet;

    fn assessment(vitals: Vitals) -> PatientAssessment {
        PatientAssessment {
            age: 30,
            gender: Gender::Other,
            vitals,
            symptoms: BTreeSet::from(["cough".to_string()]),
            pre_existing_conditions: BTreeSet::new(),
        }
    }

    fn features(factors: &[ContributingFactor]) -> Vec<&str> {
        factors.iter().map(|f| f.feature.as_str()).collect()
    }

    #[test]
    fn normal_vitals_produce_no_factors() {
        assert!(compose_factors(&assessment(Vitals::default())).is_empty());
    }

    #[test]
    fn all_factors_in_fixed_order() {
        let a = assessment(Vitals {
            temperature: 38.0,
            spo2: 93.0,
            heart_rate: 110,
            ..Vitals::default()
        });
        let factors = compose_factors(&a);
        assert_eq!(features(&factors), vec!["Temperature", "SpO2 (Oxygen)", "Heart Rate"]);
        assert_eq!(factors[1].direction, Direction::Decreases);
    }

    #[test]
    fn order_is_preserved_when_filtered() {
        let a = assessment(Vitals {
            temperature: 38.0,
            heart_rate: 105,
            ..Vitals::default()
        });
        assert_eq!(features(&compose_factors(&a)), vec!["Temperature", "Heart Rate"]);
    }

    #[test]
    fn thresholds_are_strict() {
        let a = assessment(Vitals {
            temperature: 37.5,
            spo2: 95.0,
            heart_rate: 100,
            ..Vitals::default()
        });
        assert!(compose_factors(&a).is_empty());
    }

    #[test]
    fn blood_pressure_never_reported() {
        let a = assessment(Vitals {
            bp_systolic: 200,
            ..Vitals::default()
        });
        assert!(compose_factors(&a).is_empty());
    }

    #[test]
    fn fixed_order_is_descending_contribution() {
        let a = assessment(Vitals {
            temperature: 39.5,
            spo2: 80.0,
            heart_rate: 130,
            ..Vitals::default()
        });
        let factors = compose_factors(&a);
        let mut ranked = factors.clone();
        rank_factors(&mut ranked);
        assert_eq!(factors, ranked);
    }

    #[test]
    fn explanation_layout() {
        let mut a = assessment(Vitals::default());
        a.pre_existing_conditions.insert("asthma".into());
        let actions = vec!["Rest".to_string(), "Hydration".to_string()];
        let text = compose_explanation("All good.", &actions, &a);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "All good.",
                "- Rest",
                "- Hydration",
                "Reported symptoms: cough",
                "Pre-existing conditions: asthma",
            ]
        );
    }

    #[test]
    fn explanation_caps_surfaced_actions() {
        let a = assessment(Vitals::default());
        let actions: Vec<String> = (1..=5).map(|i| format!("Step {i}")).collect();
        let text = compose_explanation("Headline", &actions, &a);
        assert_eq!(text.lines().filter(|l| l.starts_with("- ")).count(), 3);
    }
}
