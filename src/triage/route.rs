use super::types::RiskLevel;

pub const EMERGENCY: &str = "Emergency";
pub const GENERAL_MEDICINE: &str = "General Medicine";

/// Recommended care department for a risk level.
pub fn route_department(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical | RiskLevel::High => EMERGENCY,
        RiskLevel::Medium | RiskLevel::Low => GENERAL_MEDICINE,
    }
}
