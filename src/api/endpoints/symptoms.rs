use axum::Json;

use crate::quick_fix::{symptom_catalog, SymptomCatalog};

/// `GET /api/symptoms`: known symptom and history vocabularies.
pub async fn catalog() -> Json<SymptomCatalog> {
    Json(symptom_catalog())
}
