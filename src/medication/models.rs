//! Medication data models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Medication entity from database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Medication {
    pub id: String,
    pub name: String,
    pub registration_number: String,
    pub batch_number: Option<String>,
    pub manufacturer: Option<String>,
    pub dosage: Option<String>,
    pub expiration_date: Option<String>,
    pub storage_location: Option<String>,
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields accepted when registering a medication.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateMedicationRequest {
    pub name: String,
    pub batch_number: Option<String>,
    pub manufacturer: Option<String>,
    pub dosage: Option<String>,
    pub expiration_date: Option<String>,
    pub storage_location: Option<String>,
}

/// Medication list query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicationListQuery {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
