//! Wire types for the image-extraction service.

use serde::{Deserialize, Serialize};

/// Drug fields recognized in a label image. Every field is optional;
/// the service omits what it could not read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedDrugInfo {
    pub name: Option<String>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<String>,
    pub manufacturing_date: Option<String>,
    pub dosage: Option<String>,
    pub manufacturer: Option<String>,
    pub registration_number: Option<String>,
}

/// Response from `POST /extract-drug-info`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionResponse {
    pub success: bool,
    pub extracted_text: Option<String>,
    pub drug_info: Option<ExtractedDrugInfo>,
    pub qr_code: Option<String>,
    pub qr_data_url: Option<String>,
}

/// Error body the extraction service returns on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionErrorBody {
    pub detail: Option<String>,
}
