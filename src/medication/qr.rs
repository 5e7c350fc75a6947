//! QR payload construction for verification links.

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Serialize;

use super::models::Medication;

/// System identifier embedded in every QR payload.
pub const SYSTEM_NAME: &str = "Veritrace Pharmaceutical Traceability";

/// The verification payload encoded into a QR code.
///
/// Keys are camelCase because the payload is consumed by external QR
/// scanners, not this API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub id: String,
    pub registration_number: String,
    pub name: String,
    pub batch_number: String,
    pub manufacturer: String,
    pub dosage: String,
    pub expiration_date: String,
    pub storage_location: String,
    pub registered_at: String,
    pub verification_url: String,
    pub system: String,
}

/// Encoded QR code material returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct QrCode {
    /// Base64 of the pretty-printed payload JSON.
    pub data: String,
    /// Embeddable data URL wrapping `data`.
    pub data_url: String,
    /// Plain verification link for the record.
    pub verification_url: String,
}

/// Build the QR code material for a medication.
pub fn build(medication: &Medication, public_base_url: &str) -> Result<QrCode> {
    let verification_url = verification_url(public_base_url, &medication.id);

    let placeholder = || "N/A".to_string();
    let payload = QrPayload {
        id: medication.id.clone(),
        registration_number: medication.registration_number.clone(),
        name: medication.name.clone(),
        batch_number: medication.batch_number.clone().unwrap_or_else(placeholder),
        manufacturer: medication.manufacturer.clone().unwrap_or_else(placeholder),
        dosage: medication.dosage.clone().unwrap_or_else(placeholder),
        expiration_date: medication
            .expiration_date
            .clone()
            .unwrap_or_else(placeholder),
        storage_location: medication
            .storage_location
            .clone()
            .unwrap_or_else(placeholder),
        registered_at: medication.created_at.clone(),
        verification_url: verification_url.clone(),
        system: SYSTEM_NAME.to_string(),
    };

    let json = serde_json::to_string_pretty(&payload).context("serializing QR payload")?;
    let data = STANDARD.encode(json.as_bytes());
    let data_url = format!("data:text/plain;charset=utf-8;base64,{}", data);

    Ok(QrCode {
        data,
        data_url,
        verification_url,
    })
}

/// Verification link for a medication record.
pub fn verification_url(public_base_url: &str, medication_id: &str) -> String {
    format!(
        "{}/verify/{}",
        public_base_url.trim_end_matches('/'),
        medication_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_medication() -> Medication {
        Medication {
            id: "med_abc123".to_string(),
            name: "Amoxicillin".to_string(),
            registration_number: "VTR-2025-123456789".to_string(),
            batch_number: Some("B-42".to_string()),
            manufacturer: None,
            dosage: Some("500mg".to_string()),
            expiration_date: None,
            storage_location: None,
            created_by: Some("usr_1".to_string()),
            created_at: "2025-06-01 12:00:00".to_string(),
            updated_at: "2025-06-01 12:00:00".to_string(),
        }
    }

    #[test]
    fn test_qr_payload_round_trip() {
        let qr = build(&sample_medication(), "https://trace.example.com").unwrap();

        let decoded = STANDARD.decode(&qr.data).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&decoded).unwrap();

        assert_eq!(value["id"], "med_abc123");
        assert_eq!(value["registrationNumber"], "VTR-2025-123456789");
        assert_eq!(value["batchNumber"], "B-42");
        assert_eq!(value["manufacturer"], "N/A");
        assert_eq!(value["expirationDate"], "N/A");
        assert_eq!(value["system"], SYSTEM_NAME);
        assert_eq!(
            value["verificationUrl"],
            "https://trace.example.com/verify/med_abc123"
        );
    }

    #[test]
    fn test_qr_data_url_wraps_data() {
        let qr = build(&sample_medication(), "http://localhost:3001").unwrap();
        assert_eq!(
            qr.data_url,
            format!("data:text/plain;charset=utf-8;base64,{}", qr.data)
        );
    }

    #[test]
    fn test_verification_url_trims_trailing_slash() {
        assert_eq!(
            verification_url("http://localhost:3001/", "med_1"),
            "http://localhost:3001/verify/med_1"
        );
    }
}
