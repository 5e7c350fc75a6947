//! Drug registry handlers.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use tracing::instrument;

use crate::auth::CurrentUser;
use crate::extractor::ExtractedDrugInfo;
use crate::medication::{CreateMedicationRequest, Medication, MedicationListQuery, QrCode};

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::api::validation;

/// Maximum accepted image upload size.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Response for a newly registered medication.
#[derive(Debug, Serialize)]
pub struct MedicationCreatedResponse {
    pub message: String,
    pub medication: Medication,
    pub qr: QrCode,
}

/// Register a medication from manually entered fields.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn create_manual(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateMedicationRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_new_medication(&request)?;

    let (medication, qr) = state.medications.register(&request, &user.id).await?;

    state
        .audit
        .record(
            "CREATE_MEDICATION",
            Some(&user.id),
            "medication",
            Some(&medication.id),
            Some(&medication.registration_number),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(MedicationCreatedResponse {
            message: "Medication registered successfully".to_string(),
            medication,
            qr,
        }),
    ))
}

/// Response for a medication registered from a label photo.
#[derive(Debug, Serialize)]
pub struct ExtractedMedicationResponse {
    pub message: String,
    pub medication: Medication,
    pub qr: QrCode,
    pub extracted: ExtractedDrugInfo,
    pub extracted_text: Option<String>,
}

/// Register a medication from a label photo.
///
/// The image is forwarded to the extraction service; whatever fields it
/// recognized become the new record, with "Unknown" standing in for a
/// name it could not read.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_from_image(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut image: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field.content_type().unwrap_or("").to_string();
        if !content_type.starts_with("image/") {
            return Err(ApiError::bad_request("Only image files are allowed"));
        }

        let file_name = field.file_name().unwrap_or("upload.jpg").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read image: {e}")))?;

        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ApiError::bad_request("Image file is too large (max 10 MB)"));
        }

        image = Some((file_name, content_type, bytes.to_vec()));
        break;
    }

    let (file_name, content_type, bytes) =
        image.ok_or_else(|| ApiError::bad_request("Image file is required"))?;

    let extraction = state
        .extractor
        .extract(&file_name, &content_type, bytes)
        .await
        .map_err(ApiError::from)?;

    let info = extraction.drug_info.unwrap_or_default();

    let request = CreateMedicationRequest {
        name: info.name.clone().unwrap_or_else(|| "Unknown".to_string()),
        batch_number: info.batch_number.clone(),
        manufacturer: info.manufacturer.clone(),
        dosage: info.dosage.clone(),
        expiration_date: info.expiry_date.clone(),
        storage_location: None,
    };

    let (medication, qr) = state.medications.register(&request, &user.id).await?;

    state
        .audit
        .record(
            "CREATE_MEDICATION_FROM_IMAGE",
            Some(&user.id),
            "medication",
            Some(&medication.id),
            info.name.as_deref(),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(ExtractedMedicationResponse {
            message: "Medication registered from image".to_string(),
            medication,
            qr,
            extracted: info,
            extracted_text: extraction.extracted_text,
        }),
    ))
}

/// Medication list response.
#[derive(Debug, Serialize)]
pub struct MedicationListResponse {
    pub data: Vec<Medication>,
    pub count: usize,
}

/// List medications, optionally filtered by a search term.
#[instrument(skip(state, _user))]
pub async fn list_drugs(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<MedicationListQuery>,
) -> ApiResult<Json<MedicationListResponse>> {
    let data = state.medications.list(&query).await?;
    let count = data.len();

    Ok(Json(MedicationListResponse { data, count }))
}

/// Medication QR response.
#[derive(Debug, Serialize)]
pub struct MedicationQrResponse {
    pub medication: Medication,
    pub qr: QrCode,
}

/// Get the QR payload for a medication.
#[instrument(skip(state, _user))]
pub async fn get_drug_qr(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MedicationQrResponse>> {
    let (medication, qr) = state
        .medications
        .get_with_qr(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Medication not found"))?;

    Ok(Json(MedicationQrResponse { medication, qr }))
}
