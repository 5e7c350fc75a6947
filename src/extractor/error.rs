//! Extraction client error types.

use thiserror::Error;

use crate::api::ApiError;

/// Result type for extraction operations.
pub type ExtractorResult<T> = Result<T, ExtractorError>;

/// Errors that can occur talking to the image-extraction service.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// No HTTP response came back (connect failure, timeout, DNS).
    #[error("Failed to reach extraction service at {url}: {message}")]
    Unreachable { url: String, message: String },

    /// The service answered with a non-success status.
    #[error("Extraction service error ({status}): {detail}")]
    Upstream { status: u16, detail: String },

    /// The service answered 2xx but the body was not the expected shape.
    #[error("Failed to parse extraction response: {0}")]
    InvalidResponse(String),

    /// The multipart request could not be built.
    #[error("Failed to build extraction request: {0}")]
    InvalidRequest(String),
}

impl From<ExtractorError> for ApiError {
    fn from(err: ExtractorError) -> Self {
        match err {
            ExtractorError::Unreachable { .. } => ApiError::service_unavailable(
                "Image processing service is temporarily unavailable. Please try again later.",
            ),
            ExtractorError::Upstream { status, detail } => ApiError::upstream(status, detail),
            ExtractorError::InvalidResponse(_) => {
                ApiError::upstream(502, "Image processing service returned an invalid response")
            }
            ExtractorError::InvalidRequest(msg) => {
                ApiError::internal(format!("Failed to build extraction request: {msg}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_unreachable_maps_to_pinned_503() {
        let api: ApiError = ExtractorError::Unreachable {
            url: "http://localhost:8000/extract-drug-info".to_string(),
            message: "connection refused".to_string(),
        }
        .into();

        assert_eq!(api.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            api.to_string(),
            "Image processing service is temporarily unavailable. Please try again later."
        );
        // No trace of the internal URL leaks to the client.
        assert!(!api.to_string().contains("localhost"));
    }

    #[test]
    fn test_upstream_status_passes_through() {
        let api: ApiError = ExtractorError::Upstream {
            status: 422,
            detail: "Unsupported image format".to_string(),
        }
        .into();

        assert_eq!(api.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api.to_string(), "Unsupported image format");
    }

    #[test]
    fn test_invalid_response_maps_to_502() {
        let api: ApiError = ExtractorError::InvalidResponse("not json".to_string()).into();
        assert_eq!(api.status_code(), StatusCode::BAD_GATEWAY);
    }
}
