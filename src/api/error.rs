//! Unified API error handling with structured responses.
//!
//! Every failure leaving the service goes through [`ApiError`]: guard
//! rejections, validation failures, store-constraint violations, upstream
//! service errors, and unexpected faults all collapse into one response
//! shape. Classification is deterministic: validation, then store
//! constraints, then operational errors, then the unknown fallback.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// A single violated field in a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// API error type with structured responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    /// Input validation failed; one entry per violated field, in the
    /// order the fields are declared.
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("{0}")]
    ServiceUnavailable(String),

    /// Upstream service failure passed through with its own status.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Unexpected fault. The only non-operational variant: its message is
    /// redacted from responses in production mode.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::Validation(violations)
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Conflict(_) => "CONFLICT",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the message was raised deliberately by application logic
    /// and is safe to show to the caller as-is.
    pub fn is_operational(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }

    /// Classify an anyhow error chain into the appropriate variant.
    ///
    /// Store-constraint failures anywhere in the chain are mapped first;
    /// then an `ApiError` raised by application logic passes through
    /// unchanged; everything else is an unexpected fault.
    pub fn classify(err: anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(sqlx_error) = cause.downcast_ref::<sqlx::Error>() {
                return Self::from_store_error(sqlx_error);
            }
        }

        match err.downcast::<ApiError>() {
            Ok(operational) => operational,
            Err(err) => Self::Internal(format!("{err:#}")),
        }
    }

    /// Map a store error to the response contract.
    ///
    /// The conflict message deliberately never names the violated field:
    /// echoing it would let callers enumerate existing records.
    fn from_store_error(err: &sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => {
                Self::NotFound("The requested record was not found".to_string())
            }
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    Self::Conflict("A record with this data already exists".to_string())
                } else if db_err.is_foreign_key_violation() {
                    Self::BadRequest("Referenced record does not exist".to_string())
                } else {
                    Self::Internal(db_err.message().to_string())
                }
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Structured error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
}

/// Breadcrumb attached to failed responses for the failure logger.
///
/// Carries the unredacted message so the log record is complete even
/// when the response body is not.
#[derive(Debug, Clone)]
pub struct FailureDetail {
    pub code: &'static str,
    pub message: String,
    pub operational: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let operational = self.is_operational();
        let message = self.to_string();

        let details = match &self {
            Self::Validation(violations) => Some(violations.clone()),
            _ => None,
        };

        let body = ErrorResponse {
            error: message.clone(),
            code,
            details,
        };

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(FailureDetail {
            code,
            message,
            operational,
        });
        response
    }
}

/// Convert anyhow errors to API errors using the centralized classification.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::classify(err)
    }
}

/// Convert auth errors to API errors.
impl From<crate::auth::AuthError> for ApiError {
    fn from(err: crate::auth::AuthError) -> Self {
        use crate::auth::AuthError;
        match err {
            AuthError::MissingAuthHeader | AuthError::InvalidAuthHeader => {
                ApiError::Unauthorized("Authentication required".to_string())
            }
            AuthError::InvalidToken | AuthError::SubjectDisabled => {
                ApiError::Unauthorized("Invalid token".to_string())
            }
            AuthError::TokenExpired => ApiError::Unauthorized("Token expired".to_string()),
            AuthError::InsufficientPermissions => {
                ApiError::Forbidden("Insufficient permissions".to_string())
            }
            AuthError::SecretNotConfigured => {
                ApiError::Internal("JWT secret not configured".to_string())
            }
            AuthError::TokenCreation(msg) => {
                ApiError::Internal(format!("Failed to create token: {}", msg))
            }
            AuthError::Internal(msg) => {
                ApiError::Internal(format!("Authentication error: {}", msg))
            }
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
