//! Authentication errors.

use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Authentication errors.
///
/// Guard failures are terminal for the request: each variant is converted
/// into an [`crate::api::ApiError`] so every rejection leaves through the
/// same response contract as handler failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing authorization header.
    #[error("missing authorization header")]
    MissingAuthHeader,

    /// Invalid authorization header format.
    #[error("invalid authorization header format")]
    InvalidAuthHeader,

    /// Invalid token (bad signature, malformed payload, wrong algorithm).
    #[error("invalid token")]
    InvalidToken,

    /// Token expired.
    #[error("token expired")]
    TokenExpired,

    /// Token subject no longer exists or has been deactivated.
    /// Reported to clients as an invalid token so account state is not
    /// revealed to holders of stale credentials.
    #[error("token subject inactive or unknown")]
    SubjectDisabled,

    /// No signing secret configured.
    #[error("no JWT secret configured")]
    SecretNotConfigured,

    /// Insufficient permissions.
    #[error("insufficient permissions")]
    InsufficientPermissions,

    /// Token creation failed.
    #[error("failed to create token: {0}")]
    TokenCreation(String),

    /// Internal error.
    #[error("internal auth error: {0}")]
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        crate::api::ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = AuthError::MissingAuthHeader;
        assert_eq!(err.to_string(), "missing authorization header");

        let err = AuthError::TokenCreation("bad key".to_string());
        assert_eq!(err.to_string(), "failed to create token: bad key");
    }
}
