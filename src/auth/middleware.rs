//! Authentication middleware.

use axum::{
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::sync::Arc;
use tracing::warn;

use super::{AuthConfig, AuthError, Claims, Role};
use crate::api::AppState;

/// Extract a Bearer token from an Authorization header value.
fn bearer_token_from_header(header_value: &str) -> Result<&str, AuthError> {
    let mut parts = header_value.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::InvalidAuthHeader)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidAuthHeader);
    }

    let token = parts.next().ok_or(AuthError::InvalidAuthHeader)?;
    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    if parts.next().is_some() {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok(token)
}

/// Authentication state shared across handlers.
///
/// Issues and verifies tokens. Key material is derived once at
/// construction; verification is a pure function of the token and the
/// configured secret.
#[derive(Clone)]
pub struct AuthState {
    config: Arc<AuthConfig>,
    encoding_key: Option<EncodingKey>,
    decoding_key: Option<DecodingKey>,
}

impl AuthState {
    /// Create new auth state from config.
    /// Resolves `env:VAR_NAME` syntax in jwt_secret at construction time.
    pub fn new(mut config: AuthConfig) -> Self {
        // Resolve jwt_secret if it uses env: syntax
        if let Ok(Some(resolved)) = config.resolve_jwt_secret() {
            config.jwt_secret = Some(resolved);
        }

        let encoding_key = config
            .jwt_secret
            .as_ref()
            .map(|s| EncodingKey::from_secret(s.as_bytes()));
        let decoding_key = config
            .jwt_secret
            .as_ref()
            .map(|s| DecodingKey::from_secret(s.as_bytes()));

        Self {
            config: Arc::new(config),
            encoding_key,
            decoding_key,
        }
    }

    /// Check if production mode is enabled.
    pub fn production_mode(&self) -> bool {
        self.config.production_mode
    }

    /// Get allowed CORS origins from config.
    pub fn allowed_origins(&self) -> &[String] {
        &self.config.allowed_origins
    }

    /// Issue a signed token for a user.
    pub fn issue_token(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
        role: Role,
    ) -> Result<String, AuthError> {
        let encoding_key = self
            .encoding_key
            .as_ref()
            .ok_or(AuthError::SecretNotConfigured)?;

        let now = Utc::now();
        let expires_at = now + Duration::hours(self.config.token_ttl_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::default(), &claims, encoding_key)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Verify a signed token.
    ///
    /// Only HS256 tokens signed with the configured secret are accepted.
    /// A token whose `exp` has been reached is expired: there is no
    /// leeway, and `exp == now` is already past the boundary.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let decoding_key = self
            .decoding_key
            .as_ref()
            .ok_or(AuthError::SecretNotConfigured)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, decoding_key, &validation).map_err(|e| {
            warn!("JWT validation failed: {:?}", e);
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;

        // The library treats exp == now as still valid; the contract here
        // is that a token dies exactly at its expiry timestamp.
        if token_data.claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}

/// Authenticated user extracted from request.
///
/// Built from the store row, not the token claims, so downstream handlers
/// always see the subject's current email, name, and role.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User ID.
    pub id: String,
    /// User's email.
    pub email: String,
    /// User's display name.
    pub name: String,
    /// User's role.
    pub role: Role,
}

impl CurrentUser {
    /// Check if user is admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Check that this user's role is one of `allowed`.
    ///
    /// Exact membership on the closed role set; there is no hierarchy.
    pub fn authorize(&self, allowed: &[Role]) -> Result<(), AuthError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }
}

/// Extract authentication from request.
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingAuthHeader)
    }
}

/// Authentication middleware.
///
/// Validates the bearer token and injects `CurrentUser` into request
/// extensions. The subject is re-fetched from the store on every request:
/// deactivating an account invalidates outstanding tokens immediately,
/// without a blacklist. Exactly one store read per authenticated request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = bearer_token_from_header(auth_header)?;
    let claims = state.auth.verify_token(token)?;

    let user = state
        .users
        .get(&claims.sub)
        .await
        .map_err(|e| AuthError::Internal(format!("{e:#}")))?;

    let user = match user {
        Some(user) if user.is_active => user,
        _ => return Err(AuthError::SubjectDisabled),
    };

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    });

    Ok(next.run(req).await)
}

/// Require admin role.
///
/// Use as an extractor in handlers that require admin access.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingAuthHeader)?;

        user.authorize(&[Role::Admin])?;

        Ok(RequireAdmin(user))
    }
}
