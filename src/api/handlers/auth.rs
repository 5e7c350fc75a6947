//! Authentication handlers.

use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::auth::CurrentUser;
use crate::user::{UserInfo, UserProfile};

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::api::validation;

/// Login request.
///
/// Missing fields deserialize to empty strings so validation reports
/// them as field violations instead of a body-rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserInfo,
}

/// Authenticate with email and password.
///
/// The failure message never says whether the email or the password was
/// wrong; an unknown address, a deactivated account, and a bad password
/// all get the same answer.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_login(&request.email, &request.password)?;

    let user = state
        .users
        .verify_credentials(&request.email, &request.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let token = state
        .auth
        .issue_token(&user.id, &user.email, &user.name, user.role)?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: user.into(),
    }))
}

/// Profile response.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

/// Get the authenticated user's profile.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ProfileResponse>> {
    let user = state
        .users
        .get(&user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ProfileResponse { user: user.into() }))
}
