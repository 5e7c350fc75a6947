//! Admin-only user management handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use tracing::instrument;

use crate::auth::RequireAdmin;
use crate::user::{CreateUserRequest, UserListQuery, UserProfile};

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::api::validation;

/// User list response.
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub data: Vec<UserProfile>,
    pub count: usize,
}

/// List user accounts (admin only).
#[instrument(skip(state, _admin))]
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<UserListResponse>> {
    let users = state.users.list(query).await?;
    let data: Vec<UserProfile> = users.into_iter().map(Into::into).collect();
    let count = data.len();

    Ok(Json(UserListResponse { data, count }))
}

/// Single-user response.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: UserProfile,
}

/// Create a user account (admin only).
///
/// A duplicate email surfaces from the store's unique constraint and is
/// answered with a generic conflict.
#[instrument(skip(state, _admin, request), fields(email = %request.email))]
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_new_user(&request)?;

    let user = state.users.create_user(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            message: "User created successfully".to_string(),
            user: user.into(),
        }),
    ))
}

/// Deactivate a user (admin only). Outstanding tokens for the account
/// stop working on their next use.
#[instrument(skip(state, admin))]
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    state
        .users
        .get(&user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let user = state.users.deactivate(&user_id).await?;

    state
        .audit
        .record("DEACTIVATE_USER", Some(&admin.id), "user", Some(&user_id), None)
        .await;

    Ok(Json(UserResponse {
        message: "User deactivated".to_string(),
        user: user.into(),
    }))
}

/// Activate a user (admin only).
#[instrument(skip(state, admin))]
pub async fn activate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    state
        .users
        .get(&user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let user = state.users.activate(&user_id).await?;

    state
        .audit
        .record("ACTIVATE_USER", Some(&admin.id), "user", Some(&user_id), None)
        .await;

    Ok(Json(UserResponse {
        message: "User activated".to_string(),
        user: user.into(),
    }))
}
