//! Terminal failure boundary.

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::header::USER_AGENT,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use tracing::error;

use super::error::{ErrorResponse, FailureDetail};
use super::state::AppState;

/// Failure logging and redaction boundary.
///
/// Wraps the whole router. When a response carries a [`FailureDetail`],
/// emits exactly one structured log record with method, path, caller IP,
/// and user agent before the response is released. In production mode the
/// body of a non-operational failure is replaced with a generic message;
/// the raw message still reaches the log.
pub async fn log_failures(
    State(state): State<AppState>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let client_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "-".to_string());
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let response = next.run(req).await;

    let Some(detail) = response.extensions().get::<FailureDetail>().cloned() else {
        return response;
    };

    error!(
        method = %method,
        path = %path,
        client_ip = %client_ip,
        user_agent = %user_agent,
        code = detail.code,
        status = response.status().as_u16(),
        "request failed: {}",
        detail.message
    );

    if state.production_mode && !detail.operational {
        let status = response.status();
        let body = ErrorResponse {
            error: "Internal server error".to_string(),
            code: detail.code,
            details: None,
        };
        return (status, Json(body)).into_response();
    }

    response
}
