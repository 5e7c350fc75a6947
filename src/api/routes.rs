//! API route definitions.

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::auth::auth_middleware;

use super::error::ApiError;
use super::handlers;
use super::middleware::log_failures;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - use specific origins from config
    let cors = build_cors_layer(&state);

    // Tracing layer with request spans and timing
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .route("/api/auth/profile", get(handlers::get_profile))
        // Drug registry
        .route("/api/drugs/manual", post(handlers::create_manual))
        .route(
            "/api/drugs/extract-from-image",
            post(handlers::create_from_image)
                // Backstop above the handler's own size check so oversized
                // uploads still get the JSON error contract.
                .layer(DefaultBodyLimit::max(12 * 1024 * 1024)),
        )
        .route("/api/drugs", get(handlers::list_drugs))
        .route("/api/drugs/{id}/qr", get(handlers::get_drug_qr))
        // Admin routes - user management
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/api/users/{user_id}/deactivate",
            post(handlers::deactivate_user),
        )
        .route(
            "/api/users/{user_id}/activate",
            post(handlers::activate_user),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    // Public routes (no authentication)
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/auth/login", post(handlers::login))
        .with_state(state.clone());

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(route_not_found)
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn_with_state(state, log_failures))
}

/// Terminal fallback so unknown routes still answer in the error contract.
async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

/// Build the CORS layer based on configuration.
///
/// With no configured origins, production denies all cross-origin
/// requests while development falls back to common localhost origins.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins = state.auth.allowed_origins();

    // Define allowed methods
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::OPTIONS,
    ];

    // Define allowed headers
    let headers = [
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        header::ORIGIN,
    ];

    if allowed_origins.is_empty() {
        if state.production_mode {
            tracing::warn!(
                "CORS: No origins configured in production mode, denying all cross-origin requests"
            );
            return CorsLayer::new()
                .allow_origin(AllowOrigin::exact(HeaderValue::from_static("null")));
        }

        tracing::warn!("CORS: No origins configured, using default localhost origins");
        return CorsLayer::new()
            .allow_origin([
                "http://localhost:3000".parse::<HeaderValue>().unwrap(),
                "http://localhost:8080".parse::<HeaderValue>().unwrap(),
                "http://127.0.0.1:3000".parse::<HeaderValue>().unwrap(),
                "http://127.0.0.1:8080".parse::<HeaderValue>().unwrap(),
            ])
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("CORS: Invalid origin in config: {}", origin);
                None
            })
        })
        .collect();

    if origins.is_empty() {
        tracing::error!("CORS: All configured origins are invalid!");
        return CorsLayer::new().allow_origin(AllowOrigin::exact(HeaderValue::from_static("null")));
    }

    tracing::info!("CORS: Allowing {} origin(s)", origins.len());
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(true)
}
