//! HTTP API module.
//!
//! Routes, handlers, shared state, request validation, and the unified
//! error contract.

mod error;
mod handlers;
mod middleware;
mod routes;
mod state;
mod validation;

pub use error::{ApiError, ApiResult, ErrorResponse, FieldViolation};
pub use routes::create_router;
pub use state::AppState;
