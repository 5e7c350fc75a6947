//! Authentication module.
//!
//! Issues and verifies HS256 bearer tokens, and guards routes:
//! - token verification is pure; no store access
//! - the middleware re-fetches the subject on every request so
//!   deactivation takes effect immediately
//! - role checks are exact membership on a closed enum

mod claims;
mod config;
mod error;
mod middleware;

pub use claims::{Claims, Role};
pub use config::{AuthConfig, ConfigValidationError};
pub use error::AuthError;
pub use middleware::{AuthState, CurrentUser, RequireAdmin, auth_middleware};
