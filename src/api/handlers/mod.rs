//! API request handlers, organized by domain:
//! - `auth`: login and profile
//! - `drugs`: medication registration and lookup
//! - `admin`: admin-only user management
//! - `misc`: health check

mod admin;
mod auth;
mod drugs;
mod misc;

pub use admin::{activate_user, create_user, deactivate_user, list_users};
pub use auth::{get_profile, login};
pub use drugs::{MAX_IMAGE_BYTES, create_from_image, create_manual, get_drug_qr, list_drugs};
pub use misc::health;
