//! User management module.
//!
//! Provides user accounts, credential verification, and activation state.

mod models;
mod repository;
mod service;

pub use models::{CreateUserRequest, User, UserInfo, UserListQuery, UserProfile};
pub use repository::UserRepository;
pub use service::UserService;

pub(crate) use service::is_valid_email;
