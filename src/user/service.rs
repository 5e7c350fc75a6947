//! User service for business logic.

use anyhow::{Context, Result, bail};
use tracing::{info, instrument, warn};

use super::models::{CreateUserRequest, User, UserListQuery};
use super::repository::UserRepository;
use crate::auth::Role;

/// Service for user management operations.
#[derive(Debug, Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    /// Create a new user with validation.
    ///
    /// A duplicate email is not pre-checked here: the unique constraint
    /// surfaces from the store and the classifier maps it, so racing
    /// creates cannot slip past the check.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User> {
        if !is_valid_email(&request.email) {
            bail!("Invalid email format.");
        }
        if request.name.trim().is_empty() {
            bail!("Name must not be empty.");
        }
        if request.password.len() < 6 {
            bail!("Password must be at least 6 characters.");
        }

        let password_hash = hash_password(&request.password)?;
        let role = request.role.unwrap_or(Role::Operator);

        let user = self
            .repo
            .create(&request.email, &request.name, &password_hash, role)
            .await?;
        info!(user_id = %user.id, email = %user.email, "Created new user");

        Ok(user)
    }

    /// Insert or refresh a user by email. Used by the seed command.
    #[instrument(skip(self, password))]
    pub async fn upsert_user(
        &self,
        email: &str,
        name: &str,
        password: &str,
        role: Role,
    ) -> Result<User> {
        let password_hash = hash_password(password)?;
        let user = self
            .repo
            .upsert_by_email(email, name, &password_hash, role)
            .await?;
        info!(user_id = %user.id, email = %user.email, role = %role, "Seeded user");
        Ok(user)
    }

    /// Get a user by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<User>> {
        self.repo.get(id).await
    }

    /// Get a user by email.
    #[instrument(skip(self))]
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        self.repo.get_by_email(email).await
    }

    /// List users with optional filters.
    #[instrument(skip(self))]
    pub async fn list(&self, query: UserListQuery) -> Result<Vec<User>> {
        self.repo.list(query).await
    }

    /// Deactivate a user. Outstanding tokens stop working on their next
    /// use because the auth middleware re-reads the account.
    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: &str) -> Result<User> {
        let user = self.repo.set_active(id, false).await?;
        warn!(user_id = %id, "Deactivated user");
        Ok(user)
    }

    /// Activate a user.
    #[instrument(skip(self))]
    pub async fn activate(&self, id: &str) -> Result<User> {
        let user = self.repo.set_active(id, true).await?;
        info!(user_id = %id, "Activated user");
        Ok(user)
    }

    /// Verify login credentials.
    ///
    /// Returns None for an unknown email, a deactivated account, and a
    /// wrong password alike; callers must not learn which one it was.
    #[instrument(skip(self, password))]
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = self.repo.get_by_email(email).await?;

        match user {
            Some(user) if user.is_active => {
                if verify_password(password, &user.password_hash)? {
                    // Update last login
                    self.repo.update_last_login(&user.id).await?;
                    return Ok(Some(user));
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

/// Basic email validation.
pub(crate) fn is_valid_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }
    !parts[0].is_empty() && parts[1].contains('.')
}

/// Hash a password using bcrypt.
fn hash_password(password: &str) -> Result<String> {
    // Use a lower cost factor for development speed
    let cost = if cfg!(debug_assertions) { 4 } else { 10 };
    bcrypt::hash(password, cost).context("Failed to hash password")
}

/// Verify a password against a bcrypt hash.
fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash).context("Failed to verify password")
}
