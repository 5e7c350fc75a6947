//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT secret for HS256.
    /// REQUIRED when production_mode is true.
    pub jwt_secret: Option<String>,

    /// Token lifetime in hours.
    pub token_ttl_hours: i64,

    /// Production mode: requires a strong secret and redacts internal
    /// error messages from responses.
    pub production_mode: bool,

    /// Allowed CORS origins. If empty in production, CORS is disabled.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // No default JWT secret - must be explicitly configured
            jwt_secret: None,
            token_ttl_hours: 168,
            production_mode: false,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:8080".to_string(),
            ],
        }
    }
}

impl AuthConfig {
    /// Resolve the JWT secret, expanding `env:VAR_NAME` syntax.
    /// Returns the resolved secret or None if not configured.
    pub fn resolve_jwt_secret(&self) -> Result<Option<String>, ConfigValidationError> {
        match &self.jwt_secret {
            None => Ok(None),
            Some(value) => {
                if let Some(var_name) = value.strip_prefix("env:") {
                    match std::env::var(var_name) {
                        Ok(secret) if !secret.is_empty() => Ok(Some(secret)),
                        Ok(_) => Err(ConfigValidationError::EnvVarEmpty(var_name.to_string())),
                        Err(_) => Err(ConfigValidationError::EnvVarNotFound(var_name.to_string())),
                    }
                } else {
                    Ok(Some(value.clone()))
                }
            }
        }
    }

    /// Validate the configuration.
    /// Returns an error if the configuration is invalid for the current mode.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.production_mode {
            // In production mode, JWT secret is required
            let secret = self.resolve_jwt_secret()?;

            if secret.is_none() {
                return Err(ConfigValidationError::MissingJwtSecret);
            }

            // Check that the JWT secret is not the insecure placeholder
            if let Some(ref secret) = secret {
                if secret == "change-me-before-deploying" {
                    return Err(ConfigValidationError::InsecureJwtSecret);
                }
                // Ensure minimum secret length for security
                if secret.len() < 32 {
                    return Err(ConfigValidationError::JwtSecretTooShort);
                }
            }
        }

        if self.token_ttl_hours <= 0 {
            return Err(ConfigValidationError::InvalidTokenTtl);
        }

        Ok(())
    }

    /// Generate a secure random JWT secret using cryptographically secure RNG.
    ///
    /// Uses the `rand` crate with `ThreadRng` which is backed by the OS's
    /// cryptographically secure random number generator (via `getrandom`).
    pub fn generate_jwt_secret() -> String {
        use rand::Rng;

        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        const SECRET_LENGTH: usize = 64;

        let mut rng = rand::rng();
        (0..SECRET_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// JWT secret is required in production mode.
    MissingJwtSecret,
    /// JWT secret is the insecure placeholder value.
    InsecureJwtSecret,
    /// JWT secret is too short (minimum 32 characters).
    JwtSecretTooShort,
    /// Token TTL must be positive.
    InvalidTokenTtl,
    /// Environment variable not found (for `env:VAR_NAME` syntax).
    EnvVarNotFound(String),
    /// Environment variable is empty (for `env:VAR_NAME` syntax).
    EnvVarEmpty(String),
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingJwtSecret => {
                write!(
                    f,
                    "JWT secret is required when production_mode is true. Set VERITRACE__AUTH__JWT_SECRET or jwt_secret in config."
                )
            }
            Self::InsecureJwtSecret => {
                write!(
                    f,
                    "JWT secret cannot be the placeholder value in production. Please configure a secure secret."
                )
            }
            Self::JwtSecretTooShort => {
                write!(
                    f,
                    "JWT secret must be at least 32 characters long for security."
                )
            }
            Self::InvalidTokenTtl => {
                write!(f, "token_ttl_hours must be a positive number of hours.")
            }
            Self::EnvVarNotFound(var) => {
                write!(
                    f,
                    "Environment variable '{}' not found (referenced via env:{} in config).",
                    var, var
                )
            }
            Self::EnvVarEmpty(var) => {
                write!(
                    f,
                    "Environment variable '{}' is empty (referenced via env:{} in config).",
                    var, var
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

#[cfg(test)]
#[allow(clippy::field_reassign_with_default)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_default() {
        let config = AuthConfig::default();
        assert!(!config.production_mode);
        // No default JWT secret for security
        assert!(config.jwt_secret.is_none());
        assert_eq!(config.token_ttl_hours, 168);
    }

    #[test]
    fn test_config_validation_local_mode() {
        let config = AuthConfig::default();
        // Local mode should be valid without JWT secret
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_production_mode_no_secret() {
        let mut config = AuthConfig::default();
        config.production_mode = true;
        config.jwt_secret = None;

        assert_eq!(
            config.validate().unwrap_err(),
            ConfigValidationError::MissingJwtSecret
        );
    }

    #[test]
    fn test_config_validation_production_mode_insecure_secret() {
        let mut config = AuthConfig::default();
        config.production_mode = true;
        config.jwt_secret = Some("change-me-before-deploying".to_string());

        assert_eq!(
            config.validate().unwrap_err(),
            ConfigValidationError::InsecureJwtSecret
        );
    }

    #[test]
    fn test_config_validation_production_mode_short_secret() {
        let mut config = AuthConfig::default();
        config.production_mode = true;
        config.jwt_secret = Some("tooshort".to_string());

        assert_eq!(
            config.validate().unwrap_err(),
            ConfigValidationError::JwtSecretTooShort
        );
    }

    #[test]
    fn test_config_validation_production_mode_valid() {
        let mut config = AuthConfig::default();
        config.production_mode = true;
        config.jwt_secret =
            Some("a-very-long-and-secure-jwt-secret-that-is-at-least-32-chars".to_string());

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_ttl() {
        let mut config = AuthConfig::default();
        config.token_ttl_hours = 0;

        assert_eq!(
            config.validate().unwrap_err(),
            ConfigValidationError::InvalidTokenTtl
        );
    }

    #[test]
    fn test_generate_jwt_secret_length_and_charset() {
        let secret = AuthConfig::generate_jwt_secret();
        assert_eq!(secret.len(), 64, "Secret should be 64 characters long");
        // Should be alphanumeric
        assert!(
            secret.chars().all(|c| c.is_ascii_alphanumeric()),
            "Secret should only contain alphanumeric characters"
        );
    }

    #[test]
    fn test_generate_jwt_secret_uniqueness() {
        // Generate multiple secrets and ensure they're all different
        let secrets: Vec<String> = (0..100)
            .map(|_| AuthConfig::generate_jwt_secret())
            .collect();

        // Check that all secrets are unique
        let mut unique_secrets = secrets.clone();
        unique_secrets.sort();
        unique_secrets.dedup();
        assert_eq!(
            unique_secrets.len(),
            secrets.len(),
            "All generated secrets should be unique"
        );
    }

    #[test]
    fn test_generate_jwt_secret_passes_validation() {
        let mut config = AuthConfig::default();
        config.production_mode = true;
        config.jwt_secret = Some(AuthConfig::generate_jwt_secret());
        assert!(
            config.validate().is_ok(),
            "Generated secret should pass validation"
        );
    }

    #[test]
    fn test_resolve_jwt_secret_literal() {
        let mut config = AuthConfig::default();
        config.jwt_secret = Some("my-literal-secret".to_string());

        let resolved = config.resolve_jwt_secret().unwrap();
        assert_eq!(resolved, Some("my-literal-secret".to_string()));
    }

    #[test]
    fn test_resolve_jwt_secret_env_var() {
        // SAFETY: This is a test-only environment variable with a unique name
        unsafe {
            std::env::set_var(
                "TEST_VTR_JWT_SECRET_12345",
                "secret-from-env-var-at-least-32-chars",
            );
        }

        let mut config = AuthConfig::default();
        config.jwt_secret = Some("env:TEST_VTR_JWT_SECRET_12345".to_string());

        let resolved = config.resolve_jwt_secret().unwrap();
        assert_eq!(
            resolved,
            Some("secret-from-env-var-at-least-32-chars".to_string())
        );

        // SAFETY: Cleaning up test environment variable
        unsafe {
            std::env::remove_var("TEST_VTR_JWT_SECRET_12345");
        }
    }

    #[test]
    fn test_resolve_jwt_secret_env_var_not_found() {
        let mut config = AuthConfig::default();
        config.jwt_secret = Some("env:NONEXISTENT_VTR_VAR_12345".to_string());

        let result = config.resolve_jwt_secret();
        assert_eq!(
            result.unwrap_err(),
            ConfigValidationError::EnvVarNotFound("NONEXISTENT_VTR_VAR_12345".to_string())
        );
    }

    #[test]
    fn test_resolve_jwt_secret_none() {
        let config = AuthConfig::default();
        let resolved = config.resolve_jwt_secret().unwrap();
        assert_eq!(resolved, None);
    }
}
