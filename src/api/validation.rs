//! Request validation producing field-level violation details.
//!
//! Each validator checks every field and collects one violation per bad
//! field, in the order the fields appear in the request body, so a
//! client sees all problems at once.

use chrono::NaiveDate;

use crate::medication::CreateMedicationRequest;
use crate::user::{CreateUserRequest, is_valid_email};

use super::error::{ApiError, FieldViolation};

/// Validate login input.
pub fn validate_login(email: &str, password: &str) -> Result<(), ApiError> {
    let mut violations = Vec::new();

    if email.trim().is_empty() {
        violations.push(FieldViolation::new("email", "Email is required"));
    } else if !is_valid_email(email) {
        violations.push(FieldViolation::new("email", "Invalid email format"));
    }

    if password.is_empty() {
        violations.push(FieldViolation::new("password", "Password is required"));
    }

    finish(violations)
}

/// Validate a manual medication registration.
pub fn validate_new_medication(request: &CreateMedicationRequest) -> Result<(), ApiError> {
    let mut violations = Vec::new();

    if request.name.trim().is_empty() {
        violations.push(FieldViolation::new("name", "Name is required"));
    }

    if let Some(date) = &request.expiration_date
        && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err()
    {
        violations.push(FieldViolation::new(
            "expiration_date",
            "Expiration date must be formatted as YYYY-MM-DD",
        ));
    }

    finish(violations)
}

/// Validate an admin user-creation request.
pub fn validate_new_user(request: &CreateUserRequest) -> Result<(), ApiError> {
    let mut violations = Vec::new();

    if request.email.trim().is_empty() {
        violations.push(FieldViolation::new("email", "Email is required"));
    } else if !is_valid_email(&request.email) {
        violations.push(FieldViolation::new("email", "Invalid email format"));
    }

    if request.name.trim().is_empty() {
        violations.push(FieldViolation::new("name", "Name is required"));
    }

    if request.password.len() < 6 {
        violations.push(FieldViolation::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }

    finish(violations)
}

fn finish(violations: Vec<FieldViolation>) -> Result<(), ApiError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(violations))
    }
}
