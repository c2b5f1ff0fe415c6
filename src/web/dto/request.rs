//! Request DTOs for the HTTP API.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// User registration request.
///
/// Missing fields deserialize as empty strings so they are reported as
/// validation errors rather than JSON errors.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Display name.
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "name is required"))]
    pub name: String,
    /// Email address.
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "email is required"))]
    pub email: String,
    /// Password (at least 6 characters).
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address.
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "email is required"))]
    pub email: String,
    /// Password.
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}
