//! Response DTOs for the HTTP API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::db::PublicUser;
use crate::mail::Email;

/// Registration response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    /// Status message.
    pub msg: String,
    /// Session token.
    pub token: String,
    pub user: PublicUser,
}

/// Login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Session token.
    pub token: String,
    pub user: PublicUser,
}

/// Profile update response.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateProfileResponse {
    /// Status message.
    pub msg: String,
    pub user: PublicUser,
}

/// Send email response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SendEmailResponse {
    /// Status message.
    pub message: String,
    pub email: Email,
}

/// Plain status message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
