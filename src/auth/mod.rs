//! Authentication module for Mailroom.
//!
//! This module provides password hashing, input validation, session tokens
//! and the account operations built on them.

mod credentials;
mod password;
mod session;
pub mod validation;

pub use credentials::{CredentialStore, ProfilePatch};
pub use password::{hash_password, validate_password, verify_password, PasswordError};
pub use session::{SessionClaims, SessionIssuer, DEFAULT_TOKEN_EXPIRY_DAYS};
pub use validation::ValidationError;
