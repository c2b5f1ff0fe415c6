//! Input validation for Mailroom accounts.
//!
//! Email addresses are normalized (trimmed, lower-cased) before they are
//! validated, stored or looked up.

use thiserror::Error;
use validator::ValidateEmail;

/// Maximum name length.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty.
    #[error("name cannot be empty")]
    NameEmpty,

    /// Name is too long.
    #[error("name must be at most {MAX_NAME_LENGTH} characters")]
    NameTooLong,

    /// Email is empty.
    #[error("email cannot be empty")]
    EmailEmpty,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("invalid email format")]
    EmailInvalidFormat,

    /// Email domain is not accepted by this deployment.
    #[error("email domain is not accepted")]
    EmailDomainNotAccepted,
}

/// Normalize an email address: trim surrounding whitespace and lower-case.
///
/// ```
/// use mailroom::auth::validation::normalize_email;
///
/// assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
/// ```
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate a display name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameEmpty);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}

/// Validate an already-normalized email address.
///
/// When `accepted_domains` is non-empty the domain part must equal one of
/// them (compared case-insensitively).
pub fn validate_email(email: &str, accepted_domains: &[String]) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailEmpty);
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    if !email.validate_email() {
        return Err(ValidationError::EmailInvalidFormat);
    }

    if !accepted_domains.is_empty() {
        let domain = email
            .rsplit_once('@')
            .map(|(_, d)| d)
            .ok_or(ValidationError::EmailInvalidFormat)?;
        let accepted = accepted_domains
            .iter()
            .any(|d| d.trim().trim_start_matches('@').eq_ignore_ascii_case(domain));
        if !accepted {
            return Err(ValidationError::EmailDomainNotAccepted);
        }
    }

    Ok(())
}
