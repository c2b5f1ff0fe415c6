//! Account operations: registration, login and profile update.

use super::password::{validate_password, verify_password, PasswordError};
use super::session::SessionIssuer;
use super::validation::{normalize_email, validate_email, validate_name};
use crate::db::{DbPool, NewUser, PublicUser, UserRepository, UserUpdate};
use crate::{MailroomError, Result};

/// Patch applied by [`CredentialStore::update_profile`].
///
/// Empty strings are treated the same as absent fields.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn require<'v>(value: &'v str, field: &str) -> Result<&'v str> {
    if value.trim().is_empty() {
        Err(MailroomError::Validation(format!("{field} is required")))
    } else {
        Ok(value)
    }
}

fn password_error(e: PasswordError) -> MailroomError {
    MailroomError::Validation(e.to_string())
}

/// User accounts backed by the `users` table.
pub struct CredentialStore<'a> {
    pool: &'a DbPool,
    accepted_domains: &'a [String],
}

impl<'a> CredentialStore<'a> {
    /// Create a store. An empty `accepted_domains` accepts any domain.
    pub fn new(pool: &'a DbPool, accepted_domains: &'a [String]) -> Self {
        Self {
            pool,
            accepted_domains,
        }
    }

    /// Register a new account.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<PublicUser> {
        let name = require(name, "name")?.trim();
        let email = normalize_email(require(email, "email")?);
        require(password, "password")?;

        validate_name(name).map_err(|e| MailroomError::Validation(e.to_string()))?;
        validate_email(&email, self.accepted_domains)
            .map_err(|e| MailroomError::Validation(e.to_string()))?;
        validate_password(password).map_err(password_error)?;

        let repo = UserRepository::new(self.pool);
        if repo.email_exists(&email).await? {
            return Err(MailroomError::Conflict("email already registered".to_string()));
        }

        // A concurrent insert still trips the unique index and maps to Conflict.
        let user = repo.create(&NewUser::new(name, email, password)).await?;
        tracing::info!(user_id = user.id, "User registered");
        Ok(user.to_public())
    }

    /// Check credentials and issue a session token.
    pub async fn login(
        &self,
        sessions: &SessionIssuer,
        email: &str,
        password: &str,
    ) -> Result<(PublicUser, String)> {
        let email = normalize_email(require(email, "email")?);
        require(password, "password")?;

        let user = UserRepository::new(self.pool)
            .get_by_email(&email)
            .await?
            .ok_or_else(|| MailroomError::NotFound("user".to_string()))?;

        verify_password(password, &user.password).map_err(|e| {
            tracing::debug!(user_id = user.id, "Login failed: {}", e);
            MailroomError::Auth("invalid credentials".to_string())
        })?;

        let token = sessions.issue(user.id)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok((user.to_public(), token))
    }

    /// Apply a partial profile update.
    pub async fn update_profile(&self, id: i64, patch: &ProfilePatch) -> Result<PublicUser> {
        let mut update = UserUpdate::new();

        if let Some(name) = non_empty(patch.name.as_deref()) {
            let name = name.trim();
            validate_name(name).map_err(|e| MailroomError::Validation(e.to_string()))?;
            update = update.name(name);
        }
        if let Some(email) = non_empty(patch.email.as_deref()) {
            let email = normalize_email(email);
            validate_email(&email, self.accepted_domains)
                .map_err(|e| MailroomError::Validation(e.to_string()))?;
            update = update.email(email);
        }
        if let Some(password) = non_empty(patch.password.as_deref()) {
            validate_password(password).map_err(password_error)?;
            update = update.password(password);
        }
        if let Some(avatar) = non_empty(patch.avatar.as_deref()) {
            update = update.avatar(avatar);
        }

        let repo = UserRepository::new(self.pool);
        if let Some(ref email) = update.email {
            if let Some(existing) = repo.get_by_email(email).await? {
                if existing.id != id {
                    return Err(MailroomError::Conflict("email already registered".to_string()));
                }
            }
        }

        let user = repo
            .update(id, &update)
            .await?
            .ok_or_else(|| MailroomError::NotFound("user".to_string()))?;
        tracing::info!(user_id = user.id, "Profile updated");
        Ok(user.to_public())
    }
}
