//! User repository for Mailroom.
//!
//! The repository owns password hashing: `create` and `update` receive raw
//! passwords and hash them exactly once before writing.

use sqlx::QueryBuilder;

use super::user::{NewUser, User, UserUpdate};
use super::DbPool;
use crate::auth::hash_password;
use crate::datetime::now_timestamp;
use crate::error::is_unique_violation;
use crate::{MailroomError, Result};

const USER_COLUMNS: &str = "id, name, email, password, avatar, role, created_at, updated_at";

/// Repository for user CRUD operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

fn hash_for_storage(password: &str) -> Result<String> {
    hash_password(password).map_err(|e| match e {
        crate::auth::PasswordError::TooShort | crate::auth::PasswordError::TooLong => {
            MailroomError::Validation(e.to_string())
        }
        other => MailroomError::Database(other.to_string()),
    })
}

fn map_write_error(e: sqlx::Error) -> MailroomError {
    if is_unique_violation(&e) {
        MailroomError::Conflict("email already registered".to_string())
    } else {
        MailroomError::Database(e.to_string())
    }
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user.
    ///
    /// `new_user.email` must already be normalized. The password is hashed
    /// here. A duplicate email yields [`MailroomError::Conflict`].
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let password_hash = hash_for_storage(&new_user.password)?;
        let now = now_timestamp();

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (name, email, password, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(new_user.role.as_str())
        .bind(&now)
        .bind(&now)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| MailroomError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// Get a user by normalized email.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// Check if a normalized email is already registered.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
            .bind(email)
            .fetch_one(self.pool)
            .await?;
        Ok(exists)
    }

    /// Update a user by ID.
    ///
    /// Only fields set in the update are modified; `updated_at` is always
    /// bumped. Returns the updated user, or None if not found.
    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let password_hash = match update.password {
            Some(ref password) => Some(hash_for_storage(password)?),
            None => None,
        };

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE users SET ");
        let mut separated = query.separated(", ");

        if let Some(ref name) = update.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(ref email) = update.email {
            separated.push("email = ");
            separated.push_bind_unseparated(email);
        }
        if let Some(ref hash) = password_hash {
            separated.push("password = ");
            separated.push_bind_unseparated(hash);
        }
        if let Some(ref avatar) = update.avatar {
            separated.push("avatar = ");
            separated.push_bind_unseparated(avatar);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(now_timestamp());

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
