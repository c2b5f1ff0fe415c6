//! Email repository for Mailroom.

use super::types::{Email, NewEmail, SNOOZED_LABEL};
use crate::datetime::now_timestamp;
use crate::db::DbPool;
use crate::{MailroomError, Result};

const EMAIL_COLUMNS: &str =
    "id, sender, recipient, subject, body, labels, attachment, is_read, created_at, updated_at";

const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

/// Repository for email CRUD operations.
pub struct EmailRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> EmailRepository<'a> {
    /// Create a new EmailRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new email. `is_read` starts false.
    pub async fn create(&self, email: &NewEmail) -> Result<Email> {
        let now = now_timestamp();

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO emails (sender, recipient, subject, body, labels, attachment, is_read, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?) RETURNING id",
        )
        .bind(&email.from)
        .bind(&email.to)
        .bind(&email.subject)
        .bind(&email.body)
        .bind(email.labels.to_json())
        .bind(&email.attachment)
        .bind(&now)
        .bind(&now)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| MailroomError::NotFound("email".to_string()))
    }

    /// Get an email by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Email>> {
        let email = sqlx::query_as::<_, Email>(&format!(
            "SELECT {EMAIL_COLUMNS} FROM emails WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(email)
    }

    /// List emails received by an address, newest first.
    pub async fn list_inbox(&self, address: &str) -> Result<Vec<Email>> {
        let emails = sqlx::query_as::<_, Email>(&format!(
            "SELECT {EMAIL_COLUMNS} FROM emails WHERE recipient = ? {NEWEST_FIRST}"
        ))
        .bind(address)
        .fetch_all(self.pool)
        .await?;
        Ok(emails)
    }

    /// List emails sent from an address, newest first.
    pub async fn list_sent(&self, address: &str) -> Result<Vec<Email>> {
        let emails = sqlx::query_as::<_, Email>(&format!(
            "SELECT {EMAIL_COLUMNS} FROM emails WHERE sender = ? {NEWEST_FIRST}"
        ))
        .bind(address)
        .fetch_all(self.pool)
        .await?;
        Ok(emails)
    }

    /// List received emails carrying the snoozed label, newest first.
    pub async fn list_snoozed(&self, address: &str) -> Result<Vec<Email>> {
        let emails = sqlx::query_as::<_, Email>(&format!(
            "SELECT {EMAIL_COLUMNS} FROM emails
             WHERE recipient = ?
               AND EXISTS (SELECT 1 FROM json_each(emails.labels) WHERE json_each.value = ?)
             {NEWEST_FIRST}"
        ))
        .bind(address)
        .bind(SNOOZED_LABEL)
        .fetch_all(self.pool)
        .await?;
        Ok(emails)
    }

    /// Mark an email as read.
    ///
    /// Returns false if no email has this ID. Marking an already-read email
    /// succeeds and bumps `updated_at`.
    pub async fn mark_read(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE emails SET is_read = 1, updated_at = ? WHERE id = ?")
            .bind(now_timestamp())
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an email. Returns true if a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM emails WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all emails.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM emails")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
