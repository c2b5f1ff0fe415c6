//! Mail service for Mailroom.
//!
//! Validates send requests, shapes folder queries and announces new emails
//! on the notification hub.

use crate::auth::validation::normalize_email;
use crate::db::DbPool;
use crate::notify::{MailEvent, NotificationHub};
use crate::{MailroomError, Result};

use super::repository::EmailRepository;
use super::types::{Email, Labels, NewEmail, MAX_SUBJECT_LENGTH};

/// Request to send an email.
#[derive(Debug, Clone, Default)]
pub struct SendEmailRequest {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// Labels as raw client input (a JSON array of strings).
    pub labels: Option<String>,
    /// Stored attachment path.
    pub attachment: Option<String>,
}

impl SendEmailRequest {
    /// Create a new send request.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            labels: None,
            attachment: None,
        }
    }

    /// Set raw labels.
    pub fn labels(mut self, labels: impl Into<String>) -> Self {
        self.labels = Some(labels.into());
        self
    }

    /// Set the stored attachment path.
    pub fn attachment(mut self, attachment: impl Into<String>) -> Self {
        self.attachment = Some(attachment.into());
        self
    }
}

fn required(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MailroomError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Service for email operations.
pub struct MailService<'a> {
    pool: &'a DbPool,
    hub: &'a NotificationHub,
}

impl<'a> MailService<'a> {
    /// Create a new MailService.
    pub fn new(pool: &'a DbPool, hub: &'a NotificationHub) -> Self {
        Self { pool, hub }
    }

    /// Send an email.
    ///
    /// Stores the email unread and publishes an `emailReceived` event. The
    /// event is best effort and never affects the result.
    ///
    /// # Errors
    ///
    /// Returns a validation error if:
    /// - from, to, subject or body is blank
    /// - the subject is too long
    /// - labels are present but not a JSON array of strings
    pub async fn send(&self, request: &SendEmailRequest) -> Result<Email> {
        required(&request.from, "from")?;
        required(&request.to, "to")?;
        required(&request.subject, "subject")?;
        required(&request.body, "body")?;

        let subject = request.subject.trim();
        if subject.chars().count() > MAX_SUBJECT_LENGTH {
            return Err(MailroomError::Validation(format!(
                "subject must be at most {MAX_SUBJECT_LENGTH} characters"
            )));
        }

        let labels = match request.labels.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Labels::parse(raw)?,
            _ => Labels::default(),
        };

        let mut new_email = NewEmail::new(
            normalize_email(&request.from),
            normalize_email(&request.to),
            subject,
            request.body.as_str(),
        )
        .with_labels(labels);
        if let Some(ref attachment) = request.attachment {
            new_email = new_email.with_attachment(attachment.as_str());
        }

        let email = EmailRepository::new(self.pool).create(&new_email).await?;
        tracing::info!(email_id = email.id, to = %email.to, "Email sent");

        let listeners = self.hub.publish(MailEvent::EmailReceived(email.clone()));
        tracing::debug!(email_id = email.id, listeners, "emailReceived published");

        Ok(email)
    }

    /// Emails received by an address, newest first.
    pub async fn list_inbox(&self, address: &str) -> Result<Vec<Email>> {
        EmailRepository::new(self.pool)
            .list_inbox(&normalize_email(address))
            .await
    }

    /// Emails sent from an address, newest first.
    pub async fn list_sent(&self, address: &str) -> Result<Vec<Email>> {
        EmailRepository::new(self.pool)
            .list_sent(&normalize_email(address))
            .await
    }

    /// Received emails labelled `Snoozed`, newest first.
    pub async fn list_snoozed(&self, address: &str) -> Result<Vec<Email>> {
        EmailRepository::new(self.pool)
            .list_snoozed(&normalize_email(address))
            .await
    }

    /// Get an email by ID.
    pub async fn get(&self, id: i64) -> Result<Email> {
        EmailRepository::new(self.pool)
            .get_by_id(id)
            .await?
            .ok_or_else(|| MailroomError::NotFound("email".to_string()))
    }

    /// Mark an email as read and return it.
    pub async fn mark_read(&self, id: i64) -> Result<Email> {
        let repo = EmailRepository::new(self.pool);
        if !repo.mark_read(id).await? {
            return Err(MailroomError::NotFound("email".to_string()));
        }
        repo.get_by_id(id)
            .await?
            .ok_or_else(|| MailroomError::NotFound("email".to_string()))
    }

    /// Delete an email.
    ///
    /// Returns the removed email, or None if it did not exist. Deleting a
    /// missing email is not an error.
    pub async fn delete(&self, id: i64) -> Result<Option<Email>> {
        let repo = EmailRepository::new(self.pool);
        let Some(email) = repo.get_by_id(id).await? else {
            return Ok(None);
        };
        if !repo.delete(id).await? {
            return Ok(None);
        }
        tracing::info!(email_id = id, "Email deleted");
        Ok(Some(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup() -> (Database, NotificationHub) {
        (Database::open_in_memory().await.unwrap(), NotificationHub::new(16))
    }

    #[tokio::test]
    async fn test_send_and_inbox() {
        let (db, hub) = setup().await;
        let service = MailService::new(db.pool(), &hub);

        let email = service
            .send(&SendEmailRequest::new("a@x.com", "b@x.com", "Hi", "Hello"))
            .await
            .unwrap();
        assert!(!email.is_read);

        let inbox = service.list_inbox("b@x.com").await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].subject, "Hi");
        assert!(!inbox[0].is_read);

        assert!(service.list_sent("b@x.com").await.unwrap().is_empty());
        assert_eq!(service.list_sent("a@x.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_send_normalizes_addresses() {
        let (db, hub) = setup().await;
        let service = MailService::new(db.pool(), &hub);

        let email = service
            .send(&SendEmailRequest::new(" A@X.com", "B@x.COM ", "  Hi  ", "Hello"))
            .await
            .unwrap();
        assert_eq!(email.from, "a@x.com");
        assert_eq!(email.to, "b@x.com");
        assert_eq!(email.subject, "Hi");

        assert_eq!(service.list_inbox("B@X.COM").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_send_requires_fields() {
        let (db, hub) = setup().await;
        let service = MailService::new(db.pool(), &hub);

        for request in [
            SendEmailRequest::new("", "b@x.com", "Hi", "Hello"),
            SendEmailRequest::new("a@x.com", " ", "Hi", "Hello"),
            SendEmailRequest::new("a@x.com", "b@x.com", "", "Hello"),
            SendEmailRequest::new("a@x.com", "b@x.com", "Hi", ""),
        ] {
            let result = service.send(&request).await;
            assert!(matches!(result, Err(MailroomError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_send_labels() {
        let (db, hub) = setup().await;
        let service = MailService::new(db.pool(), &hub);

        let email = service
            .send(&SendEmailRequest::new("a@x.com", "b@x.com", "Hi", "x").labels(r#"["Snoozed","Snoozed"]"#))
            .await
            .unwrap();
        assert_eq!(email.labels.as_slice(), ["Snoozed"]);

        let result = service
            .send(&SendEmailRequest::new("a@x.com", "b@x.com", "Hi", "x").labels("Snoozed"))
            .await;
        assert!(matches!(result, Err(MailroomError::Validation(_))));

        let email = service
            .send(&SendEmailRequest::new("a@x.com", "b@x.com", "Hi", "x").labels(""))
            .await
            .unwrap();
        assert!(email.labels.is_empty());
    }

    #[tokio::test]
    async fn test_send_publishes_event() {
        let (db, hub) = setup().await;
        let mut rx = hub.subscribe();
        let service = MailService::new(db.pool(), &hub);

        let email = service
            .send(&SendEmailRequest::new("a@x.com", "b@x.com", "Hi", "Hello"))
            .await
            .unwrap();

        let MailEvent::EmailReceived(event_email) = rx.recv().await.unwrap();
        assert_eq!(event_email, email);
    }

    #[tokio::test]
    async fn test_snoozed_view() {
        let (db, hub) = setup().await;
        let service = MailService::new(db.pool(), &hub);

        service
            .send(&SendEmailRequest::new("a@x.com", "b@x.com", "later", "x").labels(r#"["Snoozed"]"#))
            .await
            .unwrap();
        service
            .send(&SendEmailRequest::new("a@x.com", "b@x.com", "now", "x"))
            .await
            .unwrap();

        let snoozed = service.list_snoozed("b@x.com").await.unwrap();
        assert_eq!(snoozed.len(), 1);
        assert_eq!(snoozed[0].subject, "later");
    }

    #[tokio::test]
    async fn test_mark_read_and_get() {
        let (db, hub) = setup().await;
        let service = MailService::new(db.pool(), &hub);

        let email = service
            .send(&SendEmailRequest::new("a@x.com", "b@x.com", "Hi", "x"))
            .await
            .unwrap();

        let first = service.mark_read(email.id).await.unwrap();
        assert!(first.is_read);
        let second = service.mark_read(email.id).await.unwrap();
        assert!(second.is_read);
        assert!(service.get(email.id).await.unwrap().is_read);

        assert!(matches!(
            service.mark_read(999).await,
            Err(MailroomError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let (db, hub) = setup().await;
        let service = MailService::new(db.pool(), &hub);

        let email = service
            .send(&SendEmailRequest::new("a@x.com", "b@x.com", "Hi", "x").attachment("/uploads/f.txt"))
            .await
            .unwrap();

        let removed = service.delete(email.id).await.unwrap().unwrap();
        assert_eq!(removed.attachment.as_deref(), Some("/uploads/f.txt"));
        assert!(matches!(
            service.get(email.id).await,
            Err(MailroomError::NotFound(_))
        ));
        assert!(service.delete(email.id).await.unwrap().is_none());
    }
}
