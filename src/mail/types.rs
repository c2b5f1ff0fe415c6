//! Email types for Mailroom.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{MailroomError, Result};

/// Label that places an email in the snoozed view.
pub const SNOOZED_LABEL: &str = "Snoozed";

/// Maximum length for an email subject.
pub const MAX_SUBJECT_LENGTH: usize = 255;

/// Free-form tag set attached to an email.
///
/// Stored as a JSON array. Duplicates are dropped on construction and the
/// first-seen order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(Vec<String>);

impl Labels {
    /// Build a label set, dropping duplicates.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if !out.contains(&label) {
                out.push(label);
            }
        }
        Self(out)
    }

    /// Parse a label set from client input.
    ///
    /// The input must be a JSON array of strings.
    ///
    /// ```
    /// use mailroom::mail::Labels;
    ///
    /// let labels = Labels::parse(r#"["Work","Snoozed","Work"]"#).unwrap();
    /// assert_eq!(labels.as_slice(), ["Work", "Snoozed"]);
    /// assert!(Labels::parse("Work").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str::<Vec<String>>(raw)
            .map(Self::new)
            .map_err(|_| MailroomError::Validation("labels must be a JSON array of strings".to_string()))
    }

    /// Check whether the set contains a label (exact, case-sensitive).
    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    /// Check whether the email is snoozed.
    pub fn is_snoozed(&self) -> bool {
        self.contains(SNOOZED_LABEL)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON form used for storage.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }
}

impl TryFrom<String> for Labels {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        serde_json::from_str::<Vec<String>>(&s)
            .map(Self::new)
            .map_err(|e| format!("invalid labels column: {e}"))
    }
}

/// A stored email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    /// Email ID.
    pub id: i64,
    /// Sender address (normalized).
    #[sqlx(rename = "sender")]
    pub from: String,
    /// Recipient address (normalized).
    #[sqlx(rename = "recipient")]
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// Labels.
    #[sqlx(try_from = "String")]
    #[schema(value_type = Vec<String>)]
    pub labels: Labels,
    /// Stored attachment path, e.g. `/uploads/1700000000000-42-report.pdf`.
    pub attachment: Option<String>,
    /// Whether the recipient has read the email.
    pub is_read: bool,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last modification timestamp (RFC 3339).
    pub updated_at: String,
}

/// New email for creation.
///
/// Addresses must already be normalized.
#[derive(Debug, Clone)]
pub struct NewEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub labels: Labels,
    pub attachment: Option<String>,
}

impl NewEmail {
    /// Create a new email without labels or attachment.
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
            labels: Labels::default(),
            attachment: None,
        }
    }

    /// Set labels.
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Set the attachment path.
    pub fn with_attachment(mut self, attachment: impl Into<String>) -> Self {
        self.attachment = Some(attachment.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_dedup_keeps_order() {
        let labels = Labels::new(["b", "a", "b", "c", "a"]);
        assert_eq!(labels.as_slice(), ["b", "a", "c"]);
    }

    #[test]
    fn test_labels_parse_rejects_non_array() {
        assert!(Labels::parse("[]").unwrap().is_empty());
        assert!(matches!(
            Labels::parse(r#"{"a":1}"#),
            Err(MailroomError::Validation(_))
        ));
        assert!(Labels::parse("[1, 2]").is_err());
        assert!(Labels::parse("").is_err());
    }

    #[test]
    fn test_snoozed_is_case_sensitive() {
        assert!(Labels::new(["Snoozed"]).is_snoozed());
        assert!(!Labels::new(["snoozed"]).is_snoozed());
        assert!(!Labels::new(["Snoozed later"]).is_snoozed());
    }

    #[test]
    fn test_labels_column_conversion() {
        let labels = Labels::try_from(r#"["Work"]"#.to_string()).unwrap();
        assert_eq!(labels.to_json(), r#"["Work"]"#);
        assert!(Labels::try_from("oops".to_string()).is_err());
    }

    #[test]
    fn test_email_serializes_camel_case() {
        let email = Email {
            id: 7,
            from: "a@x.com".to_string(),
            to: "b@x.com".to_string(),
            subject: "Hi".to_string(),
            body: "Hello".to_string(),
            labels: Labels::new(["Snoozed"]),
            attachment: None,
            is_read: false,
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000000Z".to_string(),
        };

        let json = serde_json::to_value(&email).unwrap();
        assert_eq!(json["from"], "a@x.com");
        assert_eq!(json["to"], "b@x.com");
        assert_eq!(json["isRead"], false);
        assert_eq!(json["labels"], serde_json::json!(["Snoozed"]));
        assert!(json["attachment"].is_null());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("is_read").is_none());
    }

    #[test]
    fn test_new_email_builder() {
        let email = NewEmail::new("a@x.com", "b@x.com", "Hi", "Hello")
            .with_labels(Labels::new(["Work"]))
            .with_attachment("/uploads/1-2-a.txt");
        assert!(email.labels.contains("Work"));
        assert_eq!(email.attachment.as_deref(), Some("/uploads/1-2-a.txt"));
    }
}
