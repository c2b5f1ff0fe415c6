//! Mail module for Mailroom.
//!
//! This module provides the email store:
//! - Sending with optional labels and attachment
//! - Inbox, sent and snoozed views (newest first)
//! - Read status tracking and deletion

mod repository;
mod service;
mod types;

pub use repository::EmailRepository;
pub use service::{MailService, SendEmailRequest};
pub use types::{Email, Labels, NewEmail, MAX_SUBJECT_LENGTH, SNOOZED_LABEL};
