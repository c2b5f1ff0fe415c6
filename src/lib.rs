//! Mailroom - a small webmail backend.
//!
//! Users register and log in, send emails with labels and an optional
//! attachment, browse inbox/sent/snoozed views, and receive new emails in
//! real time over a WebSocket.

pub mod auth;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod mail;
pub mod notify;
pub mod web;

pub use auth::{
    hash_password, validate_password, verify_password, CredentialStore, PasswordError,
    ProfilePatch, SessionIssuer, ValidationError,
};
pub use config::Config;
pub use db::{Database, NewUser, PublicUser, Role, User, UserRepository, UserUpdate};
pub use error::{MailroomError, Result};
pub use file::UploadStorage;
pub use mail::{Email, EmailRepository, Labels, MailService, NewEmail, SendEmailRequest};
pub use notify::{MailEvent, NotificationHub};
pub use web::{AppState, WebServer};
