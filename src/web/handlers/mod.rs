//! API handlers for the Mailroom HTTP API.

pub mod auth;
pub mod email;

pub use auth::*;
pub use email::*;

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::auth::SessionIssuer;
use crate::config::Config;
use crate::file::UploadStorage;
use crate::notify::NotificationHub;
use crate::{Database, Result};

use super::error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Session token issuer.
    pub sessions: SessionIssuer,
    /// Domains accepted at registration (empty = any).
    pub accepted_domains: Vec<String>,
    /// Upload directory.
    pub storage: UploadStorage,
    /// Real-time event hub.
    pub hub: NotificationHub,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: Database,
        sessions: SessionIssuer,
        storage: UploadStorage,
        hub: NotificationHub,
    ) -> Self {
        Self {
            db,
            sessions,
            accepted_domains: Vec::new(),
            storage,
            hub,
        }
    }

    /// Build state from configuration, creating the uploads directory.
    pub fn from_config(config: &Config, db: Database) -> Result<Self> {
        let sessions = SessionIssuer::new(&config.web.jwt_secret, config.web.jwt_expiry_days);
        let storage = UploadStorage::new(&config.files.storage_path, config.files.max_upload_bytes())?;
        let hub = NotificationHub::new(config.notify.channel_capacity);

        Ok(Self::new(db, sessions, storage, hub)
            .with_accepted_domains(config.registration.accepted_domains.clone()))
    }

    /// Restrict registration to the given email domains.
    pub fn with_accepted_domains(mut self, domains: Vec<String>) -> Self {
        self.accepted_domains = domains;
        self
    }
}

/// An uploaded file part.
pub struct UploadedFile {
    /// Client-supplied file name.
    pub file_name: String,
    /// File content.
    pub content: Vec<u8>,
}

/// Text fields and at most one file from a multipart form.
#[derive(Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    /// The file part, if one was sent.
    pub file: Option<UploadedFile>,
}

impl FormData {
    /// Read every part of a multipart body.
    ///
    /// The part named `file_field` is kept as bytes; all other parts are
    /// read as text. An empty file part counts as no file.
    pub async fn read(mut multipart: Multipart, file_field: &str) -> std::result::Result<Self, ApiError> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(ApiError::from_multipart)?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == file_field {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content = field.bytes().await.map_err(ApiError::from_multipart)?;
                if !content.is_empty() {
                    form.file = Some(UploadedFile {
                        file_name,
                        content: content.to_vec(),
                    });
                }
            } else if !name.is_empty() {
                let value = field.text().await.map_err(ApiError::from_multipart)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Take a text field out of the form.
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }
}

/// Parse an `:id` path segment. Non-numeric ids are unknown ids.
pub(crate) fn parse_id(raw: &str, resource: &str) -> std::result::Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::not_found(format!("{resource} not found")))
}
