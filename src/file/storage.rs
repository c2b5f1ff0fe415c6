//! Upload storage for Mailroom.
//!
//! Uploads are written flat into one directory under a collision-resistant
//! name and referenced as `/uploads/{stored_name}`, which is also the URL
//! the static file route serves them from.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::{MailroomError, Result};

/// URL prefix of stored uploads.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Fallback name for uploads whose original name sanitizes to nothing.
const FALLBACK_NAME: &str = "file";

/// How the stored name is derived from the original name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// `{millis}-{random}-{sanitized original name}`
    Attachment,
    /// `{millis}-{random}{.ext}`
    Avatar,
}

/// Flat upload directory with a size cap.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    base_path: PathBuf,
    max_bytes: usize,
}

impl UploadStorage {
    /// Create a storage rooted at `base_path`, creating the directory.
    pub fn new(base_path: impl Into<PathBuf>, max_bytes: usize) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self {
            base_path,
            max_bytes,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Largest accepted upload in bytes.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Save an upload and return its reference path (`/uploads/{name}`).
    ///
    /// # Errors
    ///
    /// Returns a validation error when the content exceeds the size cap.
    pub fn save(&self, content: &[u8], original_name: &str, kind: UploadKind) -> Result<String> {
        if content.len() > self.max_bytes {
            return Err(MailroomError::Validation(format!(
                "upload exceeds the maximum size of {} bytes",
                self.max_bytes
            )));
        }

        let stored_name = Self::generate_stored_name(original_name, kind);
        fs::write(self.base_path.join(&stored_name), content)?;
        tracing::debug!(stored_name = %stored_name, size = content.len(), "Upload stored");

        Ok(format!("{UPLOADS_URL_PREFIX}/{stored_name}"))
    }

    /// Save an email attachment.
    pub fn save_attachment(&self, content: &[u8], original_name: &str) -> Result<String> {
        self.save(content, original_name, UploadKind::Attachment)
    }

    /// Save a profile avatar.
    pub fn save_avatar(&self, content: &[u8], original_name: &str) -> Result<String> {
        self.save(content, original_name, UploadKind::Avatar)
    }

    /// Delete a stored upload by its reference path.
    ///
    /// Returns `true` if the file was deleted, `false` if it didn't exist or
    /// the path does not point into this storage.
    pub fn delete(&self, reference: &str) -> Result<bool> {
        let Some(file_path) = self.resolve(reference) else {
            return Ok(false);
        };

        match fs::remove_file(&file_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Map a reference path to a file inside the storage directory.
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let name = reference
            .strip_prefix(UPLOADS_URL_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(reference);

        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return None;
        }
        Some(self.base_path.join(name))
    }

    /// Generate a stored name for an upload.
    pub fn generate_stored_name(original_name: &str, kind: UploadKind) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let random: u32 = rand::rng().random_range(0..1_000_000_000);
        let sanitized = sanitize_file_name(original_name);

        match kind {
            UploadKind::Attachment => format!("{millis}-{random}-{sanitized}"),
            UploadKind::Avatar => match extension(&sanitized) {
                Some(ext) => format!("{millis}-{random}.{ext}"),
                None => format!("{millis}-{random}"),
            },
        }
    }
}

/// Reduce a client-supplied file name to a safe final component.
///
/// ```
/// use mailroom::file::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
/// assert_eq!(sanitize_file_name("C:\\docs\\report.pdf"), "report.pdf");
/// ```
pub fn sanitize_file_name(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .filter(|c| !c.is_control() && *c != ':')
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.');

    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Extension of a sanitized name, limited to ASCII alphanumerics.
fn extension(name: &str) -> Option<&str> {
    Path::new(name)
        .extension()
        .and_then(|s| s.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}
