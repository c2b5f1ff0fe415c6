//! Upload handling for Mailroom.
//!
//! One binary upload per request (email attachment or profile avatar) is
//! written to the uploads directory and referenced by path.

mod storage;

pub use storage::{sanitize_file_name, UploadKind, UploadStorage, UPLOADS_URL_PREFIX};
