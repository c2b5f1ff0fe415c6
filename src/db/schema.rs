//! Database schema and migrations for Mailroom.
//!
//! Migrations are applied in order when the database is first opened or
//! upgraded. The `schema_version` table tracks which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,           -- trimmed, lower-cased
    password    TEXT NOT NULL,           -- Argon2 hash
    avatar      TEXT,
    role        TEXT NOT NULL DEFAULT 'user',  -- 'user', 'admin'
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE UNIQUE INDEX idx_users_email ON users(email);
"#,
    // v2: emails
    r#"
CREATE TABLE emails (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    sender      TEXT NOT NULL,           -- trimmed, lower-cased
    recipient   TEXT NOT NULL,           -- trimmed, lower-cased
    subject     TEXT NOT NULL,
    body        TEXT NOT NULL,
    labels      TEXT NOT NULL DEFAULT '[]',  -- JSON array of strings
    attachment  TEXT,
    is_read     INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX idx_emails_recipient_created ON emails(recipient, created_at);
CREATE INDEX idx_emails_sender_created ON emails(sender, created_at);
"#,
];
