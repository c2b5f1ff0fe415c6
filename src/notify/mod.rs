//! Real-time notifications for Mailroom.
//!
//! Newly sent emails are fanned out to WebSocket listeners through a
//! [`NotificationHub`] held in application state.

mod hub;

pub use hub::{MailEvent, NotificationHub, DEFAULT_CHANNEL_CAPACITY};
