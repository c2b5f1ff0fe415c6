//! HTTP API for Mailroom.
//!
//! REST endpoints for accounts and emails, static serving of uploads, and a
//! WebSocket stream of newly sent emails.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;
pub mod ws;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
