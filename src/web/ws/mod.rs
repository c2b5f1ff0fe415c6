//! WebSocket module for real-time mail events.

pub mod events;

pub use events::events_ws_handler;
