//! WebSocket notification server for autoreload
//!
//! Clients pull change notifications: every data frame a client sends takes
//! one event off the shared queue and answers it with a `fileChange`
//! message. Events are consumed competitively, never broadcast.

pub mod connection;
pub mod server;

pub use server::NotificationServer;
