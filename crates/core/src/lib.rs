//! Shared types for autoreload
//!
//! This crate provides:
//! - Change events and the `fileChange` wire message
//! - The thread-safe change queue shared by watcher and server
//! - Startup configuration and its validation

pub mod config;
pub mod error;
pub mod event;
pub mod queue;

// Re-exports
pub use config::{Config, WatchedPath};
pub use error::{Error, Result};
pub use event::{ChangeEvent, ChangeKind, Notification};
pub use queue::ChangeQueue;
