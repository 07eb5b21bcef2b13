//! autoreload command-line front end
//!
//! Argument parsing, logging setup and the daemon lifecycle that ties the
//! watcher to the notification server.

pub mod args;
pub mod client;
pub mod daemon;
pub mod logging;

pub use args::Args;
pub use daemon::Daemon;
