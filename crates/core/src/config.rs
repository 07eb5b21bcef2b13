//! Startup configuration
//!
//! Built once by the CLI and immutable for the lifetime of the process.

use crate::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Port the notification server binds when none is given
pub const DEFAULT_PORT: u16 = 5001;

/// Lowest port accepted for the notification server
pub const MIN_PORT: u16 = 1024;

/// Host bound when none is given
pub const DEFAULT_HOST: &str = "localhost";

/// Pattern watched when none is given
pub const DEFAULT_PATTERN: &str = "*.html";

/// Minimum gap between two accepted change events
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// A path to watch and the glob patterns restricting which changes under it
/// are reported. An empty pattern list reports every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedPath {
    pub path: PathBuf,
    pub patterns: Vec<String>,
}

impl WatchedPath {
    pub fn new(path: impl Into<PathBuf>, patterns: Vec<String>) -> Self {
        Self {
            path: path.into(),
            patterns,
        }
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Paths to watch, one registration each
    pub watched: Vec<WatchedPath>,

    /// Hosts the server binds to (empty: all interfaces)
    pub hosts: Vec<String>,

    /// Server port
    pub port: u16,

    /// Debounce threshold for change events
    pub debounce: Duration,

    /// Watch subdirectories of each path
    pub recursive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watched: vec![WatchedPath::new(".", vec![DEFAULT_PATTERN.to_string()])],
            hosts: vec![DEFAULT_HOST.to_string()],
            port: DEFAULT_PORT,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            recursive: false,
        }
    }
}

impl Config {
    /// Validate configuration before anything is started
    ///
    /// Returns error if:
    /// - The port is below 1024
    /// - No path is watched
    /// - A watched path does not exist
    /// - A pattern is empty
    pub fn validate(&self) -> Result<()> {
        if self.port < MIN_PORT {
            return Err(Error::Config(format!(
                "port {} is reserved, use a port of {} or higher",
                self.port, MIN_PORT
            )));
        }

        if self.watched.is_empty() {
            return Err(Error::Config("no paths to watch".to_string()));
        }

        for watched in &self.watched {
            if !watched.path.exists() {
                return Err(Error::InvalidPath(format!(
                    "{} does not exist",
                    watched.path.display()
                )));
            }

            if watched.patterns.iter().any(|p| p.trim().is_empty()) {
                return Err(Error::Pattern(format!(
                    "empty pattern for {}",
                    watched.path.display()
                )));
            }
        }

        Ok(())
    }
}
