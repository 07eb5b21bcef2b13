//! Change events and the message sent to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Type of file system change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File created
    Created,
    /// File modified
    Modified,
    /// File deleted
    Deleted,
    /// File renamed or moved
    Moved,
}

/// One accepted file system change, waiting to be delivered
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// Type of change
    pub kind: ChangeKind,
    /// Absolute path that changed
    pub path: PathBuf,
    /// When the collector accepted the change
    pub accepted_at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            accepted_at: Utc::now(),
        }
    }

    /// Message announcing this change to a client
    pub fn notification(&self) -> Notification {
        Notification::FileChange {
            path: self.path.to_string_lossy().into_owned(),
        }
    }
}

/// Server to client message, sent as a JSON text frame
///
/// ```text
/// {"type": "fileChange", "path": "/abs/path/index.html"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Notification {
    FileChange { path: String },
}

impl Notification {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
