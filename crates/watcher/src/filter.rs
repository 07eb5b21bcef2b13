//! Glob pattern filtering for watched paths
//!
//! Patterns use gitignore syntax, matched case-insensitively. A pattern
//! without a slash (e.g. `*.html`) matches the file name at any depth below
//! the watched root; a pattern with a slash is anchored to the root.
//!
//! A watched regular file is matched relative to its parent directory, so
//! `index.html` watched with `*.html` matches itself.

use autoreload_core::Error;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};

/// Pattern filter bound to one watched root
#[derive(Debug, Clone)]
pub struct PatternFilter {
    /// Canonical watched path, file or directory
    scope: PathBuf,

    /// Compiled patterns (None: every path matches)
    matcher: Option<Gitignore>,
}

impl PatternFilter {
    /// Compile `patterns` relative to `root`
    ///
    /// Unbalanced brackets and similar are taken literally, the way git
    /// reads them, so `[unclosed` matches only a file of that name.
    pub fn new(root: &Path, patterns: &[String]) -> Result<Self, Error> {
        if patterns.is_empty() {
            return Ok(Self {
                scope: root.to_path_buf(),
                matcher: None,
            });
        }

        let base = if root.is_file() {
            root.parent().unwrap_or(root)
        } else {
            root
        };

        let mut builder = GitignoreBuilder::new(base);
        builder
            .case_insensitive(true)
            .map_err(|e| Error::Pattern(e.to_string()))?;

        for pattern in patterns {
            builder
                .add_line(None, pattern)
                .map_err(|e| Error::Pattern(format!("{}: {}", pattern, e)))?;
        }

        let matcher = builder
            .build()
            .map_err(|e| Error::Pattern(e.to_string()))?;

        Ok(Self {
            scope: root.to_path_buf(),
            matcher: Some(matcher),
        })
    }

    /// Whether `path` is the watched path or lives under it
    pub fn covers(&self, path: &Path) -> bool {
        path.starts_with(&self.scope)
    }

    /// Whether `path` matches any pattern
    pub fn matches(&self, path: &Path) -> bool {
        match &self.matcher {
            Some(matcher) => matcher.matched(path, path.is_dir()).is_ignore(),
            None => true,
        }
    }
}
