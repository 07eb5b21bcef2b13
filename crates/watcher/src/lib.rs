//! File system watching for autoreload
//!
//! This crate provides:
//! - Pattern filtering per watched path
//! - A global debounce window
//! - A dedicated worker thread feeding the shared change queue

pub mod collector;
pub mod debounce;
pub mod filter;

use anyhow::{anyhow, bail, Context, Result};
use autoreload_core::config::DEFAULT_DEBOUNCE_MS;
use autoreload_core::{ChangeKind, ChangeQueue, Error, WatchedPath};
use collector::Collector;
use crossbeam_channel::{select, Receiver, Sender};
use filter::PatternFilter;
use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Watcher options
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    /// Minimum gap between accepted events
    pub debounce: Duration,
    /// Watch subdirectories too
    pub recursive: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            recursive: false,
        }
    }
}

/// File system watcher
///
/// Owns the platform watcher and the worker thread that runs the collector.
pub struct Watcher {
    /// Canonical roots, one registration each
    roots: Vec<PathBuf>,
    filters: Vec<PatternFilter>,
    options: WatchOptions,
    queue: Arc<ChangeQueue>,
    running: Option<Running>,
}

struct Running {
    backend: RecommendedWatcher,
    stop_tx: Sender<()>,
    worker: JoinHandle<()>,
}

impl Watcher {
    /// Create a watcher for the given paths
    ///
    /// Paths are canonicalized; a path that appears twice is registered once.
    pub fn new(
        watched: &[WatchedPath],
        options: WatchOptions,
        queue: Arc<ChangeQueue>,
    ) -> Result<Self> {
        let mut roots: Vec<PathBuf> = Vec::new();
        let mut filters = Vec::new();

        for entry in watched {
            let root = entry.path.canonicalize().map_err(|e| {
                Error::InvalidPath(format!("{}: {}", entry.path.display(), e))
            })?;

            if roots.contains(&root) {
                warn!(path = %root.display(), "path listed twice, watching once");
                continue;
            }

            filters.push(PatternFilter::new(&root, &entry.patterns)?);
            roots.push(root);
        }

        Ok(Self {
            roots,
            filters,
            options,
            queue,
            running: None,
        })
    }

    /// Start watching for events
    pub fn start(&mut self) -> Result<()> {
        if self.running.is_some() {
            bail!("Watcher is already running");
        }

        let (raw_tx, raw_rx) = crossbeam_channel::unbounded();
        let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);

        let mut backend = notify::recommended_watcher(
            move |result: notify::Result<notify::Event>| match result {
                Ok(event) => {
                    if let Some(event) = WatchEvent::from_notify(event) {
                        // Worker gone means we are stopping
                        let _ = raw_tx.send(event);
                    }
                }
                Err(e) => warn!(error = %e, paths = ?e.paths, "watch error"),
            },
        )
        .context("Failed to create file watcher")?;

        let mode = if self.options.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };

        for root in &self.roots {
            backend
                .watch(root, mode)
                .with_context(|| format!("Failed to watch {}", root.display()))?;
            info!(path = %root.display(), recursive = self.options.recursive, "watching");
        }

        let collector = Collector::new(
            self.filters.clone(),
            self.options.debounce,
            self.queue.clone(),
        );

        let worker = thread::Builder::new()
            .name("autoreload-watch".to_string())
            .spawn(move || run_worker(collector, raw_rx, stop_rx))
            .context("Failed to spawn watch worker")?;

        self.running = Some(Running {
            backend,
            stop_tx,
            worker,
        });
        Ok(())
    }

    /// Stop watching
    ///
    /// Returns once the worker thread has exited; nothing is enqueued after.
    pub fn stop(&mut self) -> Result<()> {
        let Some(Running {
            backend,
            stop_tx,
            worker,
        }) = self.running.take()
        else {
            bail!("Watcher is not running");
        };

        // No more callbacks once the platform watcher is gone
        drop(backend);
        let _ = stop_tx.send(());

        worker
            .join()
            .map_err(|_| anyhow!("watch worker panicked"))?;

        info!("watcher stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Canonical roots being watched
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        if self.running.is_some() {
            if let Err(e) = self.stop() {
                warn!(error = %e, "failed to stop watcher");
            }
        }
    }
}

fn run_worker(mut collector: Collector, raw_rx: Receiver<WatchEvent>, stop_rx: Receiver<()>) {
    debug!("watch worker started");

    loop {
        select! {
            recv(stop_rx) -> _ => break,
            recv(raw_rx) -> event => match event {
                Ok(event) => {
                    collector.on_event(event);
                }
                Err(_) => break,
            },
        }
    }

    debug!("watch worker exited");
}

/// Raw file system event, before filtering and debouncing
#[derive(Debug, Clone)]
pub struct WatchEvent {
    /// Type of change
    pub kind: ChangeKind,
    /// Paths involved (two for a rename seen from both ends)
    pub paths: Vec<PathBuf>,
}

impl WatchEvent {
    /// Convert a platform event, dropping access events
    pub fn from_notify(event: notify::Event) -> Option<Self> {
        let kind = match event.kind {
            EventKind::Access(_) => return None,
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Moved,
            EventKind::Remove(_) => ChangeKind::Deleted,
            _ => ChangeKind::Modified,
        };

        if event.paths.is_empty() {
            return None;
        }

        Some(Self {
            kind,
            paths: event.paths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, RemoveKind, RenameMode};
    use tempfile::TempDir;

    fn convert(kind: EventKind) -> Option<ChangeKind> {
        let event = notify::Event::new(kind).add_path(PathBuf::from("/site/index.html"));
        WatchEvent::from_notify(event).map(|e| e.kind)
    }

    #[test]
    fn test_event_kind_mapping() {
        assert_eq!(
            convert(EventKind::Create(CreateKind::File)),
            Some(ChangeKind::Created)
        );
        assert_eq!(
            convert(EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            Some(ChangeKind::Modified)
        );
        assert_eq!(
            convert(EventKind::Modify(ModifyKind::Name(RenameMode::Both))),
            Some(ChangeKind::Moved)
        );
        assert_eq!(
            convert(EventKind::Remove(RemoveKind::File)),
            Some(ChangeKind::Deleted)
        );
        assert_eq!(convert(EventKind::Any), Some(ChangeKind::Modified));
        assert_eq!(convert(EventKind::Access(AccessKind::Any)), None);
    }

    #[test]
    fn test_event_without_paths_dropped() {
        let event = notify::Event::new(EventKind::Create(CreateKind::File));
        assert!(WatchEvent::from_notify(event).is_none());
    }

    #[test]
    fn test_missing_path_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let watched = vec![WatchedPath::new(temp_dir.path().join("missing"), vec![])];

        let result = Watcher::new(&watched, WatchOptions::default(), Arc::new(ChangeQueue::new()));
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_paths_registered_once() {
        let temp_dir = TempDir::new().unwrap();
        let watched = vec![
            WatchedPath::new(temp_dir.path(), vec!["*.html".to_string()]),
            WatchedPath::new(temp_dir.path().join("."), vec!["*.html".to_string()]),
        ];

        let watcher =
            Watcher::new(&watched, WatchOptions::default(), Arc::new(ChangeQueue::new())).unwrap();
        assert_eq!(watcher.roots().len(), 1);
        assert!(watcher.roots()[0].is_absolute());
    }

    #[test]
    fn test_start_stop_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let watched = vec![WatchedPath::new(temp_dir.path(), vec![])];
        let mut watcher =
            Watcher::new(&watched, WatchOptions::default(), Arc::new(ChangeQueue::new())).unwrap();

        assert!(watcher.stop().is_err());

        watcher.start().unwrap();
        assert!(watcher.is_running());
        assert!(watcher.start().is_err());

        watcher.stop().unwrap();
        assert!(!watcher.is_running());

        // Restartable
        watcher.start().unwrap();
        watcher.stop().unwrap();
    }
}
