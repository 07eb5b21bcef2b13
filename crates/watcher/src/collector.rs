//! Debounced event collector
//!
//! Sits between raw watch events and the change queue: drops events that
//! match no pattern, rate-limits the rest and enqueues the survivors.

use crate::debounce::Debouncer;
use crate::filter::PatternFilter;
use crate::WatchEvent;
use autoreload_core::{ChangeEvent, ChangeQueue};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Collector owned by the watch worker thread
pub struct Collector {
    filters: Vec<PatternFilter>,
    debouncer: Debouncer,
    queue: Arc<ChangeQueue>,
}

impl Collector {
    pub fn new(filters: Vec<PatternFilter>, debounce: Duration, queue: Arc<ChangeQueue>) -> Self {
        Self {
            filters,
            debouncer: Debouncer::new(debounce),
            queue,
        }
    }

    /// Handle one raw event, returns true if it was enqueued
    pub fn on_event(&mut self, event: WatchEvent) -> bool {
        self.on_event_at(event, Instant::now())
    }

    /// Handle one raw event observed at `now`
    pub fn on_event_at(&mut self, event: WatchEvent, now: Instant) -> bool {
        let Some(path) = self.matching_path(&event) else {
            trace!(paths = ?event.paths, "no pattern matched");
            return false;
        };

        if !self.debouncer.accept(now) {
            debug!(path = %path.display(), "debounced");
            return false;
        }

        debug!(path = %path.display(), kind = ?event.kind, "change accepted");
        self.queue.push(ChangeEvent::new(event.kind, path));
        true
    }

    /// First path of the event matched by the filter of its watched root
    fn matching_path(&self, event: &WatchEvent) -> Option<PathBuf> {
        event
            .paths
            .iter()
            .find(|path| {
                self.filters
                    .iter()
                    .any(|filter| filter.covers(path) && filter.matches(path))
            })
            .cloned()
    }
}
