//! Unbounded FIFO of pending change events
//!
//! Producer is the watch worker thread, consumers are server connection
//! tasks. The queue carries its own synchronization; callers never lock.

use crate::ChangeEvent;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use tokio::sync::Notify;

/// Thread-safe change queue
///
/// `push` never blocks. `pop_blocking` parks a thread and `pop` suspends a
/// task until an event is available. Events come out in push order.
#[derive(Default)]
pub struct ChangeQueue {
    events: Mutex<VecDeque<ChangeEvent>>,
    /// Wakes threads parked in `pop_blocking`
    available: Condvar,
    /// Wakes tasks suspended in `pop`
    notify: Notify,
}

impl ChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn push(&self, event: ChangeEvent) {
        self.events.lock().push_back(event);
        self.available.notify_one();
        self.notify.notify_one();
    }

    /// Remove the oldest event, parking the calling thread until one exists
    pub fn pop_blocking(&self) -> ChangeEvent {
        let mut events = self.events.lock();
        loop {
            if let Some(event) = events.pop_front() {
                return event;
            }
            self.available.wait(&mut events);
        }
    }

    /// Remove the oldest event, waiting until one exists
    ///
    /// Cancel-safe: an event is only removed in the poll that returns it, so
    /// dropping this future never loses an event.
    pub async fn pop(&self) -> ChangeEvent {
        loop {
            let mut notified = std::pin::pin!(self.notify.notified());
            // Register before checking so a push in between still wakes us
            notified.as_mut().enable();

            if let Some(event) = self.events.lock().pop_front() {
                return event;
            }

            notified.await;
        }
    }

    /// Number of events waiting
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}
