//! Single-slot subscriber for an outbound event stream.
//!
//! Each stream supports exactly one listener at a time. Attaching a new
//! listener replaces the previous one; with no listener attached, events are
//! dropped. Delivery is best effort.

use std::sync::{Arc, Mutex, MutexGuard};

/// Callback receiving stream items.
pub type EventSink<T> = Arc<dyn Fn(T) + Send + Sync + 'static>;

/// Wrap a closure as an [`EventSink`].
pub fn new_sink<T, F>(f: F) -> EventSink<T>
where
    F: Fn(T) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Holds at most one subscriber for a stream.
pub struct SubscriberSlot<T> {
    name: &'static str,
    sink: Mutex<Option<EventSink<T>>>,
}

impl<T> SubscriberSlot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            sink: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<EventSink<T>>> {
        self.sink.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Attach a subscriber, replacing any existing one.
    pub fn listen(&self, sink: EventSink<T>) {
        if self.lock().replace(sink).is_some() {
            tracing::debug!(stream = self.name, "replaced_subscriber");
        }
    }

    /// Detach the current subscriber, if any.
    pub fn cancel(&self) {
        self.lock().take();
    }

    pub fn is_listening(&self) -> bool {
        self.lock().is_some()
    }

    /// Deliver an item to the subscriber. Returns false if it was dropped.
    pub fn send(&self, item: T) -> bool {
        // Clone the sink out so the callback runs without holding the lock.
        let sink = self.lock().clone();
        match sink {
            Some(sink) => {
                sink(item);
                true
            }
            None => {
                tracing::debug!(stream = self.name, "no_subscriber_event_dropped");
                false
            }
        }
    }
}
