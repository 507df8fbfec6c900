//! Native event sources
//!
//! A native source is anything exposing add/remove-listener semantics keyed
//! by an event identifier. The hub never owns a source; it only subscribes
//! and unsubscribes.

use evhub_core::{Args, BoxError};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Listener installed on a native source. Identity is `Arc` pointer identity.
pub type NativeListener = Arc<dyn Fn(Args) + Send + Sync>;

/// Trait for objects that deliver native events to listeners
pub trait NativeSource: Send + Sync {
    /// Subscribe `listener` to `event`. `options` are opaque to the hub.
    fn add_listener(
        &self,
        event: &str,
        listener: NativeListener,
        options: &Value,
    ) -> Result<(), BoxError>;

    /// Remove a listener previously added with the same event and options
    fn remove_listener(&self, event: &str, listener: &NativeListener, options: &Value);

    /// Whether the source can currently take listeners
    fn accepts_listeners(&self) -> bool {
        true
    }
}

struct Subscription {
    event: String,
    listener: NativeListener,
    options: Value,
}

/// A minimal in-process native source.
///
/// Useful for adapting callback-driven producers that have no listener
/// registry of their own, and as a stand-in source in tests.
#[derive(Default)]
pub struct LocalSource {
    subscriptions: Mutex<Vec<Subscription>>,
    closed: AtomicBool,
}

impl LocalSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `args` to every listener subscribed to `event`, returning how
    /// many were called. Listeners run outside the registry lock, so they may
    /// add or remove listeners themselves.
    pub fn fire(&self, event: &str, args: Args) -> usize {
        let listeners: Vec<NativeListener> = self
            .subscriptions
            .lock()
            .iter()
            .filter(|s| s.event == event)
            .map(|s| Arc::clone(&s.listener))
            .collect();

        for listener in &listeners {
            listener(args.clone());
        }
        listeners.len()
    }

    /// Number of listeners subscribed to `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.subscriptions
            .lock()
            .iter()
            .filter(|s| s.event == event)
            .count()
    }

    /// Number of listeners across all events
    pub fn total_listeners(&self) -> usize {
        self.subscriptions.lock().len()
    }

    /// Stop accepting new listeners. Existing ones keep receiving events.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

impl NativeSource for LocalSource {
    fn add_listener(
        &self,
        event: &str,
        listener: NativeListener,
        options: &Value,
    ) -> Result<(), BoxError> {
        if !self.accepts_listeners() {
            return Err("source is closed".into());
        }
        self.subscriptions.lock().push(Subscription {
            event: event.to_string(),
            listener,
            options: options.clone(),
        });
        Ok(())
    }

    fn remove_listener(&self, event: &str, listener: &NativeListener, options: &Value) {
        let mut subscriptions = self.subscriptions.lock();
        if let Some(index) = subscriptions.iter().position(|s| {
            s.event == event && Arc::ptr_eq(&s.listener, listener) && &s.options == options
        }) {
            subscriptions.remove(index);
        }
    }

    fn accepts_listeners(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }
}
