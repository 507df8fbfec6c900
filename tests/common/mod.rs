//! Common test utilities and helpers
//!
//! Sources that record how the hub talks to them, and channel-backed handlers
//! for observing emissions that happen on spawned tasks.

#![allow(dead_code)]

use evhub::{wrap, Args, BoxError, EventHandler, NativeListener, NativeSource};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Native source that records every subscribe and unsubscribe call
#[derive(Default)]
pub struct RecordingSource {
    listeners: Mutex<Vec<(String, NativeListener, Value)>>,
    added: AtomicUsize,
    removed: AtomicUsize,
    ignore_removals: bool,
}

impl RecordingSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A source that counts unsubscribe calls but keeps delivering to the
    /// listener anyway
    pub fn ignoring_removals() -> Arc<Self> {
        Arc::new(Self {
            ignore_removals: true,
            ..Self::default()
        })
    }

    pub fn fire(&self, event: &str, args: Args) {
        let targets: Vec<NativeListener> = self
            .listeners
            .lock()
            .iter()
            .filter(|(name, _, _)| name == event)
            .map(|(_, listener, _)| Arc::clone(listener))
            .collect();
        for listener in targets {
            listener(args.clone());
        }
    }

    pub fn added(&self) -> usize {
        self.added.load(Ordering::SeqCst)
    }

    pub fn removed(&self) -> usize {
        self.removed.load(Ordering::SeqCst)
    }

    pub fn active(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn options_for(&self, event: &str) -> Vec<Value> {
        self.listeners
            .lock()
            .iter()
            .filter(|(name, _, _)| name == event)
            .map(|(_, _, options)| options.clone())
            .collect()
    }
}

impl NativeSource for RecordingSource {
    fn add_listener(
        &self,
        event: &str,
        listener: NativeListener,
        options: &Value,
    ) -> Result<(), BoxError> {
        self.added.fetch_add(1, Ordering::SeqCst);
        self.listeners
            .lock()
            .push((event.to_string(), listener, options.clone()));
        Ok(())
    }

    fn remove_listener(&self, event: &str, listener: &NativeListener, options: &Value) {
        self.removed.fetch_add(1, Ordering::SeqCst);
        if self.ignore_removals {
            return;
        }
        self.listeners.lock().retain(|(name, existing, existing_options)| {
            !(name == event && Arc::ptr_eq(existing, listener) && existing_options == options)
        });
    }
}

/// Native source whose subscribe call always fails
pub struct RejectingSource;

impl NativeSource for RejectingSource {
    fn add_listener(&self, event: &str, _: NativeListener, _: &Value) -> Result<(), BoxError> {
        Err(format!("unknown native event '{event}'").into())
    }

    fn remove_listener(&self, _: &str, _: &NativeListener, _: &Value) {}
}

/// Handler forwarding every argument list it receives into a channel
pub fn channel_handler() -> (impl EventHandler, mpsc::UnboundedReceiver<Args>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (wrap(move |args| tx.send(args)), rx)
}

/// Wait briefly for the next delivery
pub async fn recv(rx: &mut mpsc::UnboundedReceiver<Args>) -> Option<Args> {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .ok()
        .flatten()
}

/// Assert that nothing is delivered within a short window
pub async fn assert_silent(rx: &mut mpsc::UnboundedReceiver<Args>) {
    let outcome = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
    assert!(
        !matches!(outcome, Ok(Some(_))),
        "unexpected delivery: {outcome:?}"
    );
}
