//! Registration record for one native source subscription
//!
//! The record subscribes a single internal listener for its whole lifetime.
//! That listener forwards to a swappable external listener, which is what
//! lets the hub re-target a binding without touching the source.

use crate::records::handler::HandlerRecord;
use crate::source::{NativeListener, NativeSource};
use evhub_core::{Args, BoxError};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::trace;
use uuid::Uuid;

type ListenerSlot = Arc<RwLock<Option<NativeListener>>>;

struct Subscription {
    source: Arc<dyn NativeSource>,
    internal: NativeListener,
}

/// One subscription to a native event source
pub struct NativeBridgeRecord {
    id: Uuid,
    native_event: String,
    options: Value,
    subscription: Mutex<Option<Subscription>>,
    external: ListenerSlot,
    scoped: Mutex<Vec<Arc<HandlerRecord>>>,
    runtime: Option<Handle>,
}

impl NativeBridgeRecord {
    /// Subscribe to `native_event` on `source`
    pub fn create(
        source: Arc<dyn NativeSource>,
        native_event: impl Into<String>,
        options: Value,
    ) -> Result<Self, BoxError> {
        let id = Uuid::new_v4();
        let native_event = native_event.into();
        let external: ListenerSlot = Arc::new(RwLock::new(None));

        let slot = Arc::clone(&external);
        let internal: NativeListener = Arc::new(move |args: Args| {
            // Clone out of the slot so the listener runs without the lock held
            let target = slot.read().clone();
            match target {
                Some(listener) => listener(args),
                None => trace!(record_id = %id, "Native event fired with no listener attached"),
            }
        });

        source.add_listener(&native_event, Arc::clone(&internal), &options)?;

        Ok(Self {
            id,
            native_event,
            options,
            subscription: Mutex::new(Some(Subscription { source, internal })),
            external,
            scoped: Mutex::new(Vec::new()),
            runtime: None,
        })
    }

    /// Pin the runtime that emissions from this binding are spawned on
    pub fn with_runtime(mut self, runtime: Option<Handle>) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn runtime(&self) -> Option<&Handle> {
        self.runtime.as_ref()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn native_event(&self) -> &str {
        &self.native_event
    }

    pub fn options(&self) -> &Value {
        &self.options
    }

    /// Replace the external listener. The native subscription is untouched.
    pub fn set_listener(&self, listener: NativeListener) {
        let subscription = self.subscription.lock();
        if subscription.is_some() {
            *self.external.write() = Some(listener);
        }
    }

    pub fn clear_listener(&self) {
        self.external.write().take();
    }

    pub fn has_listener(&self) -> bool {
        self.external.read().is_some()
    }

    /// Unsubscribe from the source and drop every reference. Safe to call
    /// more than once.
    pub fn destroy(&self) {
        let subscription = {
            let mut guard = self.subscription.lock();
            let taken = guard.take();
            self.clear_listener();
            taken
        };
        let Some(subscription) = subscription else {
            return;
        };
        subscription
            .source
            .remove_listener(&self.native_event, &subscription.internal, &self.options);
        trace!(record_id = %self.id, native_event = %self.native_event, "Native subscription removed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.subscription.lock().is_none()
    }

    /// Attach a handler whose lifetime is tied to this binding
    pub(crate) fn adopt(&self, handler: Arc<HandlerRecord>) {
        self.scoped.lock().push(handler);
    }

    /// Release the handlers scoped to this binding
    pub(crate) fn take_scoped(&self) -> Vec<Arc<HandlerRecord>> {
        std::mem::take(&mut *self.scoped.lock())
    }

    /// Stop tracking handlers that were removed from the hub directly
    pub(crate) fn forget_scoped(&self, handlers: &[Arc<HandlerRecord>]) {
        self.scoped
            .lock()
            .retain(|scoped| !handlers.iter().any(|h| Arc::ptr_eq(h, scoped)));
    }

    pub(crate) fn scoped_count(&self) -> usize {
        self.scoped.lock().len()
    }
}

impl fmt::Debug for NativeBridgeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBridgeRecord")
            .field("id", &self.id)
            .field("native_event", &self.native_event)
            .field("options", &self.options)
            .field("destroyed", &self.is_destroyed())
            .field("scoped", &self.scoped_count())
            .finish_non_exhaustive()
    }
}
