//! Handles returned from [`Hub::bind`]

use super::{Hub, HubInner};
use crate::handler::EventHandler;
use crate::records::{HandlerRecord, NativeBridgeRecord};
use evhub_core::{EventName, HubError, Result};
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::debug;

/// Scoped view of one native binding.
///
/// Listeners added through the handle are registered under the binding's
/// logical name and are removed together with the binding. The handle does
/// not keep the hub alive.
pub struct BindHandle {
    hub: Weak<HubInner>,
    event: EventName,
    record: Arc<NativeBridgeRecord>,
}

impl BindHandle {
    pub(super) fn new(hub: Weak<HubInner>, event: EventName, record: Arc<NativeBridgeRecord>) -> Self {
        Self { hub, event, record }
    }

    /// Logical name the binding was created under
    pub fn event(&self) -> &str {
        self.event.as_str()
    }

    pub fn record(&self) -> &Arc<NativeBridgeRecord> {
        &self.record
    }

    /// True once the binding is no longer registered under [`Self::event`],
    /// either because it was unbound, renamed or its hub was dropped
    pub fn is_stale(&self) -> bool {
        match self.hub.upgrade() {
            Some(inner) => !inner.registry.lock().has_binding(&self.event, &self.record),
            None => true,
        }
    }

    /// Register `handler` for this binding's logical name
    pub fn listen<H: EventHandler + 'static>(&self, handler: H) -> Result<Arc<HandlerRecord>> {
        let inner = self.hub.upgrade().ok_or_else(|| {
            HubError::contract_for("listen", "bind handle is stale; its hub was dropped", self.event.as_str())
        })?;
        let record = Arc::new(HandlerRecord::new(handler));

        let count = {
            let mut registry = inner.registry.lock();
            if !registry.has_binding(&self.event, &self.record) {
                return Err(HubError::contract_for(
                    "listen",
                    "bind handle is stale; its binding was unbound or renamed",
                    self.event.as_str(),
                ));
            }
            let count = inner.push_handler(&mut registry, &self.event, Arc::clone(&record));
            self.record.adopt(Arc::clone(&record));
            count
        };

        debug!(
            event = %self.event,
            record_id = %record.id(),
            binding_id = %self.record.id(),
            listeners = count,
            "Scoped listener added"
        );
        Ok(record)
    }

    /// Remove this binding and its scoped listeners. Returns `false` if it
    /// was already removed.
    pub fn unbind(&self) -> bool {
        match self.hub.upgrade() {
            Some(inner) => Hub { inner }.unbind_record(&self.event, &self.record),
            None => false,
        }
    }
}

impl fmt::Debug for BindHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindHandle")
            .field("event", &self.event)
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}
