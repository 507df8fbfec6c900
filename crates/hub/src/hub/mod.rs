//! The event hub
//!
//! A [`Hub`] maps logical event names to two independent record lists:
//! custom handlers registered with [`Hub::listen`] and native bindings created
//! with [`Hub::bind`]. Native bindings feed into the same namespace by
//! emitting their logical name whenever the source fires.
//!
//! `Hub` is a cheap handle; clones share one registry. The registry is torn
//! down, unsubscribing every native binding, when [`Hub::teardown`] is called
//! or the last clone is dropped.

mod bind_handle;
mod emit;

pub use bind_handle::BindHandle;

use crate::handler::{self, EventHandler, Next, Wrapped};
use crate::records::{HandlerRecord, NativeBridgeRecord};
use crate::source::{NativeListener, NativeSource};
use evhub_config::HubConfig;
use evhub_core::{Args, EventName, HubError, Result};
use evhub_utils::registry_span;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Callback notified of every failed emission
pub type UncaughtHandler = Arc<dyn Fn(&HubError) + Send + Sync>;

#[derive(Default)]
struct Registry {
    custom_events: HashMap<EventName, Vec<Arc<HandlerRecord>>>,
    native_events: HashMap<EventName, Vec<Arc<NativeBridgeRecord>>>,
}

impl Registry {
    fn listeners(&self, name: &str) -> usize {
        self.custom_events.get(name).map_or(0, Vec::len)
    }

    fn bindings(&self, name: &str) -> usize {
        self.native_events.get(name).map_or(0, Vec::len)
    }

    fn has_binding(&self, name: &str, record: &Arc<NativeBridgeRecord>) -> bool {
        self.native_events
            .get(name)
            .is_some_and(|list| list.iter().any(|r| Arc::ptr_eq(r, record)))
    }

    /// Remove `targets` from the handlers of `name`, returning the ones found
    fn remove_handlers(
        &mut self,
        name: &str,
        targets: &[Arc<HandlerRecord>],
    ) -> Vec<Arc<HandlerRecord>> {
        let Some(list) = self.custom_events.get_mut(name) else {
            return Vec::new();
        };
        let mut removed = Vec::new();
        list.retain(|record| {
            if targets.iter().any(|t| Arc::ptr_eq(t, record)) {
                removed.push(Arc::clone(record));
                false
            } else {
                true
            }
        });
        if list.is_empty() {
            self.custom_events.remove(name);
        }
        removed
    }

    /// Drop `removed` from the scoped lists of the bindings under `name`
    fn forget_scoped(&self, name: &str, removed: &[Arc<HandlerRecord>]) {
        if removed.is_empty() {
            return;
        }
        if let Some(bindings) = self.native_events.get(name) {
            for binding in bindings {
                binding.forget_scoped(removed);
            }
        }
    }

    fn take_all(&mut self) -> (Vec<Arc<HandlerRecord>>, Vec<Arc<NativeBridgeRecord>>) {
        let handlers = self.custom_events.drain().flat_map(|(_, list)| list).collect();
        let bindings = self.native_events.drain().flat_map(|(_, list)| list).collect();
        (handlers, bindings)
    }
}

struct HubInner {
    config: HubConfig,
    registry: Mutex<Registry>,
    uncaught: RwLock<Option<UncaughtHandler>>,
}

impl HubInner {
    fn push_handler(
        &self,
        registry: &mut Registry,
        name: &EventName,
        record: Arc<HandlerRecord>,
    ) -> usize {
        let list = registry.custom_events.entry(name.clone()).or_default();
        list.push(record);
        let count = list.len();

        // Warn once per crossing, not on every listen past the threshold
        if self.config.exceeds_max_listeners(count) && !self.config.exceeds_max_listeners(count - 1) {
            warn!(
                hub = %self.config.label,
                event = %name,
                listeners = count,
                max_listeners = ?self.config.max_listeners,
                "Listener count exceeds the configured maximum; possible handler leak"
            );
        }
        count
    }

    fn snapshot(&self, name: &str) -> Vec<Arc<HandlerRecord>> {
        self.registry
            .lock()
            .custom_events
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    fn report_uncaught(&self, err: &HubError) {
        let handler = self.uncaught.read().clone();
        if let Some(handler) = handler {
            handler(err);
        }
    }
}

impl Drop for HubInner {
    fn drop(&mut self) {
        let (handlers, bindings) = self.registry.get_mut().take_all();
        release(&handlers, &bindings);
    }
}

fn release(handlers: &[Arc<HandlerRecord>], bindings: &[Arc<NativeBridgeRecord>]) {
    for record in bindings {
        record.destroy();
    }
    for record in handlers {
        record.destroy();
    }
}

/// In-process event hub
#[derive(Clone)]
pub struct Hub {
    inner: Arc<HubInner>,
}

impl Hub {
    /// Create a hub with the default configuration
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    pub fn with_config(config: HubConfig) -> Self {
        Self {
            inner: Arc::new(HubInner {
                config,
                registry: Mutex::new(Registry::default()),
                uncaught: RwLock::new(None),
            }),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    /// Bridge `native_event` on `source` into the logical event `logical`.
    ///
    /// Every time the source fires, `logical` is emitted on this hub with the
    /// native arguments. The emission runs as a task on the tokio runtime
    /// that was current when `bind` was called.
    pub fn bind(
        &self,
        source: Arc<dyn NativeSource>,
        native_event: &str,
        logical: &str,
        options: Value,
    ) -> Result<BindHandle> {
        let native_event = EventName::validate("bind", native_event)?;
        let logical = EventName::validate("bind", logical)?;
        let _span = registry_span(&self.inner.config.label, "bind", &logical).entered();

        if !source.accepts_listeners() {
            return Err(HubError::contract_for(
                "bind",
                "source is not accepting native listeners",
                logical.as_str(),
            ));
        }

        let record = NativeBridgeRecord::create(source, native_event.as_str(), options)
            .map_err(|e| {
                HubError::contract_for(
                    "bind",
                    format!("failed to subscribe to native event '{native_event}': {e}"),
                    logical.as_str(),
                )
            })?
            .with_runtime(Handle::try_current().ok());
        let record = Arc::new(record);
        record.set_listener(self.forwarder(logical.clone(), &record));

        let count = {
            let mut registry = self.inner.registry.lock();
            let list = registry.native_events.entry(logical.clone()).or_default();
            list.push(Arc::clone(&record));
            list.len()
        };

        debug!(
            event = %logical,
            native_event = %native_event,
            record_id = %record.id(),
            bindings = count,
            "Native event bound"
        );
        Ok(BindHandle::new(Arc::downgrade(&self.inner), logical, record))
    }

    /// Listener installed on a native record: emits `event` on this hub.
    ///
    /// Emissions are spawned on the runtime pinned to the record at bind
    /// time, else on whichever runtime is current now or at fire time.
    fn forwarder(&self, event: EventName, record: &NativeBridgeRecord) -> NativeListener {
        let hub = Arc::downgrade(&self.inner);
        let runtime = record
            .runtime()
            .cloned()
            .or_else(|| Handle::try_current().ok());

        Arc::new(move |args: Args| {
            let Some(inner) = hub.upgrade() else {
                debug!(event = %event, "Native event fired after the hub was dropped");
                return;
            };
            let Some(runtime) = runtime.clone().or_else(|| Handle::try_current().ok()) else {
                warn!(event = %event, "Native event fired outside a tokio runtime; dropping it");
                return;
            };

            let hub = Hub { inner };
            let event = event.clone();
            runtime.spawn(async move {
                // Failures were already reported through the uncaught handler
                let _ = hub.emit(&event, args).await;
            });
        })
    }

    /// Remove every native binding registered under `logical`, returning how
    /// many were removed. Unknown names are a no-op.
    pub fn unbind(&self, logical: &str) -> usize {
        let (bindings, scoped) = {
            let mut registry = self.inner.registry.lock();
            let Some(bindings) = registry.native_events.remove(logical) else {
                return 0;
            };
            let adopted: Vec<_> = bindings.iter().flat_map(|r| r.take_scoped()).collect();
            let scoped = registry.remove_handlers(logical, &adopted);
            (bindings, scoped)
        };

        release(&scoped, &bindings);
        debug!(
            event = %logical,
            bindings = bindings.len(),
            scoped_listeners = scoped.len(),
            "Native bindings removed"
        );
        bindings.len()
    }

    /// Remove one native binding. Returns `false` if `record` is not bound
    /// under `logical`.
    pub fn unbind_record(&self, logical: &str, record: &Arc<NativeBridgeRecord>) -> bool {
        let scoped = {
            let mut registry = self.inner.registry.lock();
            let Some(list) = registry.native_events.get_mut(logical) else {
                return false;
            };
            let Some(index) = list.iter().position(|r| Arc::ptr_eq(r, record)) else {
                return false;
            };
            list.remove(index);
            if list.is_empty() {
                registry.native_events.remove(logical);
            }
            let adopted = record.take_scoped();
            registry.remove_handlers(logical, &adopted)
        };

        release(&scoped, std::slice::from_ref(record));
        debug!(
            event = %logical,
            record_id = %record.id(),
            scoped_listeners = scoped.len(),
            "Native binding removed"
        );
        true
    }

    /// Register `handler` for `logical`. The returned record identifies this
    /// registration for [`Hub::unlisten`].
    pub fn listen<H: EventHandler + 'static>(
        &self,
        logical: &str,
        handler: H,
    ) -> Result<Arc<HandlerRecord>> {
        let logical = EventName::validate("listen", logical)?;
        let record = Arc::new(HandlerRecord::new(handler));

        let count = {
            let mut registry = self.inner.registry.lock();
            self.inner
                .push_handler(&mut registry, &logical, Arc::clone(&record))
        };

        debug!(event = %logical, record_id = %record.id(), listeners = count, "Listener added");
        Ok(record)
    }

    /// Remove one handler registration. Returns `false` if it is not
    /// registered under `logical`.
    pub fn unlisten(&self, logical: &str, record: &Arc<HandlerRecord>) -> bool {
        let removed = {
            let mut registry = self.inner.registry.lock();
            let removed = registry.remove_handlers(logical, std::slice::from_ref(record));
            registry.forget_scoped(logical, &removed);
            removed
        };

        release(&removed, &[]);
        !removed.is_empty()
    }

    /// Remove every custom handler for `logical`, returning how many were
    /// removed. Native bindings under the same name are left in place.
    pub fn drop_event(&self, logical: &str) -> usize {
        let removed = {
            let mut registry = self.inner.registry.lock();
            let removed = registry.custom_events.remove(logical).unwrap_or_default();
            registry.forget_scoped(logical, &removed);
            removed
        };

        release(&removed, &[]);
        if !removed.is_empty() {
            debug!(event = %logical, listeners = removed.len(), "Listeners dropped");
        }
        removed.len()
    }

    /// Move the listeners and native bindings of `old_name` to `new_name`.
    ///
    /// Native bindings keep their subscription; only their forwarding target
    /// changes, so no native event is lost across the rename.
    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        let old = EventName::validate("rename", old_name)?;
        let new = EventName::validate("rename", new_name)?;
        let _span = registry_span(&self.inner.config.label, "rename", &old).entered();

        if old == new {
            return Err(HubError::contract_for(
                "rename",
                format!("cannot rename '{old}' to itself"),
                old.as_str(),
            ));
        }

        let mut registry = self.inner.registry.lock();
        if registry.listeners(&old) == 0 {
            return Err(HubError::contract_for(
                "rename",
                "no listeners are registered under this name",
                old.as_str(),
            ));
        }
        if registry.listeners(&new) != 0 {
            return Err(HubError::conflict(
                "rename",
                format!("cannot rename '{old}': a non-empty listener group with the same name already exists"),
                new.as_str(),
            ));
        }
        if registry.bindings(&new) != 0 {
            return Err(HubError::conflict(
                "rename",
                format!("cannot rename '{old}': native bindings are already registered under the target name"),
                new.as_str(),
            ));
        }

        let handlers = registry.custom_events.remove(old.as_str()).unwrap_or_default();
        let listener_count = handlers.len();
        registry.custom_events.insert(new.clone(), handlers);

        let mut binding_count = 0;
        if let Some(bindings) = registry.native_events.remove(old.as_str()) {
            for record in &bindings {
                record.set_listener(self.forwarder(new.clone(), record));
            }
            binding_count = bindings.len();
            registry.native_events.insert(new.clone(), bindings);
        }
        drop(registry);

        debug!(
            from = %old,
            to = %new,
            listeners = listener_count,
            bindings = binding_count,
            "Event renamed"
        );
        Ok(())
    }

    /// Install the callback notified of every failed emission, replacing any
    /// previous one
    pub fn set_uncaught_handler<F>(&self, handler: F)
    where
        F: Fn(&HubError) + Send + Sync + 'static,
    {
        *self.inner.uncaught.write() = Some(Arc::new(handler));
    }

    /// Remove the uncaught handler, returning whether one was installed
    pub fn clear_uncaught_handler(&self) -> bool {
        self.inner.uncaught.write().take().is_some()
    }

    pub fn has_uncaught_handler(&self) -> bool {
        self.inner.uncaught.read().is_some()
    }

    /// Number of custom handlers registered for `logical`
    pub fn listener_count(&self, logical: &str) -> usize {
        self.inner.registry.lock().listeners(logical)
    }

    /// Number of native bindings registered under `logical`
    pub fn binding_count(&self, logical: &str) -> usize {
        self.inner.registry.lock().bindings(logical)
    }

    /// Sorted names that have listeners, bindings, or both
    pub fn event_names(&self) -> Vec<String> {
        let registry = self.inner.registry.lock();
        registry
            .custom_events
            .keys()
            .chain(registry.native_events.keys())
            .map(|name| name.as_str().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Unsubscribe every native binding and drop every handler
    pub fn teardown(&self) {
        let (handlers, bindings) = self.inner.registry.lock().take_all();
        release(&handlers, &bindings);
        debug!(
            hub = %self.inner.config.label,
            listeners = handlers.len(),
            bindings = bindings.len(),
            "Hub torn down"
        );
    }

    /// Handler that resolves to `value` whatever it is called with
    pub fn next(value: Value) -> Next {
        handler::next(value)
    }

    /// Adapt a side-effecting callback into a handler that always succeeds
    pub fn wrap<F, R>(f: F) -> Wrapped<F>
    where
        F: Fn(Args) -> R + Send + Sync,
    {
        handler::wrap(f)
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.inner.registry.lock();
        f.debug_struct("Hub")
            .field("label", &self.inner.config.label)
            .field("custom_events", &registry.custom_events.len())
            .field("native_events", &registry.native_events.len())
            .finish()
    }
}
