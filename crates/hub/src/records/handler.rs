//! Registration record for one custom event handler

use crate::handler::{EventHandler, HandlerResult};
use evhub_core::{Args, BoxError};
use futures::future::{self, BoxFuture, FutureExt};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// A handler panicked instead of returning an error
#[derive(Debug, thiserror::Error)]
#[error("handler panicked: {message}")]
pub struct HandlerPanic {
    pub message: String,
}

impl HandlerPanic {
    fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }

    fn boxed(payload: Box<dyn Any + Send>) -> BoxError {
        Box::new(Self::from_payload(payload))
    }
}

/// One handler registered through `listen`. The returned `Arc` doubles as
/// the caller's handle for `unlisten`.
pub struct HandlerRecord {
    id: Uuid,
    handler: Arc<dyn EventHandler>,
    destroyed: AtomicBool,
}

impl HandlerRecord {
    pub fn new<H: EventHandler + 'static>(handler: H) -> Self {
        Self {
            id: Uuid::new_v4(),
            handler: Arc::new(handler),
            destroyed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Start the handler and return its outcome as a future.
    ///
    /// A panic, whether raised while starting the handler or while it runs,
    /// resolves to a [`HandlerPanic`] error instead of unwinding into the
    /// dispatcher.
    pub fn invoke_deferred(&self, args: Args) -> BoxFuture<'_, HandlerResult> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.handler.handle(args))) {
            Ok(pending) => AssertUnwindSafe(pending)
                .catch_unwind()
                .map(|outcome| outcome.unwrap_or_else(|payload| Err(HandlerPanic::boxed(payload))))
                .boxed(),
            Err(payload) => future::ready(Err(HandlerPanic::boxed(payload))).boxed(),
        }
    }

    /// Mark the record as torn down. Handlers own no external resources, so
    /// this only flips the marker.
    pub fn destroy(&self) {
        self.destroyed.store(true, Ordering::Release);
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }
}

impl fmt::Debug for HandlerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRecord")
            .field("id", &self.id)
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}
