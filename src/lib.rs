//! evhub: an in-process event hub
//!
//! A [`Hub`] routes logical events to custom handlers and bridges native
//! listener APIs into the same namespace. Handlers are async and all of
//! them settle on every emission; the first failure is reported through
//! the hub's uncaught handler and returned to the emitter.
//!
//! ```no_run
//! use evhub::{handler_fn, Hub, LocalSource};
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//!
//! # async fn demo() -> evhub::Result<()> {
//! let hub = Hub::new();
//! let source = Arc::new(LocalSource::new());
//!
//! hub.bind(source.clone(), "click", "clicked", Value::Null)?;
//! hub.listen("clicked", handler_fn(|args| Ok(json!(args.len()))))?;
//!
//! let result = hub.emit("clicked", vec![json!(1)]).await?;
//! assert_eq!(result.results(), &[json!(1)]);
//! # Ok(())
//! # }
//! ```

pub use evhub_config as config;
pub use evhub_utils::tracing;

pub use evhub_config::{ConfigError, HubConfig};
pub use evhub_core::{Args, BoxError, DispatchResult, EventName, HubError, Result, SharedError};
pub use evhub_hub::{
    async_handler_fn, handler_fn, next, wrap, BindHandle, EventHandler, HandlerPanic,
    HandlerRecord, HandlerResult, Hub, LocalSource, NativeBridgeRecord, NativeListener,
    NativeSource, UncaughtHandler,
};
