//! Event registry and dispatch for evhub
//!
//! This crate holds the [`Hub`] and everything it registers: custom
//! [`EventHandler`]s, [`NativeSource`] bindings and the records that track
//! them.

pub mod handler;
pub mod hub;
pub mod records;
pub mod source;

pub use handler::{
    async_handler_fn, handler_fn, next, wrap, AsyncFnHandler, EventHandler, FnHandler,
    HandlerResult, Next, Wrapped,
};
pub use hub::{BindHandle, Hub, UncaughtHandler};
pub use records::{HandlerPanic, HandlerRecord, NativeBridgeRecord};
pub use source::{LocalSource, NativeListener, NativeSource};
