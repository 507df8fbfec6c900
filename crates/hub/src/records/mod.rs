//! Registration records held by the hub

pub mod handler;
pub mod native;

pub use handler::{HandlerPanic, HandlerRecord};
pub use native::NativeBridgeRecord;
