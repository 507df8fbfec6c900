//! Domain types shared across the hub crates

pub mod dispatch;
pub mod newtypes;

pub use dispatch::{Args, DispatchResult};
pub use newtypes::EventName;
