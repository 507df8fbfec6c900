//! Shared utilities for evhub
//!
//! Currently this is the tracing setup and the span helpers the hub uses to
//! group its log records.

pub mod tracing;

pub use self::tracing::{dispatch_span, init, init_with_filter, registry_span};
