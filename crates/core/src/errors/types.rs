//! Core error type definitions

use std::backtrace::Backtrace;
use std::sync::Arc;

/// Result type alias for hub operations
pub type Result<T> = std::result::Result<T, HubError>;

/// Boxed error returned by event handlers and native sources
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared, cloneable form of a handler error
pub type SharedError = Arc<dyn std::error::Error + Send + Sync>;

/// Error type for every hub operation.
///
/// All variants render as `[operation] message`, or
/// `[operation](event): message` when an event name is attached. A backtrace
/// is captured when the error is built; it is only populated when
/// `RUST_BACKTRACE` is enabled.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HubError {
    /// Missing or malformed arguments passed to a hub operation
    #[error("{}", format_hub_error(.operation, .message, .event))]
    Contract {
        operation: &'static str,
        message: String,
        event: Option<String>,
        trace: Arc<Backtrace>,
    },

    /// A rename collided with an existing listener group or binding
    #[error("{}", format_hub_error(.operation, .message, .event))]
    Conflict {
        operation: &'static str,
        message: String,
        event: Option<String>,
        trace: Arc<Backtrace>,
    },

    /// A handler failed while an event was being dispatched
    #[error("{}", format_handler_error(.event, .index, .source))]
    Handler {
        event: String,
        index: usize,
        #[source]
        source: SharedError,
        trace: Arc<Backtrace>,
    },
}

fn format_hub_error(operation: &str, message: &str, event: &Option<String>) -> String {
    match event {
        Some(event) => format!("[{operation}]({event}): {message}"),
        None => format!("[{operation}] {message}"),
    }
}

fn format_handler_error(event: &str, index: &usize, source: &SharedError) -> String {
    format!("[emit]({event}): handler #{index} failed: {source}")
}
