//! Builder methods and accessors for hub errors

use super::types::{BoxError, HubError, SharedError};
use std::backtrace::Backtrace;
use std::sync::Arc;

fn capture() -> Arc<Backtrace> {
    Arc::new(Backtrace::capture())
}

impl HubError {
    /// Create a contract violation without an event name
    #[must_use]
    pub fn contract(operation: &'static str, message: impl Into<String>) -> Self {
        HubError::Contract {
            operation,
            message: message.into(),
            event: None,
            trace: capture(),
        }
    }

    /// Create a contract violation attributed to an event
    #[must_use]
    pub fn contract_for(
        operation: &'static str,
        message: impl Into<String>,
        event: impl Into<String>,
    ) -> Self {
        HubError::Contract {
            operation,
            message: message.into(),
            event: Some(event.into()),
            trace: capture(),
        }
    }

    /// Create a naming conflict attributed to an event
    #[must_use]
    pub fn conflict(
        operation: &'static str,
        message: impl Into<String>,
        event: impl Into<String>,
    ) -> Self {
        HubError::Conflict {
            operation,
            message: message.into(),
            event: Some(event.into()),
            trace: capture(),
        }
    }

    /// Wrap the failure of the handler at `index` while dispatching `event`
    #[must_use]
    pub fn handler(event: impl Into<String>, index: usize, source: BoxError) -> Self {
        HubError::Handler {
            event: event.into(),
            index,
            source: SharedError::from(source),
            trace: capture(),
        }
    }

    /// Name of the operation that raised this error
    pub fn operation(&self) -> &'static str {
        match self {
            HubError::Contract { operation, .. } | HubError::Conflict { operation, .. } => {
                operation
            }
            HubError::Handler { .. } => "emit",
        }
    }

    /// Event name the error is attributed to, if any
    pub fn event(&self) -> Option<&str> {
        match self {
            HubError::Contract { event, .. } | HubError::Conflict { event, .. } => {
                event.as_deref()
            }
            HubError::Handler { event, .. } => Some(event),
        }
    }

    /// Backtrace captured when the error was built
    pub fn backtrace(&self) -> &Backtrace {
        match self {
            HubError::Contract { trace, .. }
            | HubError::Conflict { trace, .. }
            | HubError::Handler { trace, .. } => trace,
        }
    }

    /// The error produced by the failing handler, for handler failures
    pub fn handler_error(&self) -> Option<&SharedError> {
        match self {
            HubError::Handler { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn is_contract(&self) -> bool {
        matches!(self, HubError::Contract { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, HubError::Conflict { .. })
    }

    pub fn is_handler_failure(&self) -> bool {
        matches!(self, HubError::Handler { .. })
    }
}
