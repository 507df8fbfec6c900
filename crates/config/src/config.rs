//! Hub configuration
//!
//! `HubConfig` is immutable once handed to a hub and cheap to clone. It only
//! tunes diagnostics; dispatch semantics never depend on it.

use evhub_core::constants::{DEFAULT_HUB_LABEL, DEFAULT_MAX_LISTENERS};
use serde::{Deserialize, Serialize};

/// Settings for a single hub instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HubConfig {
    /// Label attached to every log record the hub emits
    pub label: String,

    /// Warn when a single event name accumulates more listeners than this.
    /// `None` disables the check.
    pub max_listeners: Option<usize>,

    /// Log every dispatch at debug level, not only failures
    pub trace_dispatch: bool,
}

impl HubConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the listener warning threshold
    pub fn with_max_listeners(mut self, max_listeners: Option<usize>) -> Self {
        self.max_listeners = max_listeners;
        self
    }

    /// Enable or disable per-dispatch logging
    pub fn with_trace_dispatch(mut self, trace_dispatch: bool) -> Self {
        self.trace_dispatch = trace_dispatch;
        self
    }

    /// Whether `count` listeners on one event exceeds the configured threshold
    pub fn exceeds_max_listeners(&self, count: usize) -> bool {
        self.max_listeners.is_some_and(|max| count > max)
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_HUB_LABEL.to_string(),
            max_listeners: Some(DEFAULT_MAX_LISTENERS),
            trace_dispatch: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.label, "evhub");
        assert_eq!(config.max_listeners, Some(DEFAULT_MAX_LISTENERS));
        assert!(!config.trace_dispatch);
    }

    #[test]
    fn test_listener_threshold() {
        let config = HubConfig::new().with_max_listeners(Some(2));
        assert!(!config.exceeds_max_listeners(2));
        assert!(config.exceeds_max_listeners(3));

        let unlimited = config.with_max_listeners(None);
        assert!(!unlimited.exceeds_max_listeners(usize::MAX));
    }
}
