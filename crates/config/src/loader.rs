//! Loading `HubConfig` from JSON documents and the process environment

use crate::config::HubConfig;
use evhub_core::constants::{EVHUB_LABEL_VAR, EVHUB_MAX_LISTENERS_VAR, EVHUB_TRACE_DISPATCH_VAR};
use tracing::debug;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid hub configuration: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("environment variable '{variable}' has invalid value '{value}': {message}")]
    Environment {
        variable: &'static str,
        value: String,
        message: String,
    },
}

impl HubConfig {
    /// Parse a configuration from a JSON document. Missing fields keep their
    /// defaults; unknown fields are rejected.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(document).map_err(|source| ConfigError::Json { source })
    }

    /// Build a configuration from `EVHUB_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup, starting from
    /// the defaults and overriding whatever the lookup provides.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = HubConfig::default();

        if let Some(label) = lookup(EVHUB_LABEL_VAR) {
            config.label = label;
        }

        if let Some(value) = lookup(EVHUB_MAX_LISTENERS_VAR) {
            config.max_listeners = parse_max_listeners(&value)?;
        }

        if let Some(value) = lookup(EVHUB_TRACE_DISPATCH_VAR) {
            config.trace_dispatch = parse_flag(EVHUB_TRACE_DISPATCH_VAR, &value)?;
        }

        debug!(
            label = %config.label,
            max_listeners = ?config.max_listeners,
            trace_dispatch = config.trace_dispatch,
            "Loaded hub configuration from environment"
        );
        Ok(config)
    }
}

// "0", "off" and "none" disable the listener warning
fn parse_max_listeners(value: &str) -> Result<Option<usize>, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "0" | "off" | "none" => Ok(None),
        other => other
            .parse::<usize>()
            .map(Some)
            .map_err(|e| ConfigError::Environment {
                variable: EVHUB_MAX_LISTENERS_VAR,
                value: value.to_string(),
                message: e.to_string(),
            }),
    }
}

fn parse_flag(variable: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Environment {
            variable,
            value: value.to_string(),
            message: "expected a boolean".to_string(),
        }),
    }
}
