//! Newtype wrappers for validated identifiers

use crate::errors::{HubError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display};
use std::ops::Deref;

/// A validated logical (or native) event name.
///
/// Names are compared exactly and case-sensitively. A valid name is
/// non-empty, has no leading or trailing whitespace and contains no control
/// characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventName(String);

impl EventName {
    /// Create a new EventName with validation
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::validate("event_name", name)
    }

    /// Validate `name` on behalf of `operation`, attributing failures to it
    pub fn validate(operation: &'static str, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(HubError::contract(operation, "event name must not be empty"));
        }
        if name.trim() != name {
            return Err(HubError::contract_for(
                operation,
                "event name must not start or end with whitespace",
                name,
            ));
        }
        if name.chars().any(char::is_control) {
            return Err(HubError::contract_for(
                operation,
                "event name must not contain control characters",
                name.escape_debug().to_string(),
            ));
        }
        Ok(EventName(name))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for EventName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for EventName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for EventName {
    type Error = HubError;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for EventName {
    type Error = HubError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<EventName> for String {
    fn from(name: EventName) -> Self {
        name.0
    }
}
