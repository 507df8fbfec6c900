//! Values exchanged during a dispatch

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Arguments an event is emitted with
pub type Args = Vec<Value>;

/// Outcome of a successful emission: the arguments the event was emitted
/// with and every handler's result, in registration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    args: Args,
    results: Vec<Value>,
}

impl DispatchResult {
    pub fn new(args: Args, results: Vec<Value>) -> Self {
        Self { args, results }
    }

    /// Result for an emission nobody listened to
    pub fn unheard(args: Args) -> Self {
        Self::new(args, Vec::new())
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn results(&self) -> &[Value] {
        &self.results
    }

    /// Number of handlers that produced a result
    pub fn handler_count(&self) -> usize {
        self.results.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unheard_has_no_results() {
        let result = DispatchResult::unheard(vec![json!(42)]);
        assert_eq!(result.args(), &[json!(42)]);
        assert!(result.results().is_empty());
        assert_eq!(result.handler_count(), 0);
    }

    #[test]
    fn test_serializes_both_halves() {
        let result = DispatchResult::new(vec![json!("a")], vec![json!(1), json!(2)]);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({ "args": ["a"], "results": [1, 2] }));
    }
}
