use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Description of a handler for listings and diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerSpec {
    pub namespace: String,
    pub action: String,
    pub description: String,
}

/// The unit of work behind one plan step.
///
/// Every handler honors the same two-argument contract: it receives the
/// entire original request (never just the previous step's output) plus the
/// full ordered history of prior results, and returns one opaque result
/// value or fails. No other arity exists.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Namespace this handler lives under (first half of the step key).
    fn namespace(&self) -> &str;

    /// Action name within the namespace (second half of the step key).
    fn action(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Execute the handler against the original request and the results of
    /// all previously completed steps, in plan order.
    async fn execute(&self, request: &Value, results_so_far: &[Value]) -> anyhow::Result<Value>;

    /// Full spec for registry listings.
    fn spec(&self) -> HandlerSpec {
        HandlerSpec {
            namespace: self.namespace().to_string(),
            action: self.action().to_string(),
            description: self.description().to_string(),
        }
    }
}
