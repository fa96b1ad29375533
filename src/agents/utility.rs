use super::Agent;
use crate::envelope::AgentEnvelope;
use crate::handlers::HandlerRegistry;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

/// The single-step agent: resolves the envelope's step action directly
/// against the handler registry, no plan involved. The action is a dotted
/// `"namespace.action"` key, e.g. `"validate.check"`.
pub struct UtilityAgent {
    registry: Arc<HandlerRegistry>,
}

impl UtilityAgent {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Agent for UtilityAgent {
    fn name(&self) -> &str {
        "utility"
    }

    fn description(&self) -> &str {
        "Run a single handler named by the step action, without a plan."
    }

    async fn run(&self, envelope: AgentEnvelope) -> anyhow::Result<Value> {
        let (namespace, action) = envelope
            .step
            .action
            .split_once('.')
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "utility step action must be 'namespace.action', got '{}'",
                    envelope.step.action
                )
            })?;

        let handler = self.registry.resolve(namespace, action)?;
        let response = handler.execute(&envelope.request, &[]).await?;

        Ok(json!({
            "result": format!(
                "Agent 'utility' received query: '{}'. Sub-agent response: {}",
                envelope.request, response
            ),
            "response": response,
        }))
    }
}
