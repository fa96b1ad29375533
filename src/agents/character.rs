use super::Agent;
use crate::envelope::AgentEnvelope;
use crate::executor::PlanExecutor;
use crate::handlers::HandlerRegistry;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

/// The multi-step agent: runs the envelope's plan through a plan executor
/// and wraps the outcome in a result message naming the received query.
pub struct CharacterAgent {
    executor: PlanExecutor,
}

impl CharacterAgent {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self {
            executor: PlanExecutor::new(registry),
        }
    }
}

#[async_trait]
impl Agent for CharacterAgent {
    fn name(&self) -> &str {
        "character"
    }

    fn description(&self) -> &str {
        "Execute the envelope's step plan against the handler registry."
    }

    async fn run(&self, envelope: AgentEnvelope) -> anyhow::Result<Value> {
        let plan = envelope.plan.unwrap_or_default();
        let outcome = self.executor.run_plan(&envelope.request, plan).await;
        let outcome = outcome.to_value();

        Ok(json!({
            "result": format!(
                "Agent 'character' received query: '{}'. Sub-agent response: {}",
                envelope.request, outcome
            ),
            "outcome": outcome,
        }))
    }
}
