//! Agent dispatch.
//!
//! An agent is a named entry point above the plan executor. The dispatcher
//! resolves the name against a registry built at process start and invokes
//! the agent with the full request envelope. Its only contract is total
//! fault containment: every outcome — unknown agent, agent failure, even a
//! panic inside the agent — comes back as a structured response, never as a
//! raw fault.

pub mod character;
pub mod utility;

pub use character::CharacterAgent;
pub use utility::UtilityAgent;

use crate::envelope::AgentEnvelope;
use crate::error::AgentError;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

/// A named entry point invoked with the full request envelope.
#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    async fn run(&self, envelope: AgentEnvelope) -> anyhow::Result<Value>;
}

/// Registry of agents, keyed by name. Populated once, then read-only.
#[derive(Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent. Replaces any existing agent with the same name.
    pub fn register(&mut self, agent: Box<dyn Agent>) {
        let agent: Arc<dyn Agent> = Arc::from(agent);
        self.agents.insert(agent.name().to_string(), agent);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Agent>> {
        self.agents.get(name)
    }

    /// Sorted list of registered agent names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.agents.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Route an envelope to the named agent.
    ///
    /// Three outcomes, three shapes: unknown name →
    /// `{"error": "Error importing agent: …"}`; the agent ran but failed
    /// (or panicked) → `{"error": "An error occurred: …"}`; success → the
    /// agent's own return value, passed through unchanged.
    pub async fn dispatch(&self, agent_name: &str, envelope: AgentEnvelope) -> Value {
        info!(
            agent = agent_name,
            action = %envelope.step.action,
            "executing agent"
        );

        let Some(agent) = self.agents.get(agent_name) else {
            let err = AgentError::Resolution(agent_name.to_string());
            error!(error = %err, "agent dispatch failed");
            return json!({"error": err.to_string()});
        };

        // Run on a task of its own so a panicking agent surfaces as a
        // JoinError instead of unwinding through the dispatcher.
        let agent = Arc::clone(agent);
        let handle = tokio::spawn(async move { agent.run(envelope).await });

        match handle.await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                let err = AgentError::Execution(format!("{err:#}"));
                error!(error = %err, "agent dispatch failed");
                json!({"error": err.to_string()})
            }
            Err(join_err) => {
                let err = AgentError::Execution(join_err.to_string());
                error!(error = %err, "agent dispatch failed");
                json!({"error": err.to_string()})
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Step;

    struct PanickingAgent;

    #[async_trait]
    impl Agent for PanickingAgent {
        fn name(&self) -> &str {
            "panicky"
        }

        fn description(&self) -> &str {
            "always panics"
        }

        async fn run(&self, _envelope: AgentEnvelope) -> anyhow::Result<Value> {
            panic!("agent exploded");
        }
    }

    fn envelope_for(agent: &str) -> AgentEnvelope {
        AgentEnvelope {
            request: json!({}),
            step: Step::new(agent, "run"),
            plan: None,
            user_id: "u".into(),
            server_id: "s".into(),
        }
    }

    #[tokio::test]
    async fn unknown_agent_returns_import_error_shape() {
        let registry = AgentRegistry::new();
        let response = registry.dispatch("ghost", envelope_for("ghost")).await;
        let message = response.get("error").and_then(Value::as_str).unwrap();
        assert!(message.starts_with("Error importing agent:"));
        assert!(message.contains("ghost"));
    }

    #[tokio::test]
    async fn panicking_agent_is_contained() {
        let mut registry = AgentRegistry::new();
        registry.register(Box::new(PanickingAgent));

        let response = registry.dispatch("panicky", envelope_for("panicky")).await;
        let message = response.get("error").and_then(Value::as_str).unwrap();
        assert!(message.starts_with("An error occurred:"));
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = AgentRegistry::new();
        registry.register(Box::new(PanickingAgent));
        assert_eq!(registry.names(), vec!["panicky"]);
    }
}
