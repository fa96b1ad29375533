use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One unit of work inside a plan: a (namespace, action) pair naming a
/// handler. Identity is the pair itself, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    pub namespace: String,
    pub action: String,
}

impl Step {
    pub fn new(namespace: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            action: action.into(),
        }
    }

    /// Canonical registry key, `"namespace.action"`.
    pub fn key(&self) -> String {
        format!("{}.{}", self.namespace, self.action)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.action)
    }
}

/// Ordered list of steps. Immutable once built; the executor advances a
/// cursor over it and never reorders or rewrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan {
    steps: Vec<Step>,
}

impl Plan {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }
}

/// Inbound request envelope, as received from the transport layer.
///
/// `request` is the opaque business payload; `step` names the immediate
/// target (at agent granularity the namespace is the agent name); `plan` is
/// the optional multi-step plan; the identity fields are passed through
/// unmodified and never interpreted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentEnvelope {
    pub request: Value,
    pub step: Step,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub server_id: String,
}

impl AgentEnvelope {
    /// Agent name addressed by this envelope.
    pub fn agent_name(&self) -> &str {
        &self.step.namespace
    }
}
