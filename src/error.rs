use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `agentflow`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide how to report a failure; handler internals continue to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum FlowError {
    // ── Handler resolution / execution ──────────────────────────────────
    #[error("handler: {0}")]
    Handler(#[from] HandlerError),

    // ── Plan execution ──────────────────────────────────────────────────
    #[error("plan: {0}")]
    Plan(#[from] PlanError),

    // ── Agent dispatch ──────────────────────────────────────────────────
    #[error("agent: {0}")]
    Agent(#[from] AgentError),

    // ── Config ──────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Handler errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum HandlerError {
    /// The namespace itself is unknown to the registry.
    #[error("handler not found for '{namespace}.{action}'")]
    NotFound { namespace: String, action: String },

    /// The namespace is registered but exposes no such action. Mirrors a
    /// deployment defect: the location exists, the entry point does not.
    #[error("namespace '{namespace}' exposes no entry point for action '{action}'")]
    Contract { namespace: String, action: String },

    #[error("handler '{namespace}.{action}' failed: {message}")]
    Execution {
        namespace: String,
        action: String,
        message: String,
    },
}

// ─── Plan errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PlanError {
    /// An empty plan is a caller error, never a vacuous success.
    #[error("No plan found in the request.")]
    Empty,

    /// A step failed, either during resolution or execution. `position` is
    /// 1-based so the message matches what operators see in the plan.
    #[error("error executing step {position} ({namespace}.{action}): {source}")]
    Step {
        position: usize,
        namespace: String,
        action: String,
        #[source]
        source: HandlerError,
    },

    /// The driver asked for another transition after the plan was exhausted.
    /// A bug in the calling layer, not in the plan.
    #[error("plan finished, but driver continued")]
    DriverInvariant,
}

impl PlanError {
    /// 1-based position of the failing step, when the error is step-scoped.
    pub fn step_position(&self) -> Option<usize> {
        match self {
            Self::Step { position, .. } => Some(*position),
            _ => None,
        }
    }
}

// ─── Agent errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Error importing agent: no agent registered under '{0}'")]
    Resolution(String),

    #[error("An error occurred: {0}")]
    Execution(String),
}

// ─── Config errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("failed to save config: {0}")]
    Save(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, FlowError>;
