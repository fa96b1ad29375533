#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod agents;
pub mod config;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod store;
pub mod validate;

pub use agents::{Agent, AgentRegistry, CharacterAgent, UtilityAgent};
pub use config::Config;
pub use envelope::{AgentEnvelope, Plan, Step};
pub use error::{AgentError, ConfigError, FlowError, HandlerError, PlanError};
pub use executor::{ExecutionState, PlanExecutor, PlanOutcome};
pub use handlers::{Handler, HandlerRegistry, HandlerSpec};
pub use store::{DocumentStore, MemoryStore};
