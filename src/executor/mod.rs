//! Plan execution state machine.
//!
//! One [`ExecutionState`] per run, owned exclusively by that run. The
//! executor drives it one step per transition: resolve the step's handler,
//! invoke it with the original request plus the full result history, append
//! the result, advance the cursor. The first failure freezes the state;
//! subsequent drives are no-ops.

use crate::envelope::Plan;
use crate::error::{HandlerError, PlanError};
use crate::handlers::HandlerRegistry;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Mutable record threaded through one plan run.
///
/// Invariant: `results.len() == cursor` while no error is set; once an
/// error is set, cursor and results freeze. `cursor` never exceeds the plan
/// length.
pub struct ExecutionState {
    plan: Plan,
    original_request: Value,
    cursor: usize,
    results: Vec<Value>,
    error: Option<PlanError>,
}

impl ExecutionState {
    pub fn new(original_request: Value, plan: Plan) -> Self {
        Self {
            plan,
            original_request,
            cursor: 0,
            results: Vec::new(),
            error: None,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn results(&self) -> &[Value] {
        &self.results
    }

    pub fn error(&self) -> Option<&PlanError> {
        self.error.as_ref()
    }

    /// Terminal when an error is set or the plan is exhausted.
    pub fn is_terminal(&self) -> bool {
        self.error.is_some() || self.cursor >= self.plan.len()
    }

    fn into_outcome(self) -> PlanOutcome {
        match self.error {
            Some(error) => PlanOutcome::Failed {
                error,
                results: self.results,
            },
            None => PlanOutcome::Completed(self.results),
        }
    }
}

/// Terminal snapshot of a plan run: ordered results, or the first error
/// plus the successful prefix that preceded it.
#[derive(Debug)]
pub enum PlanOutcome {
    Completed(Vec<Value>),
    Failed { error: PlanError, results: Vec<Value> },
}

impl PlanOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn results(&self) -> Option<&[Value]> {
        match self {
            Self::Completed(results) => Some(results),
            Self::Failed { .. } => None,
        }
    }

    /// Results accumulated before the terminal condition — the full set on
    /// completion, the successful prefix on failure.
    pub fn results_so_far(&self) -> &[Value] {
        match self {
            Self::Completed(results) | Self::Failed { results, .. } => results,
        }
    }

    pub fn error(&self) -> Option<&PlanError> {
        match self {
            Self::Completed(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }

    /// Wire shape: `{"results": [...]}` or `{"error": "..."}`.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Completed(results) => json!({"results": results}),
            Self::Failed { error, .. } => json!({"error": error.to_string()}),
        }
    }
}

/// Drives `ExecutionState` from cursor 0 to a terminal condition, strictly
/// sequentially. Holds only a shared registry reference; one executor may
/// serve any number of concurrent, isolated runs.
pub struct PlanExecutor {
    registry: Arc<HandlerRegistry>,
}

impl PlanExecutor {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    /// Run a whole plan to its terminal state.
    ///
    /// An empty plan is a caller error, not a vacuous success. Steps run
    /// one at a time: step N+1 never begins before step N's handler has
    /// fully returned, because N+1 may read N's result.
    pub async fn run_plan(&self, original_request: &Value, plan: Plan) -> PlanOutcome {
        if plan.is_empty() {
            return PlanOutcome::Failed {
                error: PlanError::Empty,
                results: Vec::new(),
            };
        }

        let mut state = ExecutionState::new(original_request.clone(), plan);
        while !state.is_terminal() {
            self.drive(&mut state).await;
        }

        match state.error() {
            None => info!(steps = state.results.len(), "plan complete"),
            Some(err) => error!(error = %err, "plan failed"),
        }
        state.into_outcome()
    }

    /// Perform exactly one state-machine transition.
    ///
    /// Driving a failed state is a no-op; driving past the end of the plan
    /// marks a driver invariant violation rather than being swallowed.
    pub async fn drive(&self, state: &mut ExecutionState) {
        if state.error.is_some() {
            return;
        }

        let Some(step) = state.plan.get(state.cursor).cloned() else {
            state.error = Some(PlanError::DriverInvariant);
            return;
        };
        let position = state.cursor + 1;

        debug!(
            step = position,
            total = state.plan.len(),
            namespace = %step.namespace,
            action = %step.action,
            "executing step"
        );

        let handler = match self.registry.resolve(&step.namespace, &step.action) {
            Ok(handler) => handler,
            Err(source) => {
                state.error = Some(PlanError::Step {
                    position,
                    namespace: step.namespace,
                    action: step.action,
                    source,
                });
                return;
            }
        };

        match handler
            .execute(&state.original_request, &state.results)
            .await
        {
            Ok(result) => {
                state.results.push(result);
                state.cursor += 1;
            }
            Err(err) => {
                state.error = Some(PlanError::Step {
                    position,
                    namespace: step.namespace.clone(),
                    action: step.action.clone(),
                    source: HandlerError::Execution {
                        namespace: step.namespace,
                        action: step.action,
                        message: format!("{err:#}"),
                    },
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Step;
    use crate::handlers::Handler;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        namespace: &'static str,
        action: &'static str,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Handler for CountingHandler {
        fn namespace(&self) -> &str {
            self.namespace
        }

        fn action(&self) -> &str {
            self.action
        }

        fn description(&self) -> &str {
            "test double"
        }

        async fn execute(&self, _request: &Value, results: &[Value]) -> anyhow::Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("deliberate failure");
            }
            Ok(json!({"handler": format!("{}.{}", self.namespace, self.action), "seen": results.len()}))
        }
    }

    fn registry_with(handlers: Vec<CountingHandler>) -> Arc<HandlerRegistry> {
        let mut registry = HandlerRegistry::new();
        for handler in handlers {
            registry.register(Box::new(handler));
        }
        Arc::new(registry)
    }

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[tokio::test]
    async fn results_track_cursor_while_running() {
        let calls = counter();
        let registry = registry_with(vec![
            CountingHandler { namespace: "a", action: "one", fail: false, calls: Arc::clone(&calls) },
            CountingHandler { namespace: "a", action: "two", fail: false, calls: Arc::clone(&calls) },
        ]);
        let executor = PlanExecutor::new(registry);

        let plan = Plan::new(vec![Step::new("a", "one"), Step::new("a", "two")]);
        let mut state = ExecutionState::new(json!({}), plan);

        executor.drive(&mut state).await;
        assert_eq!(state.cursor(), 1);
        assert_eq!(state.results().len(), 1);
        assert!(!state.is_terminal());

        executor.drive(&mut state).await;
        assert_eq!(state.cursor(), 2);
        assert_eq!(state.results().len(), 2);
        assert!(state.is_terminal());
        assert!(state.error().is_none());
    }

    #[tokio::test]
    async fn failure_freezes_cursor_and_results() {
        let calls = counter();
        let registry = registry_with(vec![
            CountingHandler { namespace: "a", action: "ok", fail: false, calls: Arc::clone(&calls) },
            CountingHandler { namespace: "a", action: "bad", fail: true, calls: Arc::clone(&calls) },
        ]);
        let executor = PlanExecutor::new(registry);

        let plan = Plan::new(vec![Step::new("a", "ok"), Step::new("a", "bad")]);
        let mut state = ExecutionState::new(json!({}), plan);

        executor.drive(&mut state).await;
        executor.drive(&mut state).await;
        assert_eq!(state.cursor(), 1);
        assert_eq!(state.results().len(), 1);
        assert_eq!(state.error().and_then(PlanError::step_position), Some(2));

        // Driving a failed state is a no-op.
        executor.drive(&mut state).await;
        assert_eq!(state.cursor(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn driving_past_plan_end_is_an_invariant_violation() {
        let calls = counter();
        let registry = registry_with(vec![CountingHandler {
            namespace: "a",
            action: "one",
            fail: false,
            calls,
        }]);
        let executor = PlanExecutor::new(registry);

        let plan = Plan::new(vec![Step::new("a", "one")]);
        let mut state = ExecutionState::new(json!({}), plan);

        executor.drive(&mut state).await;
        assert!(state.is_terminal());

        // A buggy driver keeps going anyway.
        executor.drive(&mut state).await;
        assert!(matches!(state.error(), Some(PlanError::DriverInvariant)));
    }

    #[tokio::test]
    async fn empty_plan_is_an_error() {
        let registry = Arc::new(HandlerRegistry::new());
        let executor = PlanExecutor::new(registry);

        let outcome = executor.run_plan(&json!({}), Plan::default()).await;
        assert!(matches!(outcome.error(), Some(PlanError::Empty)));
        assert_eq!(
            outcome.to_value(),
            json!({"error": "No plan found in the request."})
        );
    }

    #[tokio::test]
    async fn unresolved_step_fails_with_position_and_path() {
        let registry = Arc::new(HandlerRegistry::new());
        let executor = PlanExecutor::new(registry);

        let plan = Plan::new(vec![Step::new("missing_tool", "noop")]);
        let outcome = executor.run_plan(&json!({}), plan).await;

        let error = outcome.error().unwrap();
        assert_eq!(error.step_position(), Some(1));
        assert!(error.to_string().contains("missing_tool.noop"));
    }

    #[tokio::test]
    async fn later_handlers_see_full_history() {
        let calls = counter();
        let registry = registry_with(vec![
            CountingHandler { namespace: "a", action: "one", fail: false, calls: Arc::clone(&calls) },
            CountingHandler { namespace: "a", action: "two", fail: false, calls: Arc::clone(&calls) },
            CountingHandler { namespace: "a", action: "three", fail: false, calls: Arc::clone(&calls) },
        ]);
        let executor = PlanExecutor::new(registry);

        let plan = Plan::new(vec![
            Step::new("a", "one"),
            Step::new("a", "two"),
            Step::new("a", "three"),
        ]);
        let outcome = executor.run_plan(&json!({}), plan).await;

        let results = outcome.results().unwrap();
        assert_eq!(results.len(), 3);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.get("seen"), Some(&json!(i)));
        }
    }
}
