use super::traits::Handler;
use async_trait::async_trait;
use serde_json::{Value, json};

/// `notify.party` — compose a notification from the request and the
/// accumulated step history. Later steps may reference any earlier result,
/// not just the immediately preceding one; this handler leans on that.
pub struct NotifyPartyHandler;

impl NotifyPartyHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Handler for NotifyPartyHandler {
    fn namespace(&self) -> &str {
        "notify"
    }

    fn action(&self) -> &str {
        "party"
    }

    fn description(&self) -> &str {
        "Notify the party about the outcome of earlier steps."
    }

    async fn execute(&self, request: &Value, results_so_far: &[Value]) -> anyhow::Result<Value> {
        let party = request
            .get("party")
            .and_then(Value::as_str)
            .unwrap_or("the party");

        // Surface the most recent character id produced by a prior step,
        // if any step created one.
        let character_id = results_so_far
            .iter()
            .rev()
            .find_map(|result| result.get("character_id").and_then(Value::as_str));

        let message = match character_id {
            Some(id) => format!("Notified {party}: character {id} is ready."),
            None => format!(
                "Notified {party} after {} completed step(s).",
                results_so_far.len()
            ),
        };

        Ok(json!({
            "status": "success",
            "message": message,
            "steps_seen": results_so_far.len(),
        }))
    }
}
