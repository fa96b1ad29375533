use super::traits::Handler;
use crate::store::DocumentStore;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

/// `create.character` — persist `request.data` as a new document and
/// return the generated id.
pub struct CreateCharacterHandler {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl CreateCharacterHandler {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }
}

#[async_trait]
impl Handler for CreateCharacterHandler {
    fn namespace(&self) -> &str {
        "create"
    }

    fn action(&self) -> &str {
        "character"
    }

    fn description(&self) -> &str {
        "Persist request.data as a new character document."
    }

    async fn execute(&self, request: &Value, _results: &[Value]) -> anyhow::Result<Value> {
        let data = request
            .get("data")
            .and_then(Value::as_object)
            .ok_or_else(|| anyhow::anyhow!("Missing 'data' object in request"))?;

        let id = self
            .store
            .create(&self.collection, Value::Object(data.clone()))
            .await?;

        Ok(json!({
            "status": "success",
            "message": "Character created successfully.",
            "character_id": id,
        }))
    }
}
