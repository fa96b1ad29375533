use super::traits::Handler;
use crate::validate;
use async_trait::async_trait;
use serde_json::{Value, json};

/// `validate.check` — structural validation of `request.data` against
/// `request.schema`. Invalid data fails the step so the rest of the plan
/// never runs against a malformed payload.
pub struct ValidateFieldsHandler;

impl ValidateFieldsHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Handler for ValidateFieldsHandler {
    fn namespace(&self) -> &str {
        "validate"
    }

    fn action(&self) -> &str {
        "check"
    }

    fn description(&self) -> &str {
        "Validate request.data against request.schema field rules."
    }

    async fn execute(&self, request: &Value, _results: &[Value]) -> anyhow::Result<Value> {
        let data = request
            .get("data")
            .ok_or_else(|| anyhow::anyhow!("Missing 'data' in request"))?;
        let schema = request
            .get("schema")
            .ok_or_else(|| anyhow::anyhow!("Missing 'schema' in request"))?;

        let report = validate::validate(data, schema);
        if report.is_valid {
            Ok(json!({"status": "success", "message": "All fields valid."}))
        } else {
            anyhow::bail!(
                "validation failed: {}",
                serde_json::to_string(&report.errors)?
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn valid_data_succeeds() {
        let handler = ValidateFieldsHandler::new();
        let request = json!({"data": {"age": 20}, "schema": {"age": "int"}});
        let out = handler.execute(&request, &[]).await.unwrap();
        assert_eq!(out.get("status").and_then(Value::as_str), Some("success"));
    }

    #[tokio::test]
    async fn invalid_data_fails_with_field_errors() {
        let handler = ValidateFieldsHandler::new();
        let request = json!({"data": {"age": "20"}, "schema": {"age": "int"}});
        let err = handler.execute(&request, &[]).await.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("validation failed"));
        assert!(text.contains("age"));
    }

    #[tokio::test]
    async fn missing_schema_fails() {
        let handler = ValidateFieldsHandler::new();
        let err = handler
            .execute(&json!({"data": {}}), &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'schema'"));
    }
}
