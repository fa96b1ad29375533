//! Generic document-store facade.
//!
//! The engine is storage-agnostic: handlers talk to a narrow CRUD trait
//! keyed by collection name and equality filter. The default backend keeps
//! documents in memory; swapping in a real database is a matter of
//! implementing [`DocumentStore`].

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// CRUD over named collections of JSON documents.
///
/// `create` returns the generated document id; updates and deletes return
/// the affected-document count.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create(&self, collection: &str, document: Value) -> anyhow::Result<String>;

    async fn read_one(&self, collection: &str, filter: &Value) -> anyhow::Result<Option<Value>>;

    async fn read_many(&self, collection: &str, filter: &Value) -> anyhow::Result<Vec<Value>>;

    async fn update_many(
        &self,
        collection: &str,
        filter: &Value,
        update: &Value,
    ) -> anyhow::Result<u64>;

    async fn delete_many(&self, collection: &str, filter: &Value) -> anyhow::Result<u64>;
}

/// In-memory backend. Collections are created lazily on first write.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A document matches when every filter field is present with an equal
/// value. An empty filter matches everything.
fn matches(document: &Value, filter: &Value) -> bool {
    match filter.as_object() {
        Some(fields) => fields
            .iter()
            .all(|(key, expected)| document.get(key) == Some(expected)),
        None => true,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, mut document: Value) -> anyhow::Result<String> {
        let id = Uuid::new_v4().to_string();
        if let Some(fields) = document.as_object_mut() {
            fields.insert("_id".into(), Value::String(id.clone()));
        } else {
            anyhow::bail!("document must be a JSON object");
        }

        let mut collections = self.collections.write().await;
        collections.entry(collection.to_string()).or_default().push(document);
        Ok(id)
    }

    async fn read_one(&self, collection: &str, filter: &Value) -> anyhow::Result<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| matches(doc, filter)).cloned()))
    }

    async fn read_many(&self, collection: &str, filter: &Value) -> anyhow::Result<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| matches(doc, filter)).cloned().collect())
            .unwrap_or_default())
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: &Value,
        update: &Value,
    ) -> anyhow::Result<u64> {
        let Some(update_fields) = update.as_object() else {
            anyhow::bail!("update must be a JSON object");
        };

        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let mut affected = 0;
        for doc in docs.iter_mut() {
            if matches(doc, filter) {
                if let Some(fields) = doc.as_object_mut() {
                    for (key, value) in update_fields {
                        fields.insert(key.clone(), value.clone());
                    }
                    affected += 1;
                }
            }
        }
        Ok(affected)
    }

    async fn delete_many(&self, collection: &str, filter: &Value) -> anyhow::Result<u64> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = docs.len();
        docs.retain(|doc| !matches(doc, filter));
        Ok((before - docs.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn create_assigns_an_id() {
        let store = MemoryStore::new();
        let id = store
            .create("characters", json!({"name": "Gandalf", "level": 99}))
            .await
            .unwrap();
        assert!(!id.is_empty());

        let doc = store
            .read_one("characters", &json!({"name": "Gandalf"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.get("_id").and_then(Value::as_str), Some(id.as_str()));
    }

    #[tokio::test]
    async fn filters_are_equality_over_all_fields() {
        let store = MemoryStore::new();
        store.create("c", json!({"class": "mage", "level": 1})).await.unwrap();
        store.create("c", json!({"class": "mage", "level": 2})).await.unwrap();
        store.create("c", json!({"class": "rogue", "level": 1})).await.unwrap();

        let mages = store.read_many("c", &json!({"class": "mage"})).await.unwrap();
        assert_eq!(mages.len(), 2);

        let exact = store
            .read_many("c", &json!({"class": "mage", "level": 2}))
            .await
            .unwrap();
        assert_eq!(exact.len(), 1);
    }

    #[tokio::test]
    async fn update_and_delete_report_affected_counts() {
        let store = MemoryStore::new();
        store.create("c", json!({"class": "mage"})).await.unwrap();
        store.create("c", json!({"class": "mage"})).await.unwrap();

        let updated = store
            .update_many("c", &json!({"class": "mage"}), &json!({"level": 10}))
            .await
            .unwrap();
        assert_eq!(updated, 2);

        let deleted = store.delete_many("c", &json!({"level": 10})).await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.read_many("c", &json!({})).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn missing_collection_is_empty_not_an_error() {
        let store = MemoryStore::new();
        assert!(store.read_one("nope", &json!({})).await.unwrap().is_none());
        assert_eq!(store.delete_many("nope", &json!({})).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn non_object_document_is_rejected() {
        let store = MemoryStore::new();
        assert!(store.create("c", json!([1, 2])).await.is_err());
    }
}
