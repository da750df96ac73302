//! Consumer resource emulator
//!
//! Wraps one [`ResourceStore`] with the consumer family's policy: at least
//! one of `username` and `custom_id` is required and both are
//! uniqueness-constrained. Basic-auth credentials nested under a consumer
//! are reached through [`ConsumerAdminSimulator::basic_auth`].

use crate::contract::{ConsumerAdmin, ConsumerFilter};
use crate::error::KongError;
use crate::simulator::basic_auth::BasicAuthAdminSimulator;
use crate::store::{ListPage, ResourceStore};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Fields omitted from consumer responses when equal to their default
fn consumer_defaults() -> Map<String, Value> {
    let mut defaults = Map::new();
    defaults.insert("username".to_string(), Value::Null);
    defaults.insert("custom_id".to_string(), Value::Null);
    defaults
}

/// Store-backed emulator for the `/consumers/` family
pub struct ConsumerAdminSimulator {
    base_url: String,
    store: ResourceStore,
    /// Per-parent credential stores, created lazily on first access
    credential_stores: Mutex<HashMap<String, Arc<ResourceStore>>>,
}

impl ConsumerAdminSimulator {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let store = ResourceStore::new(
            &format!("{base_url}/consumers/"),
            &["username", "custom_id"],
            consumer_defaults(),
        );
        Self {
            base_url,
            store,
            credential_stores: Mutex::new(HashMap::new()),
        }
    }

    /// Basic-auth credential administration scoped to one consumer.
    ///
    /// Resolves the parent by username or id; `None` when no such consumer
    /// exists. Each parent gets its own store, so credential usernames are
    /// unique per consumer.
    pub fn basic_auth(&self, username_or_id: &str) -> Option<BasicAuthAdminSimulator> {
        let consumer = self.store.retrieve(username_or_id, "username")?;
        let consumer_id = consumer.get("id")?.as_str()?.to_string();

        let store = {
            let mut stores = self.credential_stores.lock().unwrap();
            stores
                .entry(consumer_id.clone())
                .or_insert_with(|| {
                    Arc::new(ResourceStore::new(
                        &format!("{}/consumers/{}/basic-auth/", self.base_url, consumer_id),
                        &["username"],
                        Map::new(),
                    ))
                })
                .clone()
        };

        Some(BasicAuthAdminSimulator::new(consumer_id, store))
    }

    /// Drop every consumer and all nested credentials (test support)
    pub fn clear(&self) {
        self.store.clear();
        self.credential_stores.lock().unwrap().clear();
    }
}

#[async_trait]
impl ConsumerAdmin for ConsumerAdminSimulator {
    async fn create(
        &self,
        username: Option<&str>,
        custom_id: Option<&str>,
    ) -> Result<Value, KongError> {
        if username.is_none() && custom_id.is_none() {
            return Err(KongError::Validation(
                "at least one of username and custom_id is required".into(),
            ));
        }

        let mut record = Map::new();
        if let Some(username) = username {
            record.insert("username".to_string(), json!(username));
        }
        if let Some(custom_id) = custom_id {
            record.insert("custom_id".to_string(), json!(custom_id));
        }
        record.insert("created_at".to_string(), json!(chrono::Utc::now().timestamp()));

        self.store.create(Value::Object(record))
    }

    async fn retrieve(&self, username_or_id: &str) -> Result<Option<Value>, KongError> {
        Ok(self.store.retrieve(username_or_id, "username"))
    }

    async fn list(
        &self,
        filter: &ConsumerFilter,
        size: usize,
        offset: Option<&str>,
    ) -> Result<ListPage, KongError> {
        let constraints = [
            ("id", filter.id.as_deref()),
            ("custom_id", filter.custom_id.as_deref()),
            ("username", filter.username.as_deref()),
        ];
        self.store.list(size, offset, &constraints)
    }

    async fn update(&self, username_or_id: &str, fields: Value) -> Result<Option<Value>, KongError> {
        self.store.update(username_or_id, "username", fields)
    }

    async fn delete(&self, username_or_id: &str) -> Result<(), KongError> {
        if let Some(consumer) = self.store.retrieve(username_or_id, "username") {
            if let Some(consumer_id) = consumer.get("id").and_then(Value::as_str) {
                self.credential_stores.lock().unwrap().remove(consumer_id);
            }
        }
        self.store.delete(username_or_id, "username");
        Ok(())
    }

    async fn count(&self) -> Result<u64, KongError> {
        Ok(self.store.count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulator() -> ConsumerAdminSimulator {
        ConsumerAdminSimulator::new("http://localhost:8001")
    }

    #[tokio::test]
    async fn create_requires_username_or_custom_id() {
        let consumers = simulator();
        let err = consumers.create(None, None).await.unwrap_err();
        assert!(matches!(err, KongError::Validation(_)));
    }

    #[tokio::test]
    async fn absent_alternate_fields_stay_absent_in_output() {
        let consumers = simulator();
        let consumer = consumers.create(None, Some("abc123")).await.unwrap();
        assert_eq!(consumer["custom_id"], "abc123");
        assert!(consumer.get("username").is_none());
        assert!(consumer["id"].as_str().is_some());
    }

    #[tokio::test]
    async fn duplicate_custom_id_conflicts() {
        let consumers = simulator();
        consumers.create(Some("alice"), Some("abc123")).await.unwrap();
        let err = consumers.create(Some("bob"), Some("abc123")).await.unwrap_err();
        match err {
            KongError::Conflict { fields } => {
                assert_eq!(fields, vec![("custom_id".to_string(), json!("abc123"))]);
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        assert_eq!(consumers.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn retrieve_by_username_or_id() {
        let consumers = simulator();
        let consumer = consumers.create(Some("alice"), None).await.unwrap();
        let id = consumer["id"].as_str().unwrap();

        assert_eq!(consumers.retrieve("alice").await.unwrap().unwrap(), consumer);
        assert_eq!(consumers.retrieve(id).await.unwrap().unwrap(), consumer);
        assert!(consumers.retrieve("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn basic_auth_accessor_requires_existing_parent() {
        let consumers = simulator();
        consumers.create(Some("alice"), None).await.unwrap();

        assert!(consumers.basic_auth("alice").is_some());
        assert!(consumers.basic_auth("bob").is_none());
    }
}
