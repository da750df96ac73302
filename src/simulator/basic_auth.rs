//! Basic-auth credential emulator
//!
//! Scoped to one parent consumer: handed out by
//! [`crate::simulator::ConsumerAdminSimulator::basic_auth`] with the
//! parent's resolved id. Credentials are stamped with `consumer_id` and the
//! username is unique within the parent's scope.

use crate::contract::{BasicAuthAdmin, BasicAuthFilter};
use crate::error::KongError;
use crate::store::{ListPage, ResourceStore};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Store-backed emulator for `/consumers/{consumer}/basic-auth/`
pub struct BasicAuthAdminSimulator {
    consumer_id: String,
    store: Arc<ResourceStore>,
}

impl BasicAuthAdminSimulator {
    pub(crate) fn new(consumer_id: String, store: Arc<ResourceStore>) -> Self {
        Self { consumer_id, store }
    }

    /// Id of the consumer this emulator is scoped to
    pub fn consumer_id(&self) -> &str {
        &self.consumer_id
    }
}

#[async_trait]
impl BasicAuthAdmin for BasicAuthAdminSimulator {
    async fn create(&self, username: &str, password: Option<&str>) -> Result<Value, KongError> {
        if username.is_empty() {
            return Err(KongError::Validation("username is required".into()));
        }

        let mut record = Map::new();
        record.insert("username".to_string(), json!(username));
        if let Some(password) = password {
            record.insert("password".to_string(), json!(password));
        }
        record.insert("consumer_id".to_string(), json!(self.consumer_id));
        record.insert("created_at".to_string(), json!(chrono::Utc::now().timestamp()));

        self.store.create(Value::Object(record))
    }

    async fn retrieve(&self, username_or_id: &str) -> Result<Option<Value>, KongError> {
        Ok(self.store.retrieve(username_or_id, "username"))
    }

    async fn list(
        &self,
        filter: &BasicAuthFilter,
        size: usize,
        offset: Option<&str>,
    ) -> Result<ListPage, KongError> {
        let constraints = [
            ("id", filter.id.as_deref()),
            ("username", filter.username.as_deref()),
            ("consumer_id", Some(self.consumer_id.as_str())),
        ];
        self.store.list(size, offset, &constraints)
    }

    async fn update(&self, username_or_id: &str, fields: Value) -> Result<Option<Value>, KongError> {
        self.store.update(username_or_id, "username", fields)
    }

    async fn delete(&self, username_or_id: &str) -> Result<(), KongError> {
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
    use crate::contract::ConsumerAdmin;
    use crate::simulator::ConsumerAdminSimulator;

    async fn parent() -> ConsumerAdminSimulator {
        let consumers = ConsumerAdminSimulator::new("http://localhost:8001");
        consumers.create(Some("alice"), None).await.unwrap();
        consumers
    }

    #[tokio::test]
    async fn create_stamps_parent_consumer_id() {
        let consumers = parent().await;
        let credentials = consumers.basic_auth("alice").unwrap();

        let credential = credentials.create("alice", Some("secret")).await.unwrap();
        assert_eq!(credential["consumer_id"].as_str().unwrap(), credentials.consumer_id());
        assert_eq!(credential["username"], "alice");
        assert!(credential["created_at"].as_i64().is_some());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts_within_parent() {
        let consumers = parent().await;
        let credentials = consumers.basic_auth("alice").unwrap();

        credentials.create("alice", Some("secret")).await.unwrap();
        let err = credentials.create("alice", Some("other")).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(credentials.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn credentials_are_independent_across_consumers() {
        let consumers = parent().await;
        consumers.create(Some("bob"), None).await.unwrap();

        let alice = consumers.basic_auth("alice").unwrap();
        let bob = consumers.basic_auth("bob").unwrap();
        alice.create("shared-login", None).await.unwrap();
        bob.create("shared-login", None).await.unwrap();

        assert_eq!(alice.count().await.unwrap(), 1);
        assert_eq!(bob.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_rotates_password_in_place() {
        let consumers = parent().await;
        let credentials = consumers.basic_auth("alice").unwrap();
        credentials.create("alice", Some("secret")).await.unwrap();

        let updated = credentials
            .update("alice", json!({"password": "rotated"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["password"], "rotated");
        assert_eq!(updated["username"], "alice");
    }
}
