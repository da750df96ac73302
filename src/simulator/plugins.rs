//! Plugin-configuration emulator
//!
//! Scoped to one parent API: handed out by
//! [`crate::simulator::ApiAdminSimulator::plugins`] with the parent's
//! resolved id, and backed by that parent's own store. Records are stamped
//! with `api_id` and lists are constrained to the parent's scope.

use crate::contract::{PluginConfigurationAdmin, PluginFilter};
use crate::error::KongError;
use crate::store::{ListPage, ResourceStore};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Store-backed emulator for `/apis/{api}/plugins/`
pub struct PluginConfigurationAdminSimulator {
    api_id: String,
    store: Arc<ResourceStore>,
}

impl PluginConfigurationAdminSimulator {
    pub(crate) fn new(api_id: String, store: Arc<ResourceStore>) -> Self {
        Self { api_id, store }
    }

    /// Id of the API this emulator is scoped to
    pub fn api_id(&self) -> &str {
        &self.api_id
    }
}

#[async_trait]
impl PluginConfigurationAdmin for PluginConfigurationAdminSimulator {
    async fn create(
        &self,
        name: &str,
        value: Value,
        consumer_id: Option<&str>,
    ) -> Result<Value, KongError> {
        if name.is_empty() {
            return Err(KongError::Validation("plugin name is required".into()));
        }
        if !value.is_object() {
            return Err(KongError::Validation(
                "plugin value must be a JSON object".into(),
            ));
        }

        let mut record = Map::new();
        record.insert("name".to_string(), json!(name));
        record.insert("value".to_string(), value);
        record.insert("api_id".to_string(), json!(self.api_id));
        if let Some(consumer_id) = consumer_id {
            record.insert("consumer_id".to_string(), json!(consumer_id));
        }
        record.insert("created_at".to_string(), json!(chrono::Utc::now().timestamp()));

        self.store.create(Value::Object(record))
    }

    async fn retrieve(&self, name_or_id: &str) -> Result<Option<Value>, KongError> {
        Ok(self.store.retrieve(name_or_id, "name"))
    }

    async fn list(
        &self,
        filter: &PluginFilter,
        size: usize,
        offset: Option<&str>,
    ) -> Result<ListPage, KongError> {
        let constraints = [
            ("id", filter.id.as_deref()),
            ("name", filter.name.as_deref()),
            ("consumer_id", filter.consumer_id.as_deref()),
            ("api_id", Some(self.api_id.as_str())),
        ];
        self.store.list(size, offset, &constraints)
    }

    async fn update(&self, name_or_id: &str, fields: Value) -> Result<Option<Value>, KongError> {
        self.store.update(name_or_id, "name", fields)
    }

    async fn delete(&self, name_or_id: &str) -> Result<(), KongError> {
        self.store.delete(name_or_id, "name");
        Ok(())
    }

    async fn count(&self) -> Result<u64, KongError> {
        Ok(self.store.count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ApiAdmin;
    use crate::simulator::ApiAdminSimulator;

    async fn parent_with_plugins() -> (ApiAdminSimulator, String) {
        let apis = ApiAdminSimulator::new("http://localhost:8001");
        apis.add("http://mockbin.com", Some("Mockbin"), Some("mockbin.com"), None, false)
            .await
            .unwrap();
        (apis, "Mockbin".to_string())
    }

    #[tokio::test]
    async fn create_stamps_parent_api_id() {
        let (apis, name) = parent_with_plugins().await;
        let plugins = apis.plugins(&name).unwrap();

        let plugin = plugins
            .create("ratelimiting", json!({"limit": 20, "period": "minute"}), None)
            .await
            .unwrap();
        assert_eq!(plugin["api_id"].as_str().unwrap(), plugins.api_id());
        assert_eq!(plugin["value"]["limit"], 20);
        assert!(plugin.get("consumer_id").is_none());
    }

    #[tokio::test]
    async fn plugin_names_are_unique_per_parent_only() {
        let apis = ApiAdminSimulator::new("http://localhost:8001");
        apis.add("http://a.com", Some("A"), Some("a.com"), None, false)
            .await
            .unwrap();
        apis.add("http://b.com", Some("B"), Some("b.com"), None, false)
            .await
            .unwrap();

        let plugins_a = apis.plugins("A").unwrap();
        let plugins_b = apis.plugins("B").unwrap();

        plugins_a
            .create("ratelimiting", json!({"limit": 20}), None)
            .await
            .unwrap();
        // Same plugin on a different API is fine
        plugins_b
            .create("ratelimiting", json!({"limit": 300}), None)
            .await
            .unwrap();
        // Same plugin on the same API conflicts
        let err = plugins_a
            .create("ratelimiting", json!({"limit": 50}), None)
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(plugins_a.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_is_scoped_to_the_parent() {
        let (apis, name) = parent_with_plugins().await;
        let plugins = apis.plugins(&name).unwrap();
        plugins
            .create("ratelimiting", json!({"limit": 20}), None)
            .await
            .unwrap();

        let page = plugins.list(&PluginFilter::default(), 100, None).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0]["api_id"].as_str().unwrap(), plugins.api_id());
    }

    #[tokio::test]
    async fn update_merges_plugin_value() {
        let (apis, name) = parent_with_plugins().await;
        let plugins = apis.plugins(&name).unwrap();
        plugins
            .create("ratelimiting", json!({"limit": 20, "period": "minute"}), None)
            .await
            .unwrap();

        let updated = plugins
            .update("ratelimiting", json!({"value": {"limit": 50, "period": "second"}}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["value"]["limit"], 50);
        assert_eq!(updated["name"], "ratelimiting");
    }
}
