//! API resource emulator
//!
//! Wraps one [`ResourceStore`] with the API family's policy: a required
//! `target_url` (trailing slash enforced), at least one of `public_dns` and
//! `path`, `name` defaulting to `public_dns`, and uniqueness across `name`,
//! `public_dns`, and `target_url`. Plugin configurations nested under an API
//! are reached through [`ApiAdminSimulator::plugins`].

use crate::contract::{ApiAdmin, ApiFilter};
use crate::error::KongError;
use crate::simulator::plugins::PluginConfigurationAdminSimulator;
use crate::store::{ListPage, ResourceStore};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Fields omitted from API responses when equal to their default
fn api_defaults() -> Map<String, Value> {
    let mut defaults = Map::new();
    defaults.insert("strip_path".to_string(), json!(false));
    defaults.insert("path".to_string(), Value::Null);
    defaults.insert("public_dns".to_string(), Value::Null);
    defaults
}

/// Fields omitted from plugin-configuration responses when equal to their
/// default
fn plugin_defaults() -> Map<String, Value> {
    let mut defaults = Map::new();
    defaults.insert("consumer_id".to_string(), Value::Null);
    defaults
}

/// Append a trailing slash if the URL lacks one
pub(crate) fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// Store-backed emulator for the `/apis/` family
pub struct ApiAdminSimulator {
    base_url: String,
    store: ResourceStore,
    /// Per-parent plugin stores, created lazily on first access
    plugin_stores: Mutex<HashMap<String, Arc<ResourceStore>>>,
}

impl ApiAdminSimulator {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let store = ResourceStore::new(
            &format!("{base_url}/apis/"),
            &["name", "public_dns", "target_url"],
            api_defaults(),
        );
        Self {
            base_url,
            store,
            plugin_stores: Mutex::new(HashMap::new()),
        }
    }

    /// Plugin-configuration administration scoped to one API.
    ///
    /// Resolves the parent by name or id; `None` when no such API exists.
    /// Each parent gets its own store, so plugin-name uniqueness holds per
    /// API rather than across the gateway.
    pub fn plugins(&self, api_name_or_id: &str) -> Option<PluginConfigurationAdminSimulator> {
        let api = self.store.retrieve(api_name_or_id, "name")?;
        let api_id = api.get("id")?.as_str()?.to_string();

        let store = {
            let mut stores = self.plugin_stores.lock().unwrap();
            stores
                .entry(api_id.clone())
                .or_insert_with(|| {
                    Arc::new(ResourceStore::new(
                        &format!("{}/apis/{}/plugins/", self.base_url, api_id),
                        &["name"],
                        plugin_defaults(),
                    ))
                })
                .clone()
        };

        Some(PluginConfigurationAdminSimulator::new(api_id, store))
    }

    /// Drop every API and all nested plugin configurations (test support)
    pub fn clear(&self) {
        self.store.clear();
        self.plugin_stores.lock().unwrap().clear();
    }
}

#[async_trait]
impl ApiAdmin for ApiAdminSimulator {
    async fn add(
        &self,
        target_url: &str,
        name: Option<&str>,
        public_dns: Option<&str>,
        path: Option<&str>,
        strip_path: bool,
    ) -> Result<Value, KongError> {
        if target_url.is_empty() {
            return Err(KongError::Validation("target_url is required".into()));
        }
        if public_dns.is_none() && path.is_none() {
            return Err(KongError::Validation(
                "at least one of public_dns and path is required".into(),
            ));
        }

        let mut record = Map::new();
        record.insert(
            "target_url".to_string(),
            json!(ensure_trailing_slash(target_url)),
        );
        if let Some(name) = name.or(public_dns) {
            record.insert("name".to_string(), json!(name));
        }
        if let Some(public_dns) = public_dns {
            record.insert("public_dns".to_string(), json!(public_dns));
        }
        if let Some(path) = path {
            record.insert("path".to_string(), json!(path));
        }
        record.insert("strip_path".to_string(), json!(strip_path));
        record.insert("created_at".to_string(), json!(chrono::Utc::now().timestamp()));

        self.store.create(Value::Object(record))
    }

    async fn retrieve(&self, name_or_id: &str) -> Result<Option<Value>, KongError> {
        Ok(self.store.retrieve(name_or_id, "name"))
    }

    async fn list(
        &self,
        filter: &ApiFilter,
        size: usize,
        offset: Option<&str>,
    ) -> Result<ListPage, KongError> {
        let constraints = [
            ("id", filter.id.as_deref()),
            ("name", filter.name.as_deref()),
            ("public_dns", filter.public_dns.as_deref()),
            ("target_url", filter.target_url.as_deref()),
        ];
        self.store.list(size, offset, &constraints)
    }

    async fn update(&self, name_or_id: &str, mut fields: Value) -> Result<Option<Value>, KongError> {
        // The remote service normalizes target_url on update as well
        if let Some(target_url) = fields.get("target_url").and_then(Value::as_str) {
            let normalized = ensure_trailing_slash(target_url);
            fields["target_url"] = json!(normalized);
        }
        self.store.update(name_or_id, "name", fields)
    }

    async fn delete(&self, name_or_id: &str) -> Result<(), KongError> {
        if let Some(api) = self.store.retrieve(name_or_id, "name") {
            if let Some(api_id) = api.get("id").and_then(Value::as_str) {
                self.plugin_stores.lock().unwrap().remove(api_id);
            }
        }
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

    fn simulator() -> ApiAdminSimulator {
        ApiAdminSimulator::new("http://localhost:8001")
    }

    #[tokio::test]
    async fn add_requires_public_dns_or_path() {
        let apis = simulator();
        let err = apis
            .add("http://mockbin.com", Some("Mockbin"), None, None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, KongError::Validation(_)));
        assert_eq!(apis.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn add_normalizes_target_url_and_defaults_name() {
        let apis = simulator();
        let api = apis
            .add("http://mockbin.com", None, Some("mockbin.com"), None, false)
            .await
            .unwrap();
        assert_eq!(api["target_url"], "http://mockbin.com/");
        assert_eq!(api["name"], "mockbin.com");
        assert!(api["created_at"].as_i64().is_some());
    }

    #[tokio::test]
    async fn strip_path_false_is_projected_out() {
        let apis = simulator();
        let api = apis
            .add("http://mockbin.com", Some("Mockbin"), Some("mockbin.com"), None, false)
            .await
            .unwrap();
        assert!(api.get("strip_path").is_none());
        assert!(api.get("path").is_none());

        let updated = apis
            .update("Mockbin", json!({"strip_path": true}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["strip_path"], true);
    }

    #[tokio::test]
    async fn update_normalizes_target_url() {
        let apis = simulator();
        apis.add("http://mockbin.com", Some("Mockbin"), Some("mockbin.com"), None, false)
            .await
            .unwrap();
        let updated = apis
            .update("Mockbin", json!({"target_url": "http://mockbin2.com"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["target_url"], "http://mockbin2.com/");
    }

    #[tokio::test]
    async fn plugins_accessor_resolves_parent_by_name_or_id() {
        let apis = simulator();
        let api = apis
            .add("http://mockbin.com", Some("Mockbin"), Some("mockbin.com"), None, false)
            .await
            .unwrap();
        let id = api["id"].as_str().unwrap();

        assert!(apis.plugins("Mockbin").is_some());
        assert!(apis.plugins(id).is_some());
        assert!(apis.plugins("missing").is_none());
    }

    #[tokio::test]
    async fn deleting_an_api_drops_its_plugin_store() {
        use crate::contract::PluginConfigurationAdmin;

        let apis = simulator();
        apis.add("http://mockbin.com", Some("Mockbin"), Some("mockbin.com"), None, false)
            .await
            .unwrap();
        let plugins = apis.plugins("Mockbin").unwrap();
        plugins
            .create("ratelimiting", json!({"limit": 20}), None)
            .await
            .unwrap();

        apis.delete("Mockbin").await.unwrap();
        assert!(apis.plugins("Mockbin").is_none());
        assert!(apis.plugin_stores.lock().unwrap().is_empty());
    }
}
