//! Network-backed plugin-configuration administration
//!
//! Operates under one parent API's collection path, handed out by
//! [`crate::client::ApiAdminClient::plugins`].

use crate::client::http::KongHttpClient;
use crate::contract::{PluginConfigurationAdmin, PluginFilter};
use crate::error::KongError;
use crate::store::ListPage;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Client for `/apis/{api}/plugins/` on the remote admin API
#[derive(Clone)]
pub struct PluginConfigurationAdminClient {
    http: Arc<KongHttpClient>,
    /// Collection path including the parent segment, trailing slash included
    collection: String,
}

impl PluginConfigurationAdminClient {
    pub(crate) fn new(http: Arc<KongHttpClient>, collection: String) -> Self {
        Self { http, collection }
    }

    fn plugin_path(&self, name_or_id: &str) -> String {
        format!("{}{}", self.collection, urlencoding::encode(name_or_id))
    }
}

#[async_trait]
impl PluginConfigurationAdmin for PluginConfigurationAdminClient {
    async fn create(
        &self,
        name: &str,
        value: Value,
        consumer_id: Option<&str>,
    ) -> Result<Value, KongError> {
        let mut body = Map::new();
        body.insert("name".to_string(), json!(name));
        body.insert("value".to_string(), value);
        if let Some(consumer_id) = consumer_id {
            body.insert("consumer_id".to_string(), json!(consumer_id));
        }

        self.http.post(&self.collection, &Value::Object(body)).await
    }

    async fn retrieve(&self, name_or_id: &str) -> Result<Option<Value>, KongError> {
        self.http.get_optional(&self.plugin_path(name_or_id)).await
    }

    async fn list(
        &self,
        filter: &PluginFilter,
        size: usize,
        offset: Option<&str>,
    ) -> Result<ListPage, KongError> {
        let mut query = vec![("size", size.to_string())];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(id) = &filter.id {
            query.push(("id", id.clone()));
        }
        if let Some(name) = &filter.name {
            query.push(("name", name.clone()));
        }
        if let Some(consumer_id) = &filter.consumer_id {
            query.push(("consumer_id", consumer_id.clone()));
        }

        let body = self.http.get(&self.collection, &query).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn update(&self, name_or_id: &str, fields: Value) -> Result<Option<Value>, KongError> {
        self.http.patch(&self.plugin_path(name_or_id), &fields).await
    }

    async fn delete(&self, name_or_id: &str) -> Result<(), KongError> {
        self.http.delete(&self.plugin_path(name_or_id)).await
    }

    async fn count(&self) -> Result<u64, KongError> {
        let page = self.list(&PluginFilter::default(), 1, None).await?;
        Ok(page.total)
    }
}
