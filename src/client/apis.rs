//! Network-backed API resource administration

use crate::client::http::KongHttpClient;
use crate::client::plugins::PluginConfigurationAdminClient;
use crate::contract::{ApiAdmin, ApiFilter};
use crate::error::KongError;
use crate::store::ListPage;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Client for the `/apis/` family of the remote admin API
#[derive(Clone)]
pub struct ApiAdminClient {
    http: Arc<KongHttpClient>,
}

impl ApiAdminClient {
    pub(crate) fn new(http: Arc<KongHttpClient>) -> Self {
        Self { http }
    }

    fn api_path(name_or_id: &str) -> String {
        format!("apis/{}", urlencoding::encode(name_or_id))
    }

    /// Plugin-configuration administration scoped to one API. The remote
    /// service resolves the parent, so no existence check happens here.
    pub fn plugins(&self, api_name_or_id: &str) -> PluginConfigurationAdminClient {
        PluginConfigurationAdminClient::new(
            Arc::clone(&self.http),
            format!("apis/{}/plugins/", urlencoding::encode(api_name_or_id)),
        )
    }
}

#[async_trait]
impl ApiAdmin for ApiAdminClient {
    async fn add(
        &self,
        target_url: &str,
        name: Option<&str>,
        public_dns: Option<&str>,
        path: Option<&str>,
        strip_path: bool,
    ) -> Result<Value, KongError> {
        let mut body = Map::new();
        body.insert("target_url".to_string(), json!(target_url));
        if let Some(name) = name {
            body.insert("name".to_string(), json!(name));
        }
        if let Some(public_dns) = public_dns {
            body.insert("public_dns".to_string(), json!(public_dns));
        }
        if let Some(path) = path {
            body.insert("path".to_string(), json!(path));
        }
        body.insert("strip_path".to_string(), json!(strip_path));

        self.http.post("apis/", &Value::Object(body)).await
    }

    async fn retrieve(&self, name_or_id: &str) -> Result<Option<Value>, KongError> {
        self.http.get_optional(&Self::api_path(name_or_id)).await
    }

    async fn list(
        &self,
        filter: &ApiFilter,
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
        if let Some(public_dns) = &filter.public_dns {
            query.push(("public_dns", public_dns.clone()));
        }
        if let Some(target_url) = &filter.target_url {
            query.push(("target_url", target_url.clone()));
        }

        let body = self.http.get("apis/", &query).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn update(&self, name_or_id: &str, fields: Value) -> Result<Option<Value>, KongError> {
        self.http.patch(&Self::api_path(name_or_id), &fields).await
    }

    async fn delete(&self, name_or_id: &str) -> Result<(), KongError> {
        self.http.delete(&Self::api_path(name_or_id)).await
    }

    async fn count(&self) -> Result<u64, KongError> {
        let page = self.list(&ApiFilter::default(), 1, None).await?;
        Ok(page.total)
    }
}
