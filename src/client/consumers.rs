//! Network-backed consumer resource administration

use crate::client::basic_auth::BasicAuthAdminClient;
use crate::client::http::KongHttpClient;
use crate::contract::{ConsumerAdmin, ConsumerFilter};
use crate::error::KongError;
use crate::store::ListPage;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Client for the `/consumers/` family of the remote admin API
#[derive(Clone)]
pub struct ConsumerAdminClient {
    http: Arc<KongHttpClient>,
}

impl ConsumerAdminClient {
    pub(crate) fn new(http: Arc<KongHttpClient>) -> Self {
        Self { http }
    }

    fn consumer_path(username_or_id: &str) -> String {
        format!("consumers/{}", urlencoding::encode(username_or_id))
    }

    /// Basic-auth credential administration scoped to one consumer. The
    /// remote service resolves the parent, so no existence check happens
    /// here.
    pub fn basic_auth(&self, username_or_id: &str) -> BasicAuthAdminClient {
        BasicAuthAdminClient::new(
            Arc::clone(&self.http),
            format!("consumers/{}/basic-auth/", urlencoding::encode(username_or_id)),
        )
    }
}

#[async_trait]
impl ConsumerAdmin for ConsumerAdminClient {
    async fn create(
        &self,
        username: Option<&str>,
        custom_id: Option<&str>,
    ) -> Result<Value, KongError> {
        let mut body = Map::new();
        if let Some(username) = username {
            body.insert("username".to_string(), json!(username));
        }
        if let Some(custom_id) = custom_id {
            body.insert("custom_id".to_string(), json!(custom_id));
        }

        self.http.post("consumers/", &Value::Object(body)).await
    }

    async fn retrieve(&self, username_or_id: &str) -> Result<Option<Value>, KongError> {
        self.http
            .get_optional(&Self::consumer_path(username_or_id))
            .await
    }

    async fn list(
        &self,
        filter: &ConsumerFilter,
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
        if let Some(custom_id) = &filter.custom_id {
            query.push(("custom_id", custom_id.clone()));
        }
        if let Some(username) = &filter.username {
            query.push(("username", username.clone()));
        }

        let body = self.http.get("consumers/", &query).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn update(&self, username_or_id: &str, fields: Value) -> Result<Option<Value>, KongError> {
        self.http
            .patch(&Self::consumer_path(username_or_id), &fields)
            .await
    }

    async fn delete(&self, username_or_id: &str) -> Result<(), KongError> {
        self.http.delete(&Self::consumer_path(username_or_id)).await
    }

    async fn count(&self) -> Result<u64, KongError> {
        let page = self.list(&ConsumerFilter::default(), 1, None).await?;
        Ok(page.total)
    }
}
