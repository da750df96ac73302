//! Network-backed basic-auth credential administration
//!
//! Operates under one parent consumer's collection path, handed out by
//! [`crate::client::ConsumerAdminClient::basic_auth`].

use crate::client::http::KongHttpClient;
use crate::contract::{BasicAuthAdmin, BasicAuthFilter};
use crate::error::KongError;
use crate::store::ListPage;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Client for `/consumers/{consumer}/basic-auth/` on the remote admin API
#[derive(Clone)]
pub struct BasicAuthAdminClient {
    http: Arc<KongHttpClient>,
    /// Collection path including the parent segment, trailing slash included
    collection: String,
}

impl BasicAuthAdminClient {
    pub(crate) fn new(http: Arc<KongHttpClient>, collection: String) -> Self {
        Self { http, collection }
    }

    fn credential_path(&self, username_or_id: &str) -> String {
        format!("{}{}", self.collection, urlencoding::encode(username_or_id))
    }
}

#[async_trait]
impl BasicAuthAdmin for BasicAuthAdminClient {
    async fn create(&self, username: &str, password: Option<&str>) -> Result<Value, KongError> {
        let mut body = Map::new();
        body.insert("username".to_string(), json!(username));
        if let Some(password) = password {
            body.insert("password".to_string(), json!(password));
        }

        self.http.post(&self.collection, &Value::Object(body)).await
    }

    async fn retrieve(&self, username_or_id: &str) -> Result<Option<Value>, KongError> {
        self.http
            .get_optional(&self.credential_path(username_or_id))
            .await
    }

    async fn list(
        &self,
        filter: &BasicAuthFilter,
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
        if let Some(username) = &filter.username {
            query.push(("username", username.clone()));
        }

        let body = self.http.get(&self.collection, &query).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn update(&self, username_or_id: &str, fields: Value) -> Result<Option<Value>, KongError> {
        self.http
            .patch(&self.credential_path(username_or_id), &fields)
            .await
    }

    async fn delete(&self, username_or_id: &str) -> Result<(), KongError> {
        self.http.delete(&self.credential_path(username_or_id)).await
    }

    async fn count(&self) -> Result<u64, KongError> {
        let page = self.list(&BasicAuthFilter::default(), 1, None).await?;
        Ok(page.total)
    }
}
