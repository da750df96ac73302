//! Admin capability traits
//!
//! One interface per resource family, each implemented by two variants: the
//! store-backed simulator ([`crate::simulator`]) and the network-backed
//! client ([`crate::client`]). Callers pick a variant at construction time
//! and the rest of their code is interchangeable between the two.
//!
//! Not-found outcomes are `Ok(None)` (or a silent no-op for delete), never
//! an error; see [`crate::error::KongError`] for the failure taxonomy.

use crate::error::KongError;
use crate::store::{next_page_params, ListPage};
use async_trait::async_trait;
use serde_json::Value;

/// Equality filters accepted by the API list operation
#[derive(Debug, Clone, Default)]
pub struct ApiFilter {
    pub id: Option<String>,
    pub name: Option<String>,
    pub public_dns: Option<String>,
    pub target_url: Option<String>,
}

/// Equality filters accepted by the consumer list operation
#[derive(Debug, Clone, Default)]
pub struct ConsumerFilter {
    pub id: Option<String>,
    pub custom_id: Option<String>,
    pub username: Option<String>,
}

/// Equality filters accepted by the plugin-configuration list operation
#[derive(Debug, Clone, Default)]
pub struct PluginFilter {
    pub id: Option<String>,
    pub name: Option<String>,
    pub consumer_id: Option<String>,
}

/// Equality filters accepted by the basic-auth credential list operation
#[derive(Debug, Clone, Default)]
pub struct BasicAuthFilter {
    pub id: Option<String>,
    pub username: Option<String>,
}

/// Administration of the API resource family
#[async_trait]
pub trait ApiAdmin: Send + Sync {
    /// Register an API. `target_url` is required and gets a trailing slash;
    /// at least one of `public_dns` and `path` must be given; `name`
    /// defaults to `public_dns`.
    async fn add(
        &self,
        target_url: &str,
        name: Option<&str>,
        public_dns: Option<&str>,
        path: Option<&str>,
        strip_path: bool,
    ) -> Result<Value, KongError>;

    async fn retrieve(&self, name_or_id: &str) -> Result<Option<Value>, KongError>;

    async fn list(
        &self,
        filter: &ApiFilter,
        size: usize,
        offset: Option<&str>,
    ) -> Result<ListPage, KongError>;

    /// Merge `fields` into the API resolved by `name_or_id`
    async fn update(&self, name_or_id: &str, fields: Value) -> Result<Option<Value>, KongError>;

    async fn delete(&self, name_or_id: &str) -> Result<(), KongError>;

    async fn count(&self) -> Result<u64, KongError>;

    /// Concatenate pages by following `next` cursors until exhaustion
    async fn list_all(&self, filter: &ApiFilter, size: usize) -> Result<Vec<Value>, KongError> {
        let mut items = Vec::new();
        let mut offset: Option<String> = None;
        loop {
            let page = self.list(filter, size, offset.as_deref()).await?;
            items.extend(page.data);
            match page.next.as_deref().and_then(next_page_params) {
                Some((_, next_offset)) => offset = Some(next_offset),
                None => break,
            }
        }
        Ok(items)
    }
}

/// Administration of the consumer resource family
#[async_trait]
pub trait ConsumerAdmin: Send + Sync {
    /// Create a consumer; at least one of `username` and `custom_id` is
    /// required.
    async fn create(
        &self,
        username: Option<&str>,
        custom_id: Option<&str>,
    ) -> Result<Value, KongError>;

    async fn retrieve(&self, username_or_id: &str) -> Result<Option<Value>, KongError>;

    async fn list(
        &self,
        filter: &ConsumerFilter,
        size: usize,
        offset: Option<&str>,
    ) -> Result<ListPage, KongError>;

    async fn update(&self, username_or_id: &str, fields: Value) -> Result<Option<Value>, KongError>;

    async fn delete(&self, username_or_id: &str) -> Result<(), KongError>;

    async fn count(&self) -> Result<u64, KongError>;

    /// Concatenate pages by following `next` cursors until exhaustion
    async fn list_all(&self, filter: &ConsumerFilter, size: usize) -> Result<Vec<Value>, KongError> {
        let mut items = Vec::new();
        let mut offset: Option<String> = None;
        loop {
            let page = self.list(filter, size, offset.as_deref()).await?;
            items.extend(page.data);
            match page.next.as_deref().and_then(next_page_params) {
                Some((_, next_offset)) => offset = Some(next_offset),
                None => break,
            }
        }
        Ok(items)
    }
}

/// Administration of plugin configurations scoped to one parent API
#[async_trait]
pub trait PluginConfigurationAdmin: Send + Sync {
    /// Attach a plugin to the parent API. `value` holds the plugin's
    /// configuration properties; `consumer_id` optionally restricts the
    /// configuration to one consumer.
    async fn create(
        &self,
        name: &str,
        value: Value,
        consumer_id: Option<&str>,
    ) -> Result<Value, KongError>;

    async fn retrieve(&self, name_or_id: &str) -> Result<Option<Value>, KongError>;

    async fn list(
        &self,
        filter: &PluginFilter,
        size: usize,
        offset: Option<&str>,
    ) -> Result<ListPage, KongError>;

    async fn update(&self, name_or_id: &str, fields: Value) -> Result<Option<Value>, KongError>;

    async fn delete(&self, name_or_id: &str) -> Result<(), KongError>;

    async fn count(&self) -> Result<u64, KongError>;
}

/// Administration of basic-auth credentials scoped to one parent consumer
#[async_trait]
pub trait BasicAuthAdmin: Send + Sync {
    async fn create(&self, username: &str, password: Option<&str>) -> Result<Value, KongError>;

    async fn retrieve(&self, username_or_id: &str) -> Result<Option<Value>, KongError>;

    async fn list(
        &self,
        filter: &BasicAuthFilter,
        size: usize,
        offset: Option<&str>,
    ) -> Result<ListPage, KongError>;

    async fn update(&self, username_or_id: &str, fields: Value) -> Result<Option<Value>, KongError>;

    async fn delete(&self, username_or_id: &str) -> Result<(), KongError>;

    async fn count(&self) -> Result<u64, KongError>;
}
