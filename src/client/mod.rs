//! Network-backed client for the Kong admin API
//!
//! Implements the same [`crate::contract`] traits as the simulator, over
//! HTTP against a live gateway. Status codes are translated into the shared
//! outcome vocabulary (record, absent, Conflict, generic failure) so callers
//! can swap this module and [`crate::simulator`] freely.
//!
//! # Module Structure
//!
//! - [`http`] - reqwest wrapper: status translation, timeouts, bounded retry
//! - [`apis`] - API resource client (plus nested plugin configurations)
//! - [`consumers`] - Consumer client (plus nested basic-auth credentials)
//! - [`plugins`] - Plugin-configuration client scoped to one API
//! - [`basic_auth`] - Basic-auth credential client scoped to one consumer
//!
//! # Example
//!
//! ```ignore
//! use kong_admin::client::{HttpConfig, KongAdminClient};
//! use kong_admin::contract::ApiAdmin;
//!
//! async fn example() -> Result<(), kong_admin::KongError> {
//!     let kong = KongAdminClient::new(HttpConfig::default())?;
//!     let api = kong
//!         .apis()
//!         .add("http://mockbin.com", Some("Mockbin"), Some("mockbin.com"), None, false)
//!         .await?;
//!     println!("registered {}", api["id"]);
//!     Ok(())
//! }
//! ```

pub mod apis;
pub mod basic_auth;
pub mod consumers;
pub mod http;
pub mod plugins;

pub use apis::ApiAdminClient;
pub use basic_auth::BasicAuthAdminClient;
pub use consumers::ConsumerAdminClient;
pub use http::{HttpConfig, KongHttpClient};
pub use plugins::PluginConfigurationAdminClient;

use crate::error::KongError;
use std::sync::Arc;

/// Aggregates one client per top-level resource family.
///
/// Purely compositional; all requests go through one shared
/// [`KongHttpClient`].
pub struct KongAdminClient {
    apis: ApiAdminClient,
    consumers: ConsumerAdminClient,
}

impl KongAdminClient {
    pub fn new(config: HttpConfig) -> Result<Self, KongError> {
        let http = Arc::new(KongHttpClient::new(&config)?);
        Ok(Self {
            apis: ApiAdminClient::new(Arc::clone(&http)),
            consumers: ConsumerAdminClient::new(http),
        })
    }

    /// API resource administration
    pub fn apis(&self) -> &ApiAdminClient {
        &self.apis
    }

    /// Consumer resource administration
    pub fn consumers(&self) -> &ConsumerAdminClient {
        &self.consumers
    }
}
