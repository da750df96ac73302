//! In-memory simulator of the Kong admin API
//!
//! Reproduces the create/list/update/delete semantics, uniqueness
//! constraints, and cursor pagination of the remote admin API so that code
//! written against the [`crate::contract`] traits behaves identically
//! against a live gateway and against this simulator.
//!
//! # Module Structure
//!
//! - [`apis`] - API resource emulator (plus nested plugin configurations)
//! - [`consumers`] - Consumer emulator (plus nested basic-auth credentials)
//! - [`plugins`] - Plugin-configuration emulator scoped to one API
//! - [`basic_auth`] - Basic-auth credential emulator scoped to one consumer
//!
//! # Example
//!
//! ```ignore
//! use kong_admin::contract::ApiAdmin;
//! use kong_admin::simulator::KongAdminSimulator;
//!
//! async fn example() -> Result<(), kong_admin::KongError> {
//!     let kong = KongAdminSimulator::new();
//!     let api = kong
//!         .apis()
//!         .add("http://mockbin.com", Some("Mockbin"), Some("mockbin.com"), None, false)
//!         .await?;
//!     assert_eq!(api["target_url"], "http://mockbin.com/");
//!     Ok(())
//! }
//! ```

pub mod apis;
pub mod basic_auth;
pub mod consumers;
pub mod plugins;

pub use apis::ApiAdminSimulator;
pub use basic_auth::BasicAuthAdminSimulator;
pub use consumers::ConsumerAdminSimulator;
pub use plugins::PluginConfigurationAdminSimulator;

/// Admin URL the real gateway listens on by default; used as the base of
/// simulated `next` pagination links.
pub const DEFAULT_ADMIN_URL: &str = "http://localhost:8001";

/// Aggregates one emulator per top-level resource family.
///
/// Purely compositional: all state lives in the per-family emulators and
/// their stores.
pub struct KongAdminSimulator {
    apis: ApiAdminSimulator,
    consumers: ConsumerAdminSimulator,
}

impl KongAdminSimulator {
    /// Simulator whose pagination links point at [`DEFAULT_ADMIN_URL`]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_ADMIN_URL)
    }

    /// Simulator whose pagination links point at `base_url`
    pub fn with_base_url(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            apis: ApiAdminSimulator::new(base_url),
            consumers: ConsumerAdminSimulator::new(base_url),
        }
    }

    /// API resource administration
    pub fn apis(&self) -> &ApiAdminSimulator {
        &self.apis
    }

    /// Consumer resource administration
    pub fn consumers(&self) -> &ConsumerAdminSimulator {
        &self.consumers
    }
}

impl Default for KongAdminSimulator {
    fn default() -> Self {
        Self::new()
    }
}
