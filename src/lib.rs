//! Client and in-memory simulator for the Kong gateway admin API
//!
//! Two interchangeable implementations of the same administration contract:
//! a network client talking to a live gateway, and a simulator that
//! reproduces the remote API's create/list/update/delete semantics,
//! uniqueness constraints, and cursor pagination entirely in process memory.
//! Test code runs against the simulator; production code swaps in the
//! client without further changes.
//!
//! # Module Structure
//!
//! - [`contract`] - capability traits implemented by both variants
//! - [`simulator`] - store-backed admin facade for tests
//! - [`client`] - reqwest-backed admin facade for a live gateway
//! - [`store`] - the generic record store and pagination engine
//! - [`filter`] - pure filtering/projection helpers used by list paths
//! - [`error`] - the shared failure taxonomy
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
//!     assert_eq!(kong.apis().count().await?, 1);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod contract;
pub mod error;
pub mod filter;
pub mod simulator;
pub mod store;

pub use client::KongAdminClient;
pub use error::KongError;
pub use simulator::KongAdminSimulator;
pub use store::{ListPage, DEFAULT_LIST_SIZE};
