//! PingDirectory log publisher provider
//!
//! This crate manages PingDirectory log publishers through the server's
//! configuration API. Every publisher kind is exposed as two resource types:
//!
//! - `pingdirectory_<kind>_log_publisher` creates, updates and deletes
//!   publishers on the server.
//! - `pingdirectory_default_<kind>_log_publisher` adopts a publisher that
//!   ships with the server. Creating it edits the existing object and
//!   deleting it only drops it from state.
//!
//! # Overview
//!
//! - **Schemas**: one [`Schema`](schema::Schema) per resource type, built from
//!   the field tables in [`resource::catalog`]
//! - **ProviderService trait**: the host-facing operations (schema, configure,
//!   validate, plan, create, read, update, delete, import)
//! - **Configuration API client**: [`client::ApiClient`] speaks JSON over HTTPS
//!   with basic authentication
//! - **Update operations**: [`operations`] computes the minimal `PATCH` body
//!   between a plan and the prior state
//! - **Error types**: [`ProviderError`] and its diagnostics
//! - **Logging**: Integration with `tracing` for structured logging
//!
//! # Quick Start
//!
//! ```no_run
//! use pingdirectory_provider::{init_logging, LogPublisherProvider, ProviderService};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), pingdirectory_provider::ProviderError> {
//! init_logging();
//!
//! let provider = LogPublisherProvider::new();
//! provider
//!     .configure(json!({
//!         "https_host": "https://localhost:1443",
//!         "username": "cn=administrator",
//!         "password": "2FederateM0re",
//!     }))
//!     .await?;
//!
//! let state = provider
//!     .create(
//!         "pingdirectory_console_json_access_log_publisher",
//!         json!({"id": "Console JSON Access", "enabled": true}),
//!     )
//!     .await?;
//! println!("{}", state);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod service;
pub mod testing;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use client::{ApiClient, ApiError, LogPublisherApi};
pub use config::ProviderConfig;
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::LogPublisherProvider;
pub use resource::{Lifecycle, ResourceAdapter};
pub use schema::ProviderSchema;
pub use service::ProviderService;
pub use types::{AttributeChange, ImportedResource, PlanResult, ProviderMetadata};
pub use validation::{is_valid, validate, validate_result};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
