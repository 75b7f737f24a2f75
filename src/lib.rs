//! Tenant-scoped request handling for a multi-backend API gateway.
//!
//! Every request passes the same admission steps before any downstream
//! service is called:
//! - **Identity**: the caller is resolved from request metadata, failing
//!   closed
//! - **Organization guard**: the request must target the caller's own
//!   organization
//! - **Validation**: the payload must satisfy its rules, producing a
//!   [`Verified`] value
//!
//! Admitted requests are executed by per-domain managers, either as a single
//! backend call or as a concurrent fan-out whose results are merged.
//!
//! # Core Types
//!
//! - [`Ctx`]: per-request context whose type records the admission state
//! - [`Verified<T>`]: a request that passed validation
//! - [`Secret<T>`]: wrapper that redacts credentials in logs and output
//! - [`Gateway`]: every handler wired to one [`backend::BackendSet`]
//! - [`GatewayError`]: validation, authorization or backend failure
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use gateway_core::config::GatewayConfig;
//! use gateway_core::entities::OrganizationId;
//! use gateway_core::handler::RequestContext;
//! use gateway_core::testing::{cluster_info, nodes, StubBackends};
//! use gateway_core::Gateway;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let backends = Arc::new(
//!     StubBackends::new()
//!         .with_cluster(cluster_info("org-1", "c1", "prod"), nodes("org-1", "c1", 5, 3)),
//! );
//! let gateway = Gateway::new(&GatewayConfig::default(), backends.backend_set());
//!
//! let request = RequestContext::new("req-1")
//!     .with_metadata("organization_id", "org-1")
//!     .with_metadata("user_id", "alice@example.com");
//!
//! let list = gateway
//!     .clusters()
//!     .list(&request, OrganizationId::new("org-1"))
//!     .await
//!     .expect("own organization");
//! assert_eq!(list.clusters[0].running_nodes, 3);
//!
//! // Another tenant's data is refused before any backend call.
//! let calls = backends.call_count();
//! let denied = gateway.clusters().list(&request, OrganizationId::new("org-2")).await;
//! assert!(denied.is_err());
//! assert_eq!(backends.call_count(), calls);
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod config;
mod context;
pub mod entities;
mod error;
mod gateway;
pub mod guard;
pub mod handler;
mod identity;
pub mod logging;
pub mod manager;
mod secret;
mod state;
pub mod testing;
pub mod validate;
mod verified;

pub use context::Ctx;
pub use error::{
    AuthorizationFailure, AuthorizationKind, BackendError, BackendErrorKind, BackendFailure,
    ErrorCode, GatewayError, ValidationFailure,
};
pub use gateway::Gateway;
pub use identity::CallerIdentity;
pub use logging::OpLog;
pub use secret::Secret;
pub use state::{Authorized, Identified, Received};
pub use verified::Verified;
