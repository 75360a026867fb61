//! RESTlet client library.
//!
//! Builds authenticated HTTP calls against remote script-backed endpoints,
//! retries transient failures with linear backoff, and hands the outcome
//! back through a callback or a future.

// Request pipeline
pub mod auth;
pub mod http;
pub mod target;
pub mod transport;

// Facade
pub mod link;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod observability;
pub mod resilience;

pub use config::schema::{AccountSettings, LinkConfig, TargetSettings};
pub use error::{ConfigurationError, RestletError, RestletResult};
pub use link::{create_link, Pending, RestletLink};
pub use transport::{HttpMethod, ReqwestTransport, Transport};
