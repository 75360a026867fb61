//! Target resolution subsystem.
//!
//! # Data Flow
//! ```text
//! TargetSettings
//!     → resolver.rs (validate once: explicit URL or script/deployment pair)
//!     → RestletTarget (immutable, owned by the link)
//!
//! Each call:
//!     → discovery.rs (optional: account id → current service domain)
//!         success → target re-based on the discovered domain
//!         failure → static URL (logged, never surfaced)
//!     → base URL for the executor
//! ```
//!
//! # Design Decisions
//! - Missing targets are rejected when the link is built, not when it is used
//! - Discovery runs once per call and is not itself retried

pub mod discovery;
pub mod resolver;

pub use discovery::DatacenterDiscovery;
pub use resolver::{RestletTarget, TargetResolver};
