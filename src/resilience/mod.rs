//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Failed attempt:
//!     → retries.rs (is the error message one of the transient codes?)
//!     → RetryPolicy (any attempts left in the call budget?)
//!     → backoff.rs (how long to wait before the next attempt)
//! ```
//!
//! # Design Decisions
//! - The call budget counts total attempts, including the first
//! - Backoff only applies when both `retries` and `backoff` are configured
//! - Backoff grows linearly with the attempts already made

pub mod backoff;
pub mod retries;

pub use retries::RetryPolicy;
