//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Executor, resolver, loader produce:
//!     → tracing events (structured, one `restlet_call` span per call)
//!     → metrics.rs (counters and a duration histogram)
//!
//! Consumers:
//!     → logging.rs subscriber (installed by the binary, or by the host application)
//!     → whatever `metrics` recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a recorder or subscriber on its own
//! - Secrets never reach log fields; credentials have redacting Debug impls

pub mod logging;
pub mod metrics;
