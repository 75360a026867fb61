//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, apply secret overrides from env)
//!     → validation.rs (credential and target rules)
//!     → LinkConfig (validated, immutable)
//!     → RestletLink::from_config
//!
//! In code:
//!     AccountSettings + TargetSettings
//!     → RestletLink::new (same rules, checked synchronously)
//! ```
//!
//! # Design Decisions
//! - Settings are immutable once a link is built
//! - All sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::AccountSettings;
pub use schema::LinkConfig;
pub use schema::ObservabilityConfig;
pub use schema::TargetSettings;
pub use schema::TransportConfig;
