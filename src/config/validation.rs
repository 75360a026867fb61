//! Configuration validation.
//!
//! # Responsibilities
//! - Check that exactly one credential shape is usable
//! - Check that the target names a URL or a script/deployment pair
//! - Check that URL overrides parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Uses the same resolvers a link uses, so file and code paths agree

use url::Url;

use crate::auth::AccountCredential;
use crate::config::schema::LinkConfig;
use crate::error::ConfigurationError;
use crate::target::RestletTarget;

/// Validate a loaded configuration.
pub fn validate_config(config: &LinkConfig) -> Result<(), Vec<ConfigurationError>> {
    let mut errors = Vec::new();

    if let Err(e) = AccountCredential::resolve(Some(&config.account)) {
        errors.push(e);
    }

    if let Err(e) = RestletTarget::from_settings(&config.target) {
        errors.push(e);
    }

    if let Some(endpoint) = &config.target.discovery_endpoint {
        if let Err(e) = Url::parse(endpoint) {
            errors.push(ConfigurationError::InvalidUrl {
                url: endpoint.clone(),
                reason: e.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
