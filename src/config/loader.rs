//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::LinkConfig;
use crate::config::validation::validate_config;
use crate::error::ConfigurationError;

/// Environment variables that replace secrets read from the file.
pub const CONSUMER_SECRET_ENV: &str = "RESTLET_CONSUMER_SECRET";
pub const TOKEN_SECRET_ENV: &str = "RESTLET_TOKEN_SECRET";
pub const PASSWORD_ENV: &str = "RESTLET_PASSWORD";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ConfigurationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LinkConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content, |key| std::env::var(key).ok())
}

/// Parse configuration text, taking secret overrides from `lookup`.
pub fn parse_config<F>(content: &str, lookup: F) -> Result<LinkConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: LinkConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    apply_secret_overrides(&mut config, lookup);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_secret_overrides<F>(config: &mut LinkConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let account = &mut config.account;
    for (key, slot) in [
        (CONSUMER_SECRET_ENV, &mut account.consumer_secret),
        (TOKEN_SECRET_ENV, &mut account.token_secret),
        (PASSWORD_ENV, &mut account.password),
    ] {
        if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
            tracing::debug!(variable = key, "Secret taken from environment");
            *slot = Some(value);
        }
    }
}
