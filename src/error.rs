//! Error types shared across the crate.
//!
//! Two families exist:
//! - [`ConfigurationError`]: raised synchronously while building a link, never retried
//! - [`RestletError`]: delivered through the completion protocol of a call

use serde_json::Value;
use thiserror::Error;

use crate::resilience::retries::is_retryable;

/// Problems with account or target settings, detected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No account settings were supplied at all.
    #[error("Not enough information was provided: account settings are required")]
    MissingAccountSettings,

    /// The account settings have no account id.
    #[error("Not enough information was provided: an account id is required")]
    MissingAccountId,

    /// Neither credential shape is complete.
    #[error(
        "Not enough information was provided: connect via OAuth1 {{token_key, token_secret, consumer_key, consumer_secret}} or NLAuth {{email, password}}"
    )]
    MissingCredentials,

    /// Neither a URL nor a complete script/deployment pair was supplied.
    #[error("Not enough information was provided: a url or both script and deployment are required")]
    MissingTarget,

    /// The explicit target URL could not be parsed.
    #[error("Invalid target URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The default HTTP transport could not be constructed.
    #[error("Transport setup failed: {0}")]
    Transport(String),
}

/// Errors delivered to the caller of a RESTlet operation.
#[derive(Debug, Error)]
pub enum RestletError {
    /// Network-level failure reported by the transport.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The endpoint answered with an embedded `{"error": {"code": ...}}` envelope.
    #[error("Remote error {code}: {}", .message.as_deref().unwrap_or("no message"))]
    Remote {
        code: String,
        message: Option<String>,
        /// The full `error` object as received.
        details: Value,
    },

    /// A GET/DELETE response body was not valid JSON.
    #[error("Response body is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// The payload could not be turned into JSON.
    #[error("Payload could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),

    /// The request task stopped without reporting an outcome.
    #[error("Request task ended before completing")]
    Interrupted,
}

impl RestletError {
    /// The text matched against the retryable code set, if this kind of error has one.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            RestletError::Transport { message } => Some(message),
            RestletError::Remote { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        self.error_message().is_some_and(is_retryable)
    }
}

/// Result type for RESTlet operations.
pub type RestletResult<T> = Result<T, RestletError>;
