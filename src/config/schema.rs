//! Configuration schema definitions.
//!
//! This module defines the settings a link is built from, plus the layout of
//! the TOML file the command-line client reads. All types derive Serde traits.

use serde::{Deserialize, Deserializer, Serialize};

/// Root configuration file layout.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LinkConfig {
    /// Account id and credentials.
    pub account: AccountSettings,

    /// Which RESTlet to call and how to retry.
    pub target: TargetSettings,

    /// HTTP transport settings.
    pub transport: TransportConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Account id plus one of the two credential shapes.
///
/// OAuth1 needs `token_key`, `token_secret`, `consumer_key` and
/// `consumer_secret`. NLAuth needs `email` and `password`, with an optional
/// `role`.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AccountSettings {
    #[serde(alias = "accountId", deserialize_with = "opt_string_or_number")]
    pub account_id: Option<String>,

    #[serde(alias = "consumerKey")]
    pub consumer_key: Option<String>,

    #[serde(alias = "consumerSecret")]
    pub consumer_secret: Option<String>,

    #[serde(alias = "tokenKey")]
    pub token_key: Option<String>,

    #[serde(alias = "tokenSecret")]
    pub token_secret: Option<String>,

    pub email: Option<String>,

    pub password: Option<String>,

    #[serde(deserialize_with = "opt_string_or_number")]
    pub role: Option<String>,
}

impl AccountSettings {
    /// Settings for token based authentication.
    pub fn oauth1(
        account_id: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token_key: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            account_id: Some(account_id.into()),
            consumer_key: Some(consumer_key.into()),
            consumer_secret: Some(consumer_secret.into()),
            token_key: Some(token_key.into()),
            token_secret: Some(token_secret.into()),
            ..Self::default()
        }
    }

    /// Settings for email/password authentication.
    pub fn nlauth(
        account_id: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            account_id: Some(account_id.into()),
            email: Some(email.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for AccountSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redacted(value: &Option<String>) -> Option<&'static str> {
            value.as_ref().map(|_| "<redacted>")
        }

        f.debug_struct("AccountSettings")
            .field("account_id", &self.account_id)
            .field("consumer_key", &redacted(&self.consumer_key))
            .field("consumer_secret", &redacted(&self.consumer_secret))
            .field("token_key", &redacted(&self.token_key))
            .field("token_secret", &redacted(&self.token_secret))
            .field("email", &self.email)
            .field("password", &redacted(&self.password))
            .field("role", &self.role)
            .finish()
    }
}

/// Where the RESTlet lives and how calls to it are retried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetSettings {
    /// Full external URL of the RESTlet.
    pub url: Option<String>,

    /// Script id or number, used with `deployment` when `url` is absent.
    #[serde(deserialize_with = "opt_string_or_number")]
    pub script: Option<String>,

    /// Deployment id or number.
    #[serde(deserialize_with = "opt_string_or_number")]
    pub deployment: Option<String>,

    /// Total attempts per call, including the first (default: 3).
    ///
    /// `0` still allows one attempt. It is not treated as unset, so it does
    /// not fall back to the default of 3.
    pub retries: Option<u32>,

    /// Backoff unit in milliseconds between retries.
    pub backoff: Option<u64>,

    /// Overrides the `content-type` header (default: `application/json`).
    #[serde(alias = "contentType")]
    pub content_type: Option<String>,

    /// Look up the account's current service domain before each call.
    #[serde(alias = "discoverDomain")]
    pub discover_domain: bool,

    /// Overrides the datacenter lookup endpoint.
    #[serde(alias = "discoveryEndpoint")]
    pub discovery_endpoint: Option<String>,
}

impl TargetSettings {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn from_script(script: impl Into<String>, deployment: impl Into<String>) -> Self {
        Self {
            script: Some(script.into()),
            deployment: Some(deployment.into()),
            ..Self::default()
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn with_backoff(mut self, backoff_ms: u64) -> Self {
        self.backoff = Some(backoff_ms);
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Enables the datacenter lookup, optionally against a custom endpoint.
    pub fn with_discovery(mut self, endpoint: Option<String>) -> Self {
        self.discover_domain = true;
        self.discovery_endpoint = endpoint;
        self
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub timeout_secs: u64,

    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// Ignore system proxy settings (default: true).
    pub no_proxy: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("restlet-link/", env!("CARGO_PKG_VERSION")).to_string(),
            no_proxy: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Accepts identifiers written either as strings or as integers.
fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Signed(n) => n.to_string(),
        Raw::Unsigned(n) => n.to_string(),
    }))
}
