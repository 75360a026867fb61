//! Credential classification.

use crate::config::schema::AccountSettings;
use crate::error::ConfigurationError;

/// The authentication strategy a link signs requests with.
#[derive(Clone, PartialEq, Eq)]
pub enum AccountCredential {
    /// Token based authentication, signed with HMAC-SHA256.
    OAuth1 {
        account_id: String,
        consumer_key: String,
        consumer_secret: String,
        token_key: String,
        token_secret: String,
    },
    /// Email and password sent in a header on every request.
    NLAuth {
        account_id: String,
        email: String,
        password: String,
        role: Option<String>,
    },
}

impl AccountCredential {
    /// Classify account settings into exactly one strategy.
    ///
    /// All four OAuth1 fields win. Otherwise email and password are required,
    /// so incomplete OAuth1 fields next to complete NLAuth fields select NLAuth.
    pub fn resolve(settings: Option<&AccountSettings>) -> Result<Self, ConfigurationError> {
        let settings = settings.ok_or(ConfigurationError::MissingAccountSettings)?;
        let account_id = present(&settings.account_id)
            .ok_or(ConfigurationError::MissingAccountId)?
            .to_string();

        if let (Some(consumer_key), Some(consumer_secret), Some(token_key), Some(token_secret)) = (
            present(&settings.consumer_key),
            present(&settings.consumer_secret),
            present(&settings.token_key),
            present(&settings.token_secret),
        ) {
            return Ok(AccountCredential::OAuth1 {
                account_id,
                consumer_key: consumer_key.to_string(),
                consumer_secret: consumer_secret.to_string(),
                token_key: token_key.to_string(),
                token_secret: token_secret.to_string(),
            });
        }

        match (present(&settings.email), present(&settings.password)) {
            (Some(email), Some(password)) => Ok(AccountCredential::NLAuth {
                account_id,
                email: email.to_string(),
                password: password.to_string(),
                role: present(&settings.role).map(str::to_string),
            }),
            _ => Err(ConfigurationError::MissingCredentials),
        }
    }

    pub fn account_id(&self) -> &str {
        match self {
            AccountCredential::OAuth1 { account_id, .. } => account_id,
            AccountCredential::NLAuth { account_id, .. } => account_id,
        }
    }

    /// Short name of the strategy, for logs.
    pub fn scheme(&self) -> &'static str {
        match self {
            AccountCredential::OAuth1 { .. } => "oauth1",
            AccountCredential::NLAuth { .. } => "nlauth",
        }
    }
}

impl std::fmt::Debug for AccountCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountCredential::OAuth1 { account_id, .. } => f
                .debug_struct("OAuth1")
                .field("account_id", account_id)
                .finish_non_exhaustive(),
            AccountCredential::NLAuth {
                account_id,
                email,
                role,
                ..
            } => f
                .debug_struct("NLAuth")
                .field("account_id", account_id)
                .field("email", email)
                .field("role", role)
                .finish_non_exhaustive(),
        }
    }
}

/// A field counts as present when it is set and non-empty.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
