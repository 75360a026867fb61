//! Request header construction per authentication strategy.

use crate::auth::credential::AccountCredential;
use crate::auth::oauth1::{self, Freshness, OAuth1Keys};
use crate::transport::HttpMethod;

pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Produces `Authorization` and `content-type` headers for one attempt.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credential: AccountCredential,
    content_type: String,
}

impl RequestSigner {
    pub fn new(credential: AccountCredential, content_type: Option<String>) -> Self {
        Self {
            credential,
            content_type: content_type.unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        }
    }

    pub fn credential(&self) -> &AccountCredential {
        &self.credential
    }

    /// Headers for a request, with fresh OAuth1 nonce and timestamp.
    pub fn headers(&self, method: HttpMethod, url: &str) -> Vec<(String, String)> {
        self.headers_with(method, url, &Freshness::generate())
    }

    pub(crate) fn headers_with(
        &self,
        method: HttpMethod,
        url: &str,
        freshness: &Freshness,
    ) -> Vec<(String, String)> {
        vec![
            (
                "Authorization".to_string(),
                self.authorization(method, url, freshness),
            ),
            ("content-type".to_string(), self.content_type.clone()),
        ]
    }

    fn authorization(&self, method: HttpMethod, url: &str, freshness: &Freshness) -> String {
        match &self.credential {
            AccountCredential::OAuth1 {
                account_id,
                consumer_key,
                consumer_secret,
                token_key,
                token_secret,
            } => {
                let keys = OAuth1Keys {
                    consumer_key,
                    consumer_secret,
                    token_key,
                    token_secret,
                };
                // realm is appended after signing; it is not part of the signature
                format!(
                    "{}, realm=\"{}\"",
                    oauth1::authorization_header(keys, method, url, freshness),
                    account_id
                )
            }
            AccountCredential::NLAuth {
                account_id,
                email,
                password,
                role,
            } => {
                let mut value = format!(
                    "NLAuth nlauth_account={},nlauth_email={},nlauth_signature={}",
                    account_id, email, password
                );
                if let Some(role) = role {
                    value.push_str(",nlauth_role=");
                    value.push_str(role);
                }
                value
            }
        }
    }
}
