//! Datacenter discovery.
//!
//! Maps an account id to the service domain currently hosting it, so calls
//! keep working when the per-account host is stale.

use serde_json::Value;
use thiserror::Error;

use crate::http::request::append_query;
use crate::http::response::embedded_error;
use crate::transport::{HttpMethod, Transport, TransportError, TransportRequest};

pub const DEFAULT_DISCOVERY_ENDPOINT: &str = "https://rest.netsuite.com/rest/datacenterurls";

/// Why a lookup produced no domain.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("lookup request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("lookup returned error code {0}")]
    Remote(String),

    #[error("lookup response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("lookup response has no restDomain")]
    MissingDomain,
}

/// Client for the datacenter lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatacenterDiscovery {
    endpoint: String,
}

impl DatacenterDiscovery {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_DISCOVERY_ENDPOINT.to_string()),
        }
    }

    pub fn lookup_url(&self, account_id: &str) -> String {
        append_query(
            &self.endpoint,
            &format!("account={}", urlencoding::encode(account_id)),
        )
    }

    /// Ask the lookup endpoint for the account's REST domain.
    pub async fn lookup(
        &self,
        transport: &dyn Transport,
        account_id: &str,
    ) -> Result<String, DiscoveryError> {
        let response = transport
            .send(TransportRequest {
                method: HttpMethod::Get,
                url: self.lookup_url(account_id),
                headers: vec![("accept".to_string(), "application/json".to_string())],
                body: None,
            })
            .await?;

        let body: Value = serde_json::from_str(&response.body)?;
        if let Some(fault) = embedded_error(&body) {
            return Err(DiscoveryError::Remote(fault.code));
        }

        body.get("restDomain")
            .and_then(Value::as_str)
            .filter(|domain| !domain.is_empty())
            .map(str::to_string)
            .ok_or(DiscoveryError::MissingDomain)
    }
}

impl Default for DatacenterDiscovery {
    fn default() -> Self {
        Self::new(None)
    }
}
