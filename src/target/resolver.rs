//! Static and discovery-based URL resolution.

use url::Url;

use crate::config::schema::TargetSettings;
use crate::error::ConfigurationError;
use crate::observability::metrics;
use crate::target::discovery::DatacenterDiscovery;
use crate::transport::Transport;

/// Path of the RESTlet dispatcher on every service domain.
pub const RESTLET_PATH: &str = "/app/site/hosting/restlet.nl";

/// Which RESTlet a link calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestletTarget {
    /// Explicit external URL, used verbatim.
    Url {
        raw: String,
        /// Query string (without `?`) carried over when re-basing on a discovered domain.
        query: Option<String>,
    },
    /// Script and deployment ids on the account's own host.
    Script { script: String, deployment: String },
}

impl RestletTarget {
    pub fn from_settings(settings: &TargetSettings) -> Result<Self, ConfigurationError> {
        if let Some(raw) = settings.url.as_deref().filter(|u| !u.is_empty()) {
            let parsed = Url::parse(raw).map_err(|e| ConfigurationError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })?;
            return Ok(RestletTarget::Url {
                raw: raw.to_string(),
                query: parsed.query().map(str::to_string),
            });
        }

        match (
            settings.script.as_deref().filter(|s| !s.is_empty()),
            settings.deployment.as_deref().filter(|d| !d.is_empty()),
        ) {
            (Some(script), Some(deployment)) => Ok(RestletTarget::Script {
                script: script.to_string(),
                deployment: deployment.to_string(),
            }),
            _ => Err(ConfigurationError::MissingTarget),
        }
    }

    /// URL used without discovery, or when discovery fails.
    pub fn static_url(&self, account_id: &str) -> String {
        match self {
            RestletTarget::Url { raw, .. } => raw.clone(),
            RestletTarget::Script { .. } => format!(
                "https://{}.restlets.api.netsuite.com{}{}",
                account_id,
                RESTLET_PATH,
                self.query_suffix()
            ),
        }
    }

    /// URL on a discovered service domain.
    pub fn on_domain(&self, rest_domain: &str) -> String {
        format!(
            "{}{}{}",
            rest_domain.trim_end_matches('/'),
            RESTLET_PATH,
            self.query_suffix()
        )
    }

    fn query_suffix(&self) -> String {
        match self {
            RestletTarget::Url { query: Some(q), .. } => format!("?{}", q),
            RestletTarget::Url { query: None, .. } => String::new(),
            RestletTarget::Script { script, deployment } => {
                format!("?script={}&deploy={}", script, deployment)
            }
        }
    }
}

/// Resolves the base URL of each call.
#[derive(Debug, Clone)]
pub struct TargetResolver {
    target: RestletTarget,
    account_id: String,
    discovery: Option<DatacenterDiscovery>,
}

impl TargetResolver {
    pub fn new(
        target: RestletTarget,
        account_id: impl Into<String>,
        discovery: Option<DatacenterDiscovery>,
    ) -> Self {
        Self {
            target,
            account_id: account_id.into(),
            discovery,
        }
    }

    pub fn from_settings(
        settings: &TargetSettings,
        account_id: &str,
    ) -> Result<Self, ConfigurationError> {
        let target = RestletTarget::from_settings(settings)?;
        let discovery = if settings.discover_domain {
            if let Some(endpoint) = &settings.discovery_endpoint {
                Url::parse(endpoint).map_err(|e| ConfigurationError::InvalidUrl {
                    url: endpoint.clone(),
                    reason: e.to_string(),
                })?;
            }
            Some(DatacenterDiscovery::new(settings.discovery_endpoint.clone()))
        } else {
            None
        };
        Ok(Self::new(target, account_id, discovery))
    }

    pub fn target(&self) -> &RestletTarget {
        &self.target
    }

    /// Base URL for one call. Never fails: discovery errors fall back to the static URL.
    pub async fn resolve(&self, transport: &dyn Transport) -> String {
        let Some(discovery) = &self.discovery else {
            return self.target.static_url(&self.account_id);
        };

        match discovery.lookup(transport, &self.account_id).await {
            Ok(domain) => {
                tracing::debug!(domain = %domain, "Service domain discovered");
                self.target.on_domain(&domain)
            }
            Err(e) => {
                tracing::warn!(
                    account_id = %self.account_id,
                    error = %e,
                    "Domain discovery failed, using static URL"
                );
                metrics::record_discovery_fallback();
                self.target.static_url(&self.account_id)
            }
        }
    }
}
