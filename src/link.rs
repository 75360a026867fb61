//! The facade returned to callers.
//!
//! Every operation exists in two forms:
//! - `get_with(payload, callback)` runs the call and hands the outcome to `callback`
//! - `get(payload)` returns a [`Pending`] future resolving to the same outcome
//!
//! Only the callback form executes requests. The deferred form wraps it with
//! a one-shot channel, so both share one execution path.
//!
//! Every operation spawns a tokio task and must be called from within a tokio
//! runtime.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::Instrument;
use uuid::Uuid;

use crate::auth::{AccountCredential, RequestSigner};
use crate::config::schema::{AccountSettings, LinkConfig, TargetSettings, TransportConfig};
use crate::error::{ConfigurationError, RestletError, RestletResult};
use crate::http::executor::{DelayFn, Executor};
use crate::resilience::RetryPolicy;
use crate::target::TargetResolver;
use crate::transport::{HttpMethod, ReqwestTransport, Transport};

/// A configured connection to one RESTlet.
///
/// Cloning is cheap and clones share nothing mutable, so a link can serve any
/// number of concurrent calls.
#[derive(Debug, Clone)]
pub struct RestletLink {
    executor: Arc<Executor>,
}

impl RestletLink {
    /// Build a link that uses the default reqwest transport.
    pub fn new(
        account: Option<&AccountSettings>,
        target: &TargetSettings,
    ) -> Result<Self, ConfigurationError> {
        let credential = AccountCredential::resolve(account)?;
        let transport = ReqwestTransport::new(&TransportConfig::default())?;
        Self::assemble(credential, target, Arc::new(transport))
    }

    /// Build a link on top of a caller-supplied transport.
    pub fn with_transport(
        account: Option<&AccountSettings>,
        target: &TargetSettings,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigurationError> {
        let credential = AccountCredential::resolve(account)?;
        Self::assemble(credential, target, transport)
    }

    /// Build a link from a loaded configuration file.
    pub fn from_config(config: &LinkConfig) -> Result<Self, ConfigurationError> {
        let credential = AccountCredential::resolve(Some(&config.account))?;
        let transport = ReqwestTransport::new(&config.transport)?;
        Self::assemble(credential, &config.target, Arc::new(transport))
    }

    fn assemble(
        credential: AccountCredential,
        target: &TargetSettings,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigurationError> {
        let resolver = TargetResolver::from_settings(target, credential.account_id())?;
        let policy = RetryPolicy::from_settings(target);

        tracing::debug!(
            scheme = credential.scheme(),
            account_id = %credential.account_id(),
            max_attempts = policy.max_attempts(),
            "Link created"
        );

        let signer = RequestSigner::new(credential, target.content_type.clone());
        Ok(Self {
            executor: Arc::new(Executor::new(transport, signer, resolver, policy)),
        })
    }

    /// Replace how the link waits between retries.
    pub fn with_delay(self, delay: DelayFn) -> Self {
        let executor = Arc::unwrap_or_clone(self.executor).with_delay(delay);
        Self {
            executor: Arc::new(executor),
        }
    }

    pub fn get<P: Serialize>(&self, payload: P) -> Pending {
        self.deferred(HttpMethod::Get, payload)
    }

    pub fn post<P: Serialize>(&self, payload: P) -> Pending {
        self.deferred(HttpMethod::Post, payload)
    }

    pub fn put<P: Serialize>(&self, payload: P) -> Pending {
        self.deferred(HttpMethod::Put, payload)
    }

    pub fn delete<P: Serialize>(&self, payload: P) -> Pending {
        self.deferred(HttpMethod::Delete, payload)
    }

    /// Run a GET and hand the outcome to `callback`.
    ///
    /// The callback is always invoked exactly once, with
    /// [`RestletError::Interrupted`] if the request task panicked.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, like `tokio::spawn`. The
    /// other `*_with` methods and the deferred forms behave the same way.
    pub fn get_with<P, F>(&self, payload: P, callback: F)
    where
        P: Serialize,
        F: FnOnce(RestletResult<Value>) + Send + 'static,
    {
        self.dispatch(HttpMethod::Get, payload, callback);
    }

    pub fn post_with<P, F>(&self, payload: P, callback: F)
    where
        P: Serialize,
        F: FnOnce(RestletResult<Value>) + Send + 'static,
    {
        self.dispatch(HttpMethod::Post, payload, callback);
    }

    pub fn put_with<P, F>(&self, payload: P, callback: F)
    where
        P: Serialize,
        F: FnOnce(RestletResult<Value>) + Send + 'static,
    {
        self.dispatch(HttpMethod::Put, payload, callback);
    }

    pub fn delete_with<P, F>(&self, payload: P, callback: F)
    where
        P: Serialize,
        F: FnOnce(RestletResult<Value>) + Send + 'static,
    {
        self.dispatch(HttpMethod::Delete, payload, callback);
    }

    /// Start a call on the current tokio runtime and report its outcome to `callback`.
    ///
    /// The call runs to completion even if nobody waits for it.
    fn dispatch<P, F>(&self, method: HttpMethod, payload: P, callback: F)
    where
        P: Serialize,
        F: FnOnce(RestletResult<Value>) + Send + 'static,
    {
        let payload = serde_json::to_value(payload).map_err(RestletError::Encode);
        let executor = Arc::clone(&self.executor);
        let span = tracing::debug_span!("restlet_call", call_id = %Uuid::new_v4(), %method);

        tokio::spawn(
            async move {
                let outcome = match payload {
                    Ok(payload) => {
                        let call = tokio::spawn(
                            async move { executor.execute(method, &payload).await }
                                .in_current_span(),
                        );
                        match call.await {
                            Ok(outcome) => outcome,
                            Err(e) => {
                                tracing::warn!(error = %e, "Request task failed");
                                Err(RestletError::Interrupted)
                            }
                        }
                    }
                    Err(e) => Err(e),
                };
                callback(outcome);
            }
            .instrument(span),
        );
    }

    fn deferred<P: Serialize>(&self, method: HttpMethod, payload: P) -> Pending {
        let (tx, rx) = oneshot::channel();
        self.dispatch(method, payload, move |outcome| {
            // the receiver may already be gone; the outcome is then discarded
            let _ = tx.send(outcome);
        });
        Pending { rx }
    }
}

/// Build a link with the default transport.
pub fn create_link(
    account: Option<&AccountSettings>,
    target: &TargetSettings,
) -> Result<RestletLink, ConfigurationError> {
    RestletLink::new(account, target)
}

/// Deferred outcome of a call.
///
/// Dropping it does not cancel the call.
#[derive(Debug)]
#[must_use = "the outcome of the call is lost unless the future is awaited"]
pub struct Pending {
    rx: oneshot::Receiver<RestletResult<Value>>,
}

impl Future for Pending {
    type Output = RestletResult<Value>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(RestletError::Interrupted)))
    }
}
