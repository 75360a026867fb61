//! Retry-orchestrating executor.
//!
//! # Responsibilities
//! - Resolve the target URL once per call
//! - Sign and send each attempt through the transport
//! - Retry transient failures within the attempt budget, waiting between attempts
//!
//! # Attempt Loop
//! ```text
//! attempts_remaining = max_attempts - 1
//! loop:
//!     send → classify
//!     Ok                                  → done
//!     retryable && attempts_remaining > 0 → wait (if backoff configured), attempts_remaining -= 1
//!     otherwise                           → error delivered
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::auth::RequestSigner;
use crate::error::RestletResult;
use crate::http::request::RequestContext;
use crate::http::response::classify;
use crate::observability::metrics;
use crate::resilience::RetryPolicy;
use crate::target::TargetResolver;
use crate::transport::{HttpMethod, Transport};

pub type DelayFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Waits for the given duration. Injected so tests can observe backoff.
pub type DelayFn = Arc<dyn Fn(Duration) -> DelayFuture + Send + Sync>;

/// Delay backed by the tokio timer.
pub fn tokio_delay() -> DelayFn {
    Arc::new(|duration: Duration| -> DelayFuture { Box::pin(tokio::time::sleep(duration)) })
}

/// Runs calls for one link. Holds only immutable state.
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    signer: RequestSigner,
    resolver: TargetResolver,
    policy: RetryPolicy,
    delay: DelayFn,
}

impl Executor {
    pub fn new(
        transport: Arc<dyn Transport>,
        signer: RequestSigner,
        resolver: TargetResolver,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            signer,
            resolver,
            policy,
            delay: tokio_delay(),
        }
    }

    pub fn with_delay(mut self, delay: DelayFn) -> Self {
        self.delay = delay;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn resolver(&self) -> &TargetResolver {
        &self.resolver
    }

    /// Perform one call, retrying transient failures.
    pub async fn execute(&self, method: HttpMethod, payload: &Value) -> RestletResult<Value> {
        let started = Instant::now();
        let base_url = self.resolver.resolve(self.transport.as_ref()).await;
        let mut context =
            RequestContext::new(method, payload, &base_url, self.policy.max_attempts())?;
        let mut attempt: u32 = 1;

        let outcome = loop {
            tracing::debug!(attempt, url = %context.url, "Sending request");
            metrics::record_attempt(method);

            let sent = self.transport.send(context.signed(&self.signer)).await;
            match classify(method, sent) {
                Ok(body) => break Ok(body),
                Err(e) if e.is_retryable() && context.attempts_remaining > 0 => {
                    let delay = self.policy.delay_before_retry(context.attempts_remaining);
                    tracing::info!(
                        attempt,
                        attempts_remaining = context.attempts_remaining,
                        delay = ?delay,
                        error = %e,
                        "Retrying request"
                    );
                    metrics::record_retry(method);

                    if let Some(delay) = delay {
                        (self.delay)(delay).await;
                    }
                    context.attempts_remaining -= 1;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "Request failed");
                    break Err(e);
                }
            }
        };

        metrics::record_request(method, outcome.is_ok(), started);
        outcome
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("credential", self.signer.credential())
            .field("target", self.resolver.target())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
