//! reqwest-backed transport.
//!
//! # Responsibilities
//! - Execute a [`TransportRequest`] with a shared reqwest client
//! - Report every HTTP status as a response; only network failures are errors
//! - Name network failures with the codes the retry rule understands
//!
//! # Error Codes
//! ```text
//! client timeout, io TimedOut               → ETIMEDOUT
//! io ConnectionReset/Aborted, BrokenPipe    → ECONNRESET
//! connection closed before message complete → ECONNRESET
//! io ConnectionRefused                      → ECONNREFUSED (not retried)
//! anything else (DNS, TLS, ...)             → error text only (not retried)
//! ```

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::config::schema::TransportConfig;
use crate::error::ConfigurationError;
use crate::transport::{HttpMethod, Transport, TransportError, TransportRequest, TransportResponse};

/// Default [`Transport`] built on reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, ConfigurationError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone());
        if config.no_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| ConfigurationError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self.client.request(to_reqwest(request.method), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(describe)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(describe)?;

        tracing::trace!(status, bytes = body.len(), "Response received");
        Ok(TransportResponse { status, body })
    }
}

fn to_reqwest(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Prefix the message with the network error code, when one applies.
fn describe(err: reqwest::Error) -> TransportError {
    let code = if err.is_timeout() {
        Some("ETIMEDOUT")
    } else {
        error_code(&err)
    };

    let text = error_chain(&err);
    match code {
        Some(code) => TransportError::new(format!("{}: {}", code, text)),
        None => TransportError::new(text),
    }
}

/// Walk the source chain to the io or hyper error that caused the failure.
fn error_code(err: &(dyn StdError + 'static)) -> Option<&'static str> {
    let mut current = Some(err);
    while let Some(cause) = current {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe => return Some("ECONNRESET"),
                io::ErrorKind::TimedOut => return Some("ETIMEDOUT"),
                io::ErrorKind::ConnectionRefused => return Some("ECONNREFUSED"),
                _ => {}
            }
        }
        if let Some(hyper_err) = cause.downcast_ref::<hyper::Error>() {
            if hyper_err.is_incomplete_message() {
                return Some("ECONNRESET");
            }
        }
        current = cause.source();
    }
    None
}

/// `outer: inner: root` rendering of an error and its sources.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut text = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        current = cause.source();
    }
    text
}
