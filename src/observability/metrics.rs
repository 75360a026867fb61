//! Metrics collection.
//!
//! # Metrics
//! - `restlet_attempts_total` (counter): every transport call, by method
//! - `restlet_retries_total` (counter): scheduled retries, by method
//! - `restlet_requests_total` (counter): finished calls, by method and outcome
//! - `restlet_request_duration_seconds` (histogram): call latency including retries
//! - `restlet_discovery_fallbacks_total` (counter): failed domain lookups

use std::time::Instant;

use metrics::{counter, histogram};

use crate::transport::HttpMethod;

pub fn record_attempt(method: HttpMethod) {
    counter!("restlet_attempts_total", "method" => method.as_str()).increment(1);
}

pub fn record_retry(method: HttpMethod) {
    counter!("restlet_retries_total", "method" => method.as_str()).increment(1);
}

pub fn record_request(method: HttpMethod, success: bool, started: Instant) {
    let outcome = if success { "success" } else { "error" };
    counter!(
        "restlet_requests_total",
        "method" => method.as_str(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("restlet_request_duration_seconds", "method" => method.as_str())
        .record(started.elapsed().as_secs_f64());
}

pub fn record_discovery_fallback() {
    counter!("restlet_discovery_fallbacks_total").increment(1);
}
