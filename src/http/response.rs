//! Response classification.
//!
//! # Responsibilities
//! - Turn transport failures into [`RestletError::Transport`]
//! - Decode bodies (strictly for GET/DELETE, leniently for POST/PUT)
//! - Detect `{"error": {"code": ...}}` envelopes, whatever the HTTP status
//!
//! # Design Decisions
//! - HTTP status codes are not inspected; the envelope is the error signal
//! - POST/PUT bodies that are not JSON pass through as a JSON string

use serde_json::Value;

use crate::error::{RestletError, RestletResult};
use crate::transport::{HttpMethod, TransportError, TransportResponse};

/// The `error` object embedded in a response body.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteFault {
    pub code: String,
    pub message: Option<String>,
    pub details: Value,
}

/// Extract an embedded error envelope, if the body carries one with a code.
pub fn embedded_error(body: &Value) -> Option<RemoteFault> {
    let error = body.get("error")?;
    let code = match error.get("code")? {
        Value::String(code) if !code.is_empty() => code.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    Some(RemoteFault {
        code,
        message: error.get("message").and_then(Value::as_str).map(str::to_string),
        details: error.clone(),
    })
}

/// Classify the outcome of one attempt.
pub fn classify(
    method: HttpMethod,
    outcome: Result<TransportResponse, TransportError>,
) -> RestletResult<Value> {
    let response = outcome.map_err(|e| RestletError::Transport { message: e.message })?;
    let body = decode_body(method, &response.body)?;

    if let Some(fault) = embedded_error(&body) {
        return Err(RestletError::Remote {
            code: fault.code,
            message: fault.message,
            details: fault.details,
        });
    }

    Ok(body)
}

fn decode_body(method: HttpMethod, raw: &str) -> RestletResult<Value> {
    if raw.is_empty() {
        return Ok(Value::String(String::new()));
    }
    if method.uses_query() {
        serde_json::from_str(raw).map_err(RestletError::Decode)
    } else {
        Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
    }
}
