//! Request construction.
//!
//! # Responsibilities
//! - Encode GET/DELETE payloads as a query string
//! - Encode POST/PUT payloads as a JSON body
//! - Carry the per-call attempt budget
//!
//! # Design Decisions
//! - Nested values use bracket notation (`a[b]=c`, `a[0]=x`)
//! - Keys and values are RFC 3986 percent-encoded
//! - Non-object payloads produce an empty query string

use serde_json::Value;

use crate::auth::RequestSigner;
use crate::error::{RestletError, RestletResult};
use crate::transport::{HttpMethod, TransportRequest};

/// State of one call, shared by all of its attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub method: HttpMethod,
    /// Resolved URL, including the query string for GET/DELETE.
    pub url: String,
    /// JSON body for POST/PUT.
    pub body: Option<String>,
    /// Attempts still allowed after the current one.
    pub attempts_remaining: u32,
}

impl RequestContext {
    pub fn new(
        method: HttpMethod,
        payload: &Value,
        base_url: &str,
        max_attempts: u32,
    ) -> RestletResult<Self> {
        let (url, body) = if method.uses_query() {
            (append_query(base_url, &encode_query(payload)), None)
        } else {
            let body = serde_json::to_string(payload).map_err(RestletError::Encode)?;
            (base_url.to_string(), Some(body))
        };

        Ok(Self {
            method,
            url,
            body,
            attempts_remaining: max_attempts.saturating_sub(1),
        })
    }

    /// A signed request for the next attempt.
    pub fn signed(&self, signer: &RequestSigner) -> TransportRequest {
        TransportRequest {
            method: self.method,
            url: self.url.clone(),
            headers: signer.headers(self.method, &self.url),
            body: self.body.clone(),
        }
    }
}

/// Serialize a payload as a query string.
pub fn encode_query(payload: &Value) -> String {
    let mut pairs = Vec::new();
    if let Value::Object(map) = payload {
        for (key, value) in map {
            flatten(key.clone(), value, &mut pairs);
        }
    }

    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn flatten(prefix: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten(format!("{}[{}]", prefix, key), nested, out);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                flatten(format!("{}[{}]", prefix, index), nested, out);
            }
        }
        Value::Null => out.push((prefix, String::new())),
        Value::String(text) => out.push((prefix, text.clone())),
        other => out.push((prefix, other.to_string())),
    }
}

/// Append a query string, choosing `?` or `&` as needed.
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let separator = if url.ends_with('?') || url.ends_with('&') {
        ""
    } else if url.contains('?') {
        "&"
    } else {
        "?"
    };
    format!("{}{}{}", url, separator, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://tstdrv1.restlets.api.netsuite.com/app/site/hosting/restlet.nl?script=42&deploy=1";

    #[test]
    fn test_flat_query() {
        assert_eq!(encode_query(&json!({"id": 12345, "record": "salesord"})), "id=12345&record=salesord");
    }

    #[test]
    fn test_nested_query() {
        let query = encode_query(&json!({"filter": {"status": "open"}, "flag": true, "ids": [1, 2], "note": null}));
        assert_eq!(
            query,
            "filter%5Bstatus%5D=open&flag=true&ids%5B0%5D=1&ids%5B1%5D=2&note="
        );
    }

    #[test]
    fn test_values_are_percent_encoded() {
        assert_eq!(encode_query(&json!({"q": "a b&c"})), "q=a%20b%26c");
    }

    #[test]
    fn test_non_object_payload() {
        assert_eq!(encode_query(&json!("hi")), "");
        assert_eq!(encode_query(&json!({})), "");
    }

    #[test]
    fn test_append_query() {
        assert_eq!(append_query(BASE, "id=1"), format!("{}&id=1", BASE));
        assert_eq!(append_query("https://x.test/r", "id=1"), "https://x.test/r?id=1");
        assert_eq!(append_query(BASE, ""), BASE);
    }

    #[test]
    fn test_get_context() {
        let ctx = RequestContext::new(HttpMethod::Get, &json!({"message": "hi"}), BASE, 3).unwrap();
        assert_eq!(ctx.url, format!("{}&message=hi", BASE));
        assert_eq!(ctx.body, None);
        assert_eq!(ctx.attempts_remaining, 2);
    }

    #[test]
    fn test_post_context() {
        let ctx = RequestContext::new(HttpMethod::Post, &json!({"message": "hi"}), BASE, 1).unwrap();
        assert_eq!(ctx.url, BASE);
        assert_eq!(ctx.body.as_deref(), Some("{\"message\":\"hi\"}"));
        assert_eq!(ctx.attempts_remaining, 0);
    }
}
