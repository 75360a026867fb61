//! OAuth 1.0a request signing with HMAC-SHA256.
//!
//! # Responsibilities
//! - Build the signature base string (method, base URL, sorted parameters)
//! - Sign it with `enc(consumer_secret)&enc(token_secret)`
//! - Render the `Authorization: OAuth ...` header value

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::Sha256;
use url::Url;

use crate::transport::HttpMethod;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_METHOD: &str = "HMAC-SHA256";
pub const OAUTH_VERSION: &str = "1.0";
const NONCE_LEN: usize = 32;

/// Consumer and token key pairs.
#[derive(Clone, Copy)]
pub struct OAuth1Keys<'a> {
    pub consumer_key: &'a str,
    pub consumer_secret: &'a str,
    pub token_key: &'a str,
    pub token_secret: &'a str,
}

/// Per-request values that must never repeat.
#[derive(Debug, Clone)]
pub struct Freshness {
    pub nonce: String,
    pub timestamp: u64,
}

impl Freshness {
    /// Random 32 character nonce and the current unix time.
    pub fn generate() -> Self {
        let nonce = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self { nonce, timestamp }
    }
}

/// RFC 3986 percent-encoding; only unreserved characters pass through.
pub fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Compute the `Authorization` header value for one request.
pub fn authorization_header(
    keys: OAuth1Keys<'_>,
    method: HttpMethod,
    url: &str,
    freshness: &Freshness,
) -> String {
    let timestamp = freshness.timestamp.to_string();
    let mut oauth_params = vec![
        ("oauth_consumer_key", keys.consumer_key),
        ("oauth_nonce", freshness.nonce.as_str()),
        ("oauth_signature_method", SIGNATURE_METHOD),
        ("oauth_timestamp", timestamp.as_str()),
        ("oauth_token", keys.token_key),
        ("oauth_version", OAUTH_VERSION),
    ];

    let (base_url, query_params) = split_url(url);
    let base_string = signature_base(method, &base_url, &query_params, &oauth_params);
    let signing_key = format!("{}&{}", encode(keys.consumer_secret), encode(keys.token_secret));
    let signature = sign(&signing_key, &base_string);

    oauth_params.push(("oauth_signature", signature.as_str()));
    oauth_params.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let fields: Vec<String> = oauth_params
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", key, encode(value)))
        .collect();
    format!("OAuth {}", fields.join(", "))
}

/// Base URL without query or fragment, plus the decoded query parameters.
fn split_url(url: &str) -> (String, Vec<(String, String)>) {
    match Url::parse(url) {
        Ok(mut parsed) => {
            let params = parsed.query_pairs().into_owned().collect();
            parsed.set_query(None);
            parsed.set_fragment(None);
            (parsed.to_string(), params)
        }
        Err(_) => {
            let base = url.split('?').next().unwrap_or(url);
            (base.to_string(), Vec::new())
        }
    }
}

fn signature_base(
    method: HttpMethod,
    base_url: &str,
    query_params: &[(String, String)],
    oauth_params: &[(&str, &str)],
) -> String {
    let mut encoded: Vec<(String, String)> = query_params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .chain(oauth_params.iter().map(|(k, v)| (encode(k), encode(v))))
        .collect();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str(),
        encode(base_url),
        encode(&parameter_string)
    )
}

fn sign(key: &str, base_string: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(base_string.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://tstdrv1.restlets.api.netsuite.com/app/site/hosting/restlet.nl?script=12&deploy=1&name=a%20b";

    fn keys() -> OAuth1Keys<'static> {
        OAuth1Keys {
            consumer_key: "ck",
            consumer_secret: "cs",
            token_key: "tk",
            token_secret: "ts",
        }
    }

    fn fixed() -> Freshness {
        Freshness {
            nonce: "abcdefghijklmnopqrstuvwxyz012345".to_string(),
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_signature_base_string() {
        let (base_url, query) = split_url(URL);
        assert_eq!(
            base_url,
            "https://tstdrv1.restlets.api.netsuite.com/app/site/hosting/restlet.nl"
        );
        let base = signature_base(
            HttpMethod::Get,
            &base_url,
            &query,
            &[
                ("oauth_consumer_key", "ck"),
                ("oauth_nonce", "abcdefghijklmnopqrstuvwxyz012345"),
                ("oauth_signature_method", SIGNATURE_METHOD),
                ("oauth_timestamp", "1700000000"),
                ("oauth_token", "tk"),
                ("oauth_version", OAUTH_VERSION),
            ],
        );
        assert_eq!(
            base,
            "GET&https%3A%2F%2Ftstdrv1.restlets.api.netsuite.com%2Fapp%2Fsite%2Fhosting%2Frestlet.nl&deploy%3D1%26name%3Da%2520b%26oauth_consumer_key%3Dck%26oauth_nonce%3Dabcdefghijklmnopqrstuvwxyz012345%26oauth_signature_method%3DHMAC-SHA256%26oauth_timestamp%3D1700000000%26oauth_token%3Dtk%26oauth_version%3D1.0%26script%3D12"
        );
    }

    #[test]
    fn test_known_signature() {
        let header = authorization_header(keys(), HttpMethod::Get, URL, &fixed());
        assert_eq!(
            header,
            "OAuth oauth_consumer_key=\"ck\", oauth_nonce=\"abcdefghijklmnopqrstuvwxyz012345\", \
             oauth_signature=\"TwareAVJxCBEW2uSIX07euWwKr79wZDemb7du3UhMy8%3D\", \
             oauth_signature_method=\"HMAC-SHA256\", oauth_timestamp=\"1700000000\", \
             oauth_token=\"tk\", oauth_version=\"1.0\""
        );
    }

    #[test]
    fn test_method_changes_signature() {
        let get = authorization_header(keys(), HttpMethod::Get, URL, &fixed());
        let post = authorization_header(keys(), HttpMethod::Post, URL, &fixed());
        assert_ne!(get, post);
    }

    #[test]
    fn test_nonce_shape() {
        let a = Freshness::generate();
        let b = Freshness::generate();
        assert_eq!(a.nonce.len(), 32);
        assert!(a.nonce.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a.nonce, b.nonce);
        assert!(a.timestamp > 1_600_000_000);
    }

    #[test]
    fn test_encode_reserved_characters() {
        assert_eq!(encode("a b&c=d/e~f"), "a%20b%26c%3Dd%2Fe~f");
    }
}
