//! End-to-end calls through the reqwest transport against a mock server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use restlet_link::config::TransportConfig;
use restlet_link::target::resolver::RESTLET_PATH;
use restlet_link::{ReqwestTransport, RestletError, RestletLink, TargetSettings};

mod common;

use common::{nlauth_account, oauth_account};

fn restlet_url(server: &MockServer) -> String {
    format!("{}{}?script=42&deploy=1", server.uri(), RESTLET_PATH)
}

fn transport(timeout_secs: u64) -> Arc<ReqwestTransport> {
    let config = TransportConfig {
        timeout_secs,
        ..TransportConfig::default()
    };
    Arc::new(ReqwestTransport::new(&config).unwrap())
}

fn authorization(request: &wiremock::Request) -> String {
    request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_post_sends_json_body_and_nlauth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RESTLET_PATH))
        .and(query_param("script", "42"))
        .and(query_param("deploy", "1"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"message": "hi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let link = RestletLink::with_transport(
        Some(&nlauth_account()),
        &TargetSettings::from_url(restlet_url(&server)),
        transport(5),
    )
    .unwrap();

    let body = link.post(json!({"message": "hi"})).await.unwrap();
    assert_eq!(body, json!({"success": true}));

    let received = server.received_requests().await.unwrap();
    assert_eq!(
        authorization(&received[0]),
        "NLAuth nlauth_account=TSTDRV1,nlauth_email=ops@example.com,nlauth_signature=hunter2"
    );
}

#[tokio::test]
async fn test_get_sends_payload_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESTLET_PATH))
        .and(query_param("script", "42"))
        .and(query_param("record", "salesorder"))
        .and(query_param("filter[status]", "open"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let link = RestletLink::with_transport(
        Some(&oauth_account()),
        &TargetSettings::from_url(restlet_url(&server)),
        transport(5),
    )
    .unwrap();

    let body = link
        .get(json!({"record": "salesorder", "filter": {"status": "open"}}))
        .await
        .unwrap();
    assert_eq!(body, json!({"count": 3}));

    let received = server.received_requests().await.unwrap();
    let auth = authorization(&received[0]);
    assert!(auth.starts_with("OAuth "));
    assert!(auth.ends_with("realm=\"TSTDRV1\""));
}

#[tokio::test]
async fn test_embedded_error_is_retried_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(RESTLET_PATH))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": {"code": "SSS_REQUEST_LIMIT_EXCEEDED"}})),
        )
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(RESTLET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updated": true})))
        .expect(1)
        .mount(&server)
        .await;

    let link = RestletLink::with_transport(
        Some(&nlauth_account()),
        &TargetSettings::from_url(restlet_url(&server)).with_backoff(1),
        transport(5),
    )
    .unwrap();

    let body = link.put(json!({"id": 1})).await.unwrap();
    assert_eq!(body, json!({"updated": true}));
}

#[tokio::test]
async fn test_http_error_status_without_envelope_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(RESTLET_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"deleted": false})))
        .expect(1)
        .mount(&server)
        .await;

    let link = RestletLink::with_transport(
        Some(&nlauth_account()),
        &TargetSettings::from_url(restlet_url(&server)),
        transport(5),
    )
    .unwrap();

    assert_eq!(
        link.delete(json!({"id": 1})).await.unwrap(),
        json!({"deleted": false})
    );
}

#[tokio::test]
async fn test_non_json_get_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let link = RestletLink::with_transport(
        Some(&nlauth_account()),
        &TargetSettings::from_url(restlet_url(&server)),
        transport(5),
    )
    .unwrap();

    let err = link.get(json!({})).await.unwrap_err();
    assert!(matches!(err, RestletError::Decode(_)));
}

#[tokio::test]
async fn test_discovered_domain_is_called() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/datacenterurls"))
        .and(query_param("account", "TSTDRV1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "restDomain": server.uri(),
            "webservicesDomain": server.uri(),
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RESTLET_PATH))
        .and(query_param("script", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let target = TargetSettings::from_script("42", "1")
        .with_discovery(Some(format!("{}/rest/datacenterurls", server.uri())));
    let link = RestletLink::with_transport(Some(&nlauth_account()), &target, transport(5)).unwrap();

    assert_eq!(link.post(json!({})).await.unwrap(), json!({"ok": 1}));
}

#[tokio::test]
async fn test_timeout_is_reported_as_etimedout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let link = RestletLink::with_transport(
        Some(&nlauth_account()),
        &TargetSettings::from_url(restlet_url(&server)).with_retries(1),
        transport(1),
    )
    .unwrap();

    let err = link.get(json!({})).await.unwrap_err();
    assert!(err.error_message().unwrap().starts_with("ETIMEDOUT"));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_reset_connections_use_the_attempt_budget() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            #[allow(deprecated)]
            let _ = socket.set_linger(Some(Duration::ZERO));
        }
    });

    let url = format!("http://{}{}?script=42&deploy=1", addr, RESTLET_PATH);
    let link = RestletLink::with_transport(
        Some(&nlauth_account()),
        &TargetSettings::from_url(url),
        transport(5),
    )
    .unwrap();

    let err = link.post(json!({})).await.unwrap_err();
    assert!(err.is_retryable(), "{}", err);
    assert_eq!(accepted.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_refused_connection_fails_fast() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{}{}?script=42&deploy=1", addr, RESTLET_PATH);
    let link = RestletLink::with_transport(
        Some(&nlauth_account()),
        &TargetSettings::from_url(url).with_retries(5).with_backoff(1000),
        transport(5),
    )
    .unwrap();

    let started = std::time::Instant::now();
    let err = link.get(json!({})).await.unwrap_err();
    assert!(!err.is_retryable(), "{}", err);
    assert!(started.elapsed() < Duration::from_secs(1));
}
