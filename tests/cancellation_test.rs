//! Identifier-scoped cancellation and pending-registry cleanup.

use restwrap::{ApiClient, CallOptions};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Arc<ApiClient> {
    Arc::new(
        ApiClient::builder()
            .base_url(server.uri())
            .show_default_message(false)
            .build()
            .expect("client builds"),
    )
}

fn ok_envelope(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 0, "data": data, "message": "ok"}))
}

#[tokio::test]
async fn test_cancel_previous_rejects_older_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ok_envelope(json!(["result"])).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let older = {
        let client = client.clone();
        tokio::spawn(async move {
            let options = CallOptions::default().request_id("search").cancel_previous(true);
            client.get("/search", None, Some(options)).await
        })
    };

    // let the older call register and go in flight
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(client.is_pending("search"));

    // a faster mock for the newer call
    let fast_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ok_envelope(json!(["fresh"])))
        .mount(&fast_server)
        .await;

    let options = CallOptions::default().request_id("search").cancel_previous(true);
    let newer = client
        .get(&format!("{}/search", fast_server.uri()), None, Some(options))
        .await
        .unwrap();
    assert_eq!(newer, json!(["fresh"]));

    let err = older.await.unwrap().unwrap_err();
    let reason = err.as_cancelled().expect("older call was cancelled");
    assert!(reason.contains("superseded"));

    // newer call settled: the identifier is free again
    assert!(!client.is_pending("search"));
}

#[tokio::test]
async fn test_manual_cancel_with_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/export"))
        .respond_with(ok_envelope(json!(null)).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let call = {
        let client = client.clone();
        tokio::spawn(async move {
            let options = CallOptions::default().request_id("export");
            client.get("/export", None, Some(options)).await
        })
    };

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(client.is_pending("export"));

    assert!(client.cancel("export", Some("user navigated away".to_string())));

    let err = call.await.unwrap().unwrap_err();
    assert_eq!(err.as_cancelled(), Some("user navigated away"));
    assert!(!err.is_network_error());
    assert!(!err.is_timeout_error());
    assert!(!client.is_pending("export"));
}

#[tokio::test]
async fn test_cancel_unknown_id_is_noop() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    assert!(!client.cancel("nothing-here", None));
}

#[tokio::test]
async fn test_registry_cleanup_after_success_and_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ok_envelope(json!(1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/boom"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let options = CallOptions::default().request_id("job");
    assert!(client.get("/ok", None, Some(options)).await.is_ok());
    assert!(!client.is_pending("job"));

    let options = CallOptions::default().request_id("job");
    assert!(client.get("/boom", None, Some(options)).await.is_err());
    assert!(!client.is_pending("job"));
}

#[tokio::test]
async fn test_cancellation_does_not_affect_other_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ok_envelope(json!("done")).set_delay(Duration::from_millis(600)))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let survivor = {
        let client = client.clone();
        tokio::spawn(async move {
            let options = CallOptions::default().request_id("a");
            client.get("/slow", None, Some(options)).await
        })
    };

    tokio::time::sleep(Duration::from_millis(150)).await;
    // cancelling an unrelated identifier leaves "a" untouched
    assert!(!client.cancel("b", None));

    let value = survivor.await.unwrap().unwrap();
    assert_eq!(value, json!("done"));
    assert!(!client.is_pending("a"));
}
