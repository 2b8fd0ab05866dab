#![allow(clippy::unwrap_used)]
// Integration tests for `NtopClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flowdash_api::{Error, NtopClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, NtopClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = NtopClient::with_client(
        reqwest::Client::new(),
        base_url,
        1,
        "admin",
        "test-password".to_string().into(),
    );
    (server, client)
}

// ── Envelope handling ───────────────────────────────────────────────

#[tokio::test]
async fn unwraps_rsp_payload() {
    let (server, client) = setup().await;

    let envelope = json!({
        "rc": 0,
        "rc_str": "OK",
        "rsp": { "ifid": 1, "ifname": "eth1", "num_hosts": 42 }
    });

    Mock::given(method("GET"))
        .and(path("/lua/rest/v2/get/interface/data.lua"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let data = client.interface_data().await.unwrap();

    assert_eq!(data["ifname"], "eth1");
    assert_eq!(data["num_hosts"], 42);
    // Envelope fields must be stripped.
    assert!(data.get("rc").is_none());
}

#[tokio::test]
async fn passes_through_unwrapped_body() {
    let (server, client) = setup().await;

    // Older builds skip the envelope on some endpoints.
    let body = json!({ "ifname": "eth0", "num_flows": 7 });

    Mock::given(method("GET"))
        .and(path("/lua/rest/v2/get/interface/data.lua"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let data = client.interface_data().await.unwrap();

    assert_eq!(data["num_flows"], 7);
}

#[tokio::test]
async fn nonzero_rc_is_an_api_error() {
    let (server, client) = setup().await;

    let envelope = json!({
        "rc": -1,
        "rc_str": "Invalid interface",
        "rsp": {}
    });

    Mock::given(method("GET"))
        .and(path("/lua/rest/v2/get/interface/data.lua"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let result = client.interface_data().await;

    match result {
        Err(Error::Api { rc, ref message }) => {
            assert_eq!(rc, -1);
            assert!(message.contains("Invalid interface"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn nonzero_rc_falls_back_to_rc_str_hr() {
    let (server, client) = setup().await;

    let envelope = json!({ "rc": 2, "rc_str_hr": "Not granted" });

    Mock::given(method("GET"))
        .and(path("/lua/rest/v2/get/interface/data.lua"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    match client.interface_data().await {
        Err(Error::Api { ref message, .. }) => assert_eq!(message, "Not granted"),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Query construction ──────────────────────────────────────────────

#[tokio::test]
async fn every_request_carries_the_interface_selector() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/lua/rest/v2/get/host/active.lua"))
        .and(query_param("ifid", "1"))
        .and(query_param("perPage", "15"))
        .and(query_param("sortColumn", "bytes"))
        .and(query_param("sortOrder", "desc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "rc": 0, "rsp": { "data": [] } })),
        )
        .mount(&server)
        .await;

    client.active_hosts(15).await.unwrap();
}

#[tokio::test]
async fn caller_params_override_defaults() {
    let (server, client) = setup().await;

    // A caller-supplied ifid must win over the configured one.
    Mock::given(method("GET"))
        .and(path("/lua/rest/v2/get/interface/data.lua"))
        .and(query_param("ifid", "9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rc": 0, "rsp": {} })))
        .mount(&server)
        .await;

    client
        .request(
            "/lua/rest/v2/get/interface/data.lua",
            &[("ifid", "9".into())],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn sends_basic_auth_credentials() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(basic_auth("admin", "test-password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rc": 0, "rsp": {} })))
        .mount(&server)
        .await;

    client.interface_data().await.unwrap();
}

// ── Transport failures ──────────────────────────────────────────────

#[tokio::test]
async fn http_error_status_is_a_protocol_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let result = client.interface_data().await;

    match result {
        Err(Error::Protocol { status, ref body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("Unauthorized"));
        }
        other => panic!("expected Protocol error, got: {other:?}"),
    }
}

#[tokio::test]
async fn multibyte_error_body_is_truncated_on_a_char_boundary() {
    let (server, client) = setup().await;

    // 199 ASCII characters put the 200th right on a two-byte 'é'.
    let body = format!("{}é and a long HTML tail that must be dropped", "a".repeat(199));
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string(body))
        .mount(&server)
        .await;

    let result = client.interface_data().await;

    match result {
        Err(Error::Protocol { status, ref body }) => {
            assert_eq!(status, 500);
            assert_eq!(body.chars().count(), 200);
            assert!(body.ends_with('é'));
        }
        other => panic!("expected Protocol error, got: {other:?}"),
    }
}

#[tokio::test]
async fn multibyte_garbage_body_is_a_deserialization_error() {
    let (server, client) = setup().await;

    let body = format!("{}日本語 not json", "x".repeat(198));
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let result = client.interface_data().await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn connection_refused_is_unreachable() {
    // Nothing listening on this port.
    let base_url = Url::parse("http://127.0.0.1:1").unwrap();
    let client = NtopClient::with_client(
        reqwest::Client::new(),
        base_url,
        0,
        "admin",
        "pw".to_string().into(),
    );

    let result = client.interface_data().await;

    match result {
        Err(Error::Unreachable { ref url, .. }) => assert!(url.contains("127.0.0.1:1")),
        other => panic!("expected Unreachable error, got: {other:?}"),
    }
}

#[tokio::test]
async fn garbage_body_is_a_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client.interface_data().await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}
