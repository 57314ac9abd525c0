use base64::{engine::general_purpose::STANDARD, Engine as _};
use httpmock::prelude::*;
use rtsp_to_web_client::{
    get_adaptive_client_with_diagnostics, DiagnosticsRegistry, OfferClient, ServerKind,
};
use serde_json::json;
use std::collections::BTreeMap;

const OFFER_SDP: &str = "v=0\r\no=carol 28908764872 28908764872 IN IP4 100.3.6.6\r\n...";
const ANSWER_SDP: &str = "v=0\r\no=bob 2890844730 2890844730 IN IP4 h.example.com\r\n...";
const RTSP_URL: &str = "rtsp://example";

fn counters(entries: &[(&str, u64)]) -> BTreeMap<String, u64> {
    entries
        .iter()
        .map(|(key, count)| (key.to_string(), *count))
        .collect()
}

#[tokio::test]
async fn test_adaptive_web_client() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/streams");
            then.status(200).json_body(json!({"status": 1, "payload": {}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/static");
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/stream/Y7L7SZDOZXHIYFHESPL7YPKXHI======/add");
            then.status(200)
                .json_body(json!({"status": 1, "payload": "success"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/stream/Y7L7SZDOZXHIYFHESPL7YPKXHI======/channel/0/webrtc");
            then.status(200).body(STANDARD.encode(ANSWER_SDP));
        })
        .await;

    let registry = DiagnosticsRegistry::new();
    let client =
        get_adaptive_client_with_diagnostics(reqwest::Client::new(), &server.base_url(), &registry)
            .await
            .unwrap();
    assert_eq!(client.kind(), ServerKind::Web);

    let answer_sdp = client.offer(OFFER_SDP, RTSP_URL).await.unwrap();
    assert_eq!(answer_sdp, ANSWER_SDP);

    let diagnostics = registry.snapshot();
    assert_eq!(
        diagnostics["discovery"],
        counters(&[("attempt", 1), ("web.success", 1), ("webrtc.failure", 1)])
    );
    assert_eq!(
        diagnostics["web"],
        counters(&[
            ("add_stream.request", 1),
            ("add_stream.success", 1),
            ("heartbeat.request", 1),
            ("heartbeat.success", 1),
            ("list_streams.request", 1),
            ("list_streams.success", 1),
            ("webrtc.request", 1),
            ("webrtc.success", 1),
        ])
    );
    assert_eq!(
        diagnostics["webrtc"],
        counters(&[("heartbeat.request", 1), ("heartbeat.response_error", 1)])
    );
}

#[tokio::test]
async fn test_adaptive_both_succeed_web_client() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/streams");
            then.status(200).json_body(json!({"status": 1, "payload": {}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/static");
            then.status(200);
        })
        .await;

    let registry = DiagnosticsRegistry::new();
    let client =
        get_adaptive_client_with_diagnostics(reqwest::Client::new(), &server.base_url(), &registry)
            .await
            .unwrap();

    assert_eq!(client.kind(), ServerKind::Web);
    assert_eq!(
        registry.snapshot()["discovery"],
        counters(&[("attempt", 1), ("web.success", 1), ("webrtc.success", 1)])
    );
}

#[tokio::test]
async fn test_adaptive_webrtc_client() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/streams");
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/static");
            then.status(200);
        })
        .await;
    let stream_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/stream");
            then.status(200)
                .json_body(json!({"sdp64": STANDARD.encode(ANSWER_SDP)}));
        })
        .await;

    let registry = DiagnosticsRegistry::new();
    let client =
        get_adaptive_client_with_diagnostics(reqwest::Client::new(), &server.base_url(), &registry)
            .await
            .unwrap();
    assert_eq!(client.kind(), ServerKind::WebRtc);

    let answer_sdp = client.offer(OFFER_SDP, RTSP_URL).await.unwrap();
    assert_eq!(answer_sdp, ANSWER_SDP);
    stream_mock.assert_hits_async(1).await;

    let diagnostics = registry.snapshot();
    assert_eq!(
        diagnostics["discovery"],
        counters(&[("attempt", 1), ("web.failure", 1), ("webrtc.success", 1)])
    );
    assert_eq!(
        diagnostics["web"],
        counters(&[("heartbeat.request", 1), ("heartbeat.response_error", 1)])
    );
    assert_eq!(
        diagnostics["webrtc"],
        counters(&[
            ("heartbeat.request", 1),
            ("heartbeat.success", 1),
            ("stream.request", 1),
            ("stream.success", 1),
        ])
    );
}

#[tokio::test]
async fn test_adaptive_both_fail() {
    // No mocks registered: every request gets a 404.
    let server = MockServer::start_async().await;

    let registry = DiagnosticsRegistry::new();
    let result =
        get_adaptive_client_with_diagnostics(reqwest::Client::new(), &server.base_url(), &registry)
            .await;

    let err = match result {
        Ok(client) => panic!("expected discovery to fail, got {}", client.kind()),
        Err(err) => err,
    };
    assert!(err.is_response_error());
    assert!(err.to_string().starts_with("RTSPtoWebRTC server failure"));
    assert_eq!(
        registry.snapshot()["discovery"],
        counters(&[("attempt", 1), ("web.failure", 1), ("webrtc.failure", 1)])
    );
}

#[tokio::test]
async fn test_adaptive_unreachable_server() {
    let registry = DiagnosticsRegistry::new();
    let result =
        get_adaptive_client_with_diagnostics(reqwest::Client::new(), "http://127.0.0.1:1", &registry)
            .await;

    let err = match result {
        Ok(client) => panic!("expected discovery to fail, got {}", client.kind()),
        Err(err) => err,
    };
    assert!(!err.is_response_error());
    assert_eq!(registry.webrtc().get("heartbeat.client_error"), 1);
    assert_eq!(registry.web().get("heartbeat.client_error"), 1);
}
