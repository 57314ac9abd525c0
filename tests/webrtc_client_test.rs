use base64::{engine::general_purpose::STANDARD, Engine as _};
use httpmock::prelude::*;
use rtsp_to_web_client::{ChannelData, Client, Diagnostics, OfferClient, ServerKind, WebRtcClient};
use serde_json::json;
use std::sync::Arc;

const RTSP_URL: &str = "rtsps://example";
const OFFER_SDP: &str = "v=0\r\no=carol 28908764872 28908764872 IN IP4 100.3.6.6\r\n...";
const OFFER_SDP64: &str =
    "dj0wDQpvPWNhcm9sIDI4OTA4NzY0ODcyIDI4OTA4NzY0ODcyIElOIElQNCAxMDAuMy42LjYNCi4uLg==";
const ANSWER_SDP: &str = "v=0\r\no=bob 2890844730 2890844730 IN IP4 h.example.com\r\n...";

fn client(server: &MockServer) -> (WebRtcClient, Arc<Diagnostics>) {
    let diagnostics = Arc::new(Diagnostics::new());
    let client = WebRtcClient::with_diagnostics(
        reqwest::Client::new(),
        &server.base_url(),
        Arc::clone(&diagnostics),
    )
    .unwrap();
    (client, diagnostics)
}

#[tokio::test]
async fn test_offer() {
    let server = MockServer::start_async().await;
    let stream_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/stream");
            then.status(200)
                .json_body(json!({"sdp64": STANDARD.encode(ANSWER_SDP)}));
        })
        .await;

    let (client, diagnostics) = client(&server);
    let answer_sdp = client.offer(OFFER_SDP, RTSP_URL).await.unwrap();

    stream_mock.assert_async().await;
    assert_eq!(answer_sdp, ANSWER_SDP);
    assert_eq!(diagnostics.get("stream.request"), 1);
    assert_eq!(diagnostics.get("stream.success"), 1);
}

#[tokio::test]
async fn test_response_missing_answer() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/stream");
            then.status(200).json_body(json!({}));
        })
        .await;

    let (client, _) = client(&server);
    let err = client.offer(OFFER_SDP, RTSP_URL).await.unwrap_err();

    assert!(err.is_response_error());
    assert!(err.to_string().contains("missing SDP Answer"));
}

#[tokio::test]
async fn test_server_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/stream");
            then.status(502);
        })
        .await;

    let (client, diagnostics) = client(&server);
    let err = client.offer(OFFER_SDP, RTSP_URL).await.unwrap_err();

    assert!(err.is_response_error());
    assert!(err.to_string().contains("server failure"));
    assert_eq!(diagnostics.get("stream.response_error"), 1);
}

#[tokio::test]
async fn test_server_failure_with_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/stream");
            then.status(502).json_body(json!({"error": "a message"}));
        })
        .await;

    let (client, _) = client(&server);
    let err = client.offer(OFFER_SDP, RTSP_URL).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "RTSPtoWebRTC server failure: a message: Bad Gateway"
    );
}

#[tokio::test]
async fn test_heartbeat() {
    let server = MockServer::start_async().await;
    let (client, diagnostics) = client(&server);

    for (status, alive) in [(200, true), (502, false), (404, false), (200, true)] {
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/static");
                then.status(status);
            })
            .await;

        let result = client.heartbeat().await;
        assert_eq!(result.is_ok(), alive, "status {}", status);
        if let Err(err) = result {
            assert!(err.is_response_error());
        }
        mock.delete_async().await;
    }

    assert_eq!(diagnostics.get("heartbeat.success"), 2);
    assert_eq!(diagnostics.get("heartbeat.response_error"), 2);
}

#[tokio::test]
async fn test_offer_stream_id() {
    let server = MockServer::start_async().await;
    let stream_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/stream")
                .x_www_form_urlencoded_tuple("url", "rtsps://example")
                .x_www_form_urlencoded_tuple("sdp64", OFFER_SDP64);
            then.status(200)
                .json_body(json!({"sdp64": STANDARD.encode(ANSWER_SDP)}));
        })
        .await;

    let (client, _) = client(&server);
    let answer_sdp = client
        .offer_stream_id("stream_id", OFFER_SDP, RTSP_URL, None)
        .await
        .unwrap();

    stream_mock.assert_hits_async(1).await;
    assert_eq!(answer_sdp, ANSWER_SDP);
}

#[tokio::test]
async fn test_offer_with_channel_data() {
    let server = MockServer::start_async().await;
    let stream_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/stream")
                .x_www_form_urlencoded_tuple("url", "rtsps://example")
                .x_www_form_urlencoded_tuple("sdp64", OFFER_SDP64)
                .x_www_form_urlencoded_tuple("insecure_skip_verify", "true");
            then.status(200)
                .json_body(json!({"sdp64": STANDARD.encode(ANSWER_SDP)}));
        })
        .await;

    let mut channel_data = ChannelData::new();
    channel_data.insert("insecure_skip_verify".to_string(), json!(true));

    let (client, _) = client(&server);
    let answer_sdp = client
        .offer_stream_id("stream_id", OFFER_SDP, RTSP_URL, Some(&channel_data))
        .await
        .unwrap();

    stream_mock.assert_hits_async(1).await;
    assert_eq!(answer_sdp, ANSWER_SDP);
}

#[tokio::test]
async fn test_client_alias() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/static");
            then.status(200);
        })
        .await;

    let client = Client::new(reqwest::Client::new(), &server.base_url()).unwrap();
    client.heartbeat().await.unwrap();
    assert_eq!(client.kind(), ServerKind::WebRtc);
    assert_eq!(client.base_url().as_str(), format!("{}/", server.base_url()));
}
