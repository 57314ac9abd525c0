use crate::core::transport::{value_to_string, RequestBody, Transport};
use crate::domain::model::{Channel, ChannelData, ServerKind, StatusCode, Stream};
use crate::domain::ports::OfferClient;
use crate::utils::diagnostics::{Diagnostics, DiagnosticsRegistry};
use crate::utils::error::{ClientError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use data_encoding::BASE32;
use md5::{Digest, Md5};
use reqwest::{Client, Method};
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

const DATA_STATUS: &str = "status";
const DATA_PAYLOAD: &str = "payload";

/// Channel used for streams created by an offer.
pub const DEFAULT_CHANNEL_ID: &str = "0";
pub const DEFAULT_CHANNEL_NAME: &str = "ch1";

/// Stream id used by [`WebClient::offer`]: base32 of the MD5 of the url.
pub fn stream_id_for_url(rtsp_url: &str) -> String {
    BASE32.encode(&Md5::digest(rtsp_url.as_bytes()))
}

/// Client for an RTSPtoWeb server.
#[derive(Debug, Clone)]
pub struct WebClient {
    transport: Transport,
}

impl WebClient {
    pub fn new(client: Client, server_url: &str) -> Result<Self> {
        Self::with_diagnostics(client, server_url, DiagnosticsRegistry::global().web())
    }

    pub fn with_diagnostics(
        client: Client,
        server_url: &str,
        diagnostics: Arc<Diagnostics>,
    ) -> Result<Self> {
        let transport = Transport::new(
            client,
            server_url,
            ServerKind::Web,
            DATA_PAYLOAD,
            diagnostics,
        )?;
        Ok(Self { transport })
    }

    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }

    /// List streams registered with the server, keyed by stream id.
    pub async fn list_streams(&self) -> Result<BTreeMap<String, Stream>> {
        let payload = self
            .call(Method::GET, &["streams"], RequestBody::Empty, "list_streams")
            .await?;
        if !payload.is_object() {
            return Err(malformed_payload(&payload));
        }
        serde_json::from_value(payload.clone()).map_err(|_| malformed_payload(&payload))
    }

    pub async fn add_stream(&self, stream_id: &str, stream: &Stream) -> Result<()> {
        self.call(
            Method::POST,
            &["stream", stream_id, "add"],
            json_body(stream)?,
            "add_stream",
        )
        .await?;
        Ok(())
    }

    pub async fn update_stream(&self, stream_id: &str, stream: &Stream) -> Result<()> {
        self.call(
            Method::POST,
            &["stream", stream_id, "edit"],
            json_body(stream)?,
            "update_stream",
        )
        .await?;
        Ok(())
    }

    pub async fn reload_stream(&self, stream_id: &str) -> Result<()> {
        self.call(
            Method::GET,
            &["stream", stream_id, "reload"],
            RequestBody::Empty,
            "reload_stream",
        )
        .await?;
        Ok(())
    }

    pub async fn get_stream_info(&self, stream_id: &str) -> Result<Stream> {
        let payload = self
            .call(
                Method::GET,
                &["stream", stream_id, "info"],
                RequestBody::Empty,
                "get_stream_info",
            )
            .await?;
        serde_json::from_value(payload.clone()).map_err(|_| malformed_payload(&payload))
    }

    pub async fn delete_stream(&self, stream_id: &str) -> Result<()> {
        self.call(
            Method::GET,
            &["stream", stream_id, "delete"],
            RequestBody::Empty,
            "delete_stream",
        )
        .await?;
        Ok(())
    }

    pub async fn add_channel(
        &self,
        stream_id: &str,
        channel_id: &str,
        channel: &Channel,
    ) -> Result<()> {
        self.call(
            Method::POST,
            &["stream", stream_id, "channel", channel_id, "add"],
            json_body(channel)?,
            "add_channel",
        )
        .await?;
        Ok(())
    }

    pub async fn update_channel(
        &self,
        stream_id: &str,
        channel_id: &str,
        channel: &Channel,
    ) -> Result<()> {
        self.call(
            Method::POST,
            &["stream", stream_id, "channel", channel_id, "edit"],
            json_body(channel)?,
            "update_channel",
        )
        .await?;
        Ok(())
    }

    pub async fn reload_channel(&self, stream_id: &str, channel_id: &str) -> Result<()> {
        self.call(
            Method::GET,
            &["stream", stream_id, "channel", channel_id, "reload"],
            RequestBody::Empty,
            "reload_channel",
        )
        .await?;
        Ok(())
    }

    pub async fn get_channel_info(&self, stream_id: &str, channel_id: &str) -> Result<Channel> {
        let payload = self
            .call(
                Method::GET,
                &["stream", stream_id, "channel", channel_id, "info"],
                RequestBody::Empty,
                "get_channel_info",
            )
            .await?;
        serde_json::from_value(payload.clone()).map_err(|_| malformed_payload(&payload))
    }

    /// Codec details the server detected on the channel, as reported.
    pub async fn get_channel_codec(
        &self,
        stream_id: &str,
        channel_id: &str,
    ) -> Result<serde_json::Value> {
        self.call(
            Method::GET,
            &["stream", stream_id, "channel", channel_id, "codec"],
            RequestBody::Empty,
            "get_channel_codec",
        )
        .await
    }

    pub async fn delete_channel(&self, stream_id: &str, channel_id: &str) -> Result<()> {
        self.call(
            Method::GET,
            &["stream", stream_id, "channel", channel_id, "delete"],
            RequestBody::Empty,
            "delete_channel",
        )
        .await?;
        Ok(())
    }

    /// Send a WebRTC offer for an existing stream channel and return the answer.
    pub async fn webrtc(&self, stream_id: &str, channel_id: &str, offer_sdp: &str) -> Result<String> {
        let form = vec![("data".to_string(), STANDARD.encode(offer_sdp))];
        let response = self
            .transport
            .request(
                Method::POST,
                &["stream", stream_id, "channel", channel_id, "webrtc"],
                RequestBody::Form(form),
                "webrtc",
            )
            .await?;
        let body = self.transport.read_text(response).await?;
        let answer = decode_answer(body.trim())?;
        tracing::debug!("answer={}", answer);
        Ok(answer)
    }

    /// Envelope checks shared by every JSON management call.
    async fn call(
        &self,
        method: Method,
        segments: &[&str],
        body: RequestBody,
        label: &str,
    ) -> Result<serde_json::Value> {
        let response = self.transport.request(method, segments, body, label).await?;
        let result = self.transport.read_json(response).await?;
        get_payload(result)
    }
}

#[async_trait]
impl OfferClient for WebClient {
    async fn offer(&self, offer_sdp: &str, rtsp_url: &str) -> Result<String> {
        let stream_id = stream_id_for_url(rtsp_url);
        self.offer_stream_id(&stream_id, offer_sdp, rtsp_url, None)
            .await
    }

    async fn offer_stream_id(
        &self,
        stream_id: &str,
        offer_sdp: &str,
        rtsp_url: &str,
        channel_data: Option<&ChannelData>,
    ) -> Result<String> {
        tracing::debug!("stream_id={}, rtsp_url={}, offer={}", stream_id, rtsp_url, offer_sdp);

        let mut channel = Channel::new(DEFAULT_CHANNEL_NAME, rtsp_url);
        if let Some(data) = channel_data {
            channel = channel.with_data(data);
        }

        let streams = self.list_streams().await?;
        match streams.get(stream_id) {
            None => {
                let stream = Stream::new(stream_id).with_channel(DEFAULT_CHANNEL_ID, channel);
                self.add_stream(stream_id, &stream).await?;
            }
            Some(existing) => {
                let current = existing.channels.get(DEFAULT_CHANNEL_ID);
                if !current.is_some_and(|current| current.satisfies(&channel)) {
                    tracing::debug!("Updating stream {} to {}", stream_id, rtsp_url);
                    let stream = Stream::new(stream_id).with_channel(DEFAULT_CHANNEL_ID, channel);
                    self.update_stream(stream_id, &stream).await?;
                }
            }
        }

        self.webrtc(stream_id, DEFAULT_CHANNEL_ID, offer_sdp).await
    }

    async fn heartbeat(&self) -> Result<()> {
        self.transport
            .request(Method::GET, &["streams"], RequestBody::Empty, "heartbeat")
            .await?;
        Ok(())
    }

    fn kind(&self) -> ServerKind {
        ServerKind::Web
    }
}

fn get_payload(result: serde_json::Value) -> Result<serde_json::Value> {
    let Some(status) = result.get(DATA_STATUS) else {
        return Err(ClientError::response(format!(
            "RTSPtoWeb server missing status: {}",
            result
        )));
    };
    if StatusCode::from_value(status) != Some(StatusCode::Success) {
        return Err(ClientError::response(format!(
            "RTSPtoWeb server failure: {}",
            result
        )));
    }
    match result.get(DATA_PAYLOAD) {
        Some(payload) => Ok(payload.clone()),
        None => Err(ClientError::response(format!(
            "RTSPtoWeb server missing payload: {}",
            result
        ))),
    }
}

fn json_body<T: serde::Serialize>(value: &T) -> Result<RequestBody> {
    serde_json::to_value(value)
        .map(RequestBody::Json)
        .map_err(|err| ClientError::ConfigError {
            message: format!("Unable to encode request body: {}", err),
        })
}

fn malformed_payload(payload: &serde_json::Value) -> ClientError {
    ClientError::response(format!(
        "RTSPtoWeb server returned malformed payload: {}",
        value_to_string(payload)
    ))
}

fn decode_answer(answer64: &str) -> Result<String> {
    let bytes = STANDARD.decode(answer64).map_err(|err| {
        ClientError::response(format!("RTSPtoWeb server returned malformed SDP answer: {}", err))
    })?;
    String::from_utf8(bytes).map_err(|err| {
        ClientError::response(format!("RTSPtoWeb server returned malformed SDP answer: {}", err))
    })
}
