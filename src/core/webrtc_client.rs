use crate::core::transport::{value_to_string, RequestBody, Transport};
use crate::domain::model::{ChannelData, ServerKind};
use crate::domain::ports::OfferClient;
use crate::utils::diagnostics::{Diagnostics, DiagnosticsRegistry};
use crate::utils::error::{ClientError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, Method};
use std::sync::Arc;
use url::Url;

const DATA_URL: &str = "url";
const DATA_SDP64: &str = "sdp64";
const DATA_ERROR: &str = "error";

/// Client for an RTSPtoWebRTC server.
#[derive(Debug, Clone)]
pub struct WebRtcClient {
    transport: Transport,
}

impl WebRtcClient {
    pub fn new(client: Client, server_url: &str) -> Result<Self> {
        Self::with_diagnostics(client, server_url, DiagnosticsRegistry::global().webrtc())
    }

    pub fn with_diagnostics(
        client: Client,
        server_url: &str,
        diagnostics: Arc<Diagnostics>,
    ) -> Result<Self> {
        let transport = Transport::new(
            client,
            server_url,
            ServerKind::WebRtc,
            DATA_ERROR,
            diagnostics,
        )?;
        Ok(Self { transport })
    }

    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }
}

#[async_trait]
impl OfferClient for WebRtcClient {
    async fn offer(&self, offer_sdp: &str, rtsp_url: &str) -> Result<String> {
        self.offer_stream_id("ignored", offer_sdp, rtsp_url, None)
            .await
    }

    /// The server has no notion of stream ids, so `stream_id` is unused.
    /// Channel data is posted alongside the offer, each value as a string.
    async fn offer_stream_id(
        &self,
        _stream_id: &str,
        offer_sdp: &str,
        rtsp_url: &str,
        channel_data: Option<&ChannelData>,
    ) -> Result<String> {
        tracing::debug!("rtsp_url={}, offer={}", rtsp_url, offer_sdp);

        let sdp64 = STANDARD.encode(offer_sdp);
        let form = offer_form(rtsp_url, &sdp64, channel_data);
        let response = self
            .transport
            .request(Method::POST, &["stream"], RequestBody::Form(form), "stream")
            .await?;
        let data = self.transport.read_json(response).await?;

        let Some(answer64) = data.get(DATA_SDP64) else {
            return Err(ClientError::response(format!(
                "RTSPtoWebRTC server response missing SDP Answer: {}",
                data
            )));
        };
        let answer = STANDARD
            .decode(value_to_string(answer64))
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or_else(|| {
                ClientError::response(format!(
                    "RTSPtoWebRTC server returned malformed SDP Answer: {}",
                    data
                ))
            })?;
        tracing::debug!("answer={}", answer);
        Ok(answer)
    }

    async fn heartbeat(&self) -> Result<()> {
        self.transport
            .request(Method::GET, &["static"], RequestBody::Empty, "heartbeat")
            .await?;
        Ok(())
    }

    fn kind(&self) -> ServerKind {
        ServerKind::WebRtc
    }
}

/// Form fields for an offer; channel data keys override the defaults.
fn offer_form(
    rtsp_url: &str,
    sdp64: &str,
    channel_data: Option<&ChannelData>,
) -> Vec<(String, String)> {
    let mut form = vec![
        (DATA_URL.to_string(), rtsp_url.to_string()),
        (DATA_SDP64.to_string(), sdp64.to_string()),
    ];
    for (key, value) in channel_data.into_iter().flatten() {
        let value = value_to_string(value);
        match form.iter_mut().find(|(existing, _)| existing == key) {
            Some(entry) => entry.1 = value,
            None => form.push((key.clone(), value)),
        }
    }
    form
}
