use crate::domain::model::{ChannelData, ServerKind};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Negotiates WebRTC sessions with an RTSPtoWeb or RTSPtoWebRTC server.
#[async_trait]
pub trait OfferClient: Send + Sync {
    /// Send the WebRTC offer for `rtsp_url` and return the SDP answer.
    async fn offer(&self, offer_sdp: &str, rtsp_url: &str) -> Result<String>;

    /// Like [`OfferClient::offer`], with an explicit stream id and extra
    /// channel options.
    async fn offer_stream_id(
        &self,
        stream_id: &str,
        offer_sdp: &str,
        rtsp_url: &str,
        channel_data: Option<&ChannelData>,
    ) -> Result<String>;

    /// Check that the server is alive.
    async fn heartbeat(&self) -> Result<()>;

    fn kind(&self) -> ServerKind;
}
