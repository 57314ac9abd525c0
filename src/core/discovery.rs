use crate::core::web_client::WebClient;
use crate::core::webrtc_client::WebRtcClient;
use crate::domain::ports::OfferClient;
use crate::utils::diagnostics::DiagnosticsRegistry;
use crate::utils::error::Result;
use reqwest::Client;

/// Detect whether RTSPtoWeb or RTSPtoWebRTC answers at `server_url` and
/// return a client for it, counting into the process-wide diagnostics.
pub async fn get_adaptive_client(
    client: Client,
    server_url: &str,
) -> Result<Box<dyn OfferClient>> {
    get_adaptive_client_with_diagnostics(client, server_url, DiagnosticsRegistry::global()).await
}

/// Both heartbeats always run. RTSPtoWeb wins when both servers answer;
/// when neither does the RTSPtoWebRTC heartbeat error is returned.
pub async fn get_adaptive_client_with_diagnostics(
    client: Client,
    server_url: &str,
    registry: &DiagnosticsRegistry,
) -> Result<Box<dyn OfferClient>> {
    let discovery = registry.discovery();
    discovery.increment("attempt");

    let web_client = WebClient::with_diagnostics(client.clone(), server_url, registry.web())?;
    let webrtc_client = WebRtcClient::with_diagnostics(client, server_url, registry.webrtc())?;

    let (web_heartbeat, webrtc_heartbeat) =
        tokio::join!(web_client.heartbeat(), webrtc_client.heartbeat());

    let web_alive = match web_heartbeat {
        Ok(()) => {
            discovery.increment("web.success");
            true
        }
        Err(err) => {
            tracing::debug!("Discovery of RTSPtoWeb server failed: {}", err);
            discovery.increment("web.failure");
            false
        }
    };

    let webrtc_error = match webrtc_heartbeat {
        Ok(()) => {
            discovery.increment("webrtc.success");
            None
        }
        Err(err) => {
            tracing::debug!("Discovery of RTSPtoWebRTC server failed: {}", err);
            discovery.increment("webrtc.failure");
            Some(err)
        }
    };

    if web_alive {
        tracing::debug!("Using RTSPtoWeb client for {}", server_url);
        return Ok(Box::new(web_client));
    }
    match webrtc_error {
        None => {
            tracing::debug!("Using RTSPtoWebRTC client for {}", server_url);
            Ok(Box::new(webrtc_client))
        }
        Some(err) => Err(err),
    }
}
