//! Async client for the HTTP control APIs of the RTSPtoWeb and
//! RTSPtoWebRTC media gateways.

pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{ClientConfig, ServerSelection};
pub use crate::core::discovery::{get_adaptive_client, get_adaptive_client_with_diagnostics};
pub use crate::core::web_client::{stream_id_for_url, WebClient};
pub use crate::core::webrtc_client::WebRtcClient;
pub use crate::domain::model::{Channel, ChannelData, ServerKind, Stream};
pub use crate::domain::ports::OfferClient;
pub use crate::utils::diagnostics::{get_diagnostics, Diagnostics, DiagnosticsRegistry};
pub use crate::utils::error::{ClientError, Result};

/// Older name of [`WebRtcClient`].
pub type Client = WebRtcClient;
