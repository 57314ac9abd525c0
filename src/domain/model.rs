use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Extra channel options passed through to the server verbatim,
/// e.g. `{"insecure_skip_verify": true}`.
pub type ChannelData = serde_json::Map<String, serde_json::Value>;

/// A single RTSP source inside a stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_demand: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(flatten)]
    pub extra: ChannelData,
}

impl Channel {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, data: &ChannelData) -> Self {
        for (key, value) in data {
            self.extra.insert(key.clone(), value.clone());
        }
        self
    }

    /// True when this channel already carries `desired`'s url, name and
    /// every extra option `desired` sets. Server-populated fields the
    /// caller did not ask for are ignored.
    pub fn satisfies(&self, desired: &Channel) -> bool {
        if self.url != desired.url {
            return false;
        }
        if desired.name.is_some() && self.name != desired.name {
            return false;
        }
        let current = match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => return false,
        };
        desired
            .extra
            .iter()
            .all(|(key, value)| current.get(key) == Some(value))
    }
}

/// A stream registered with an RTSPtoWeb server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub channels: BTreeMap<String, Channel>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Stream {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_channel(mut self, channel_id: impl Into<String>, channel: Channel) -> Self {
        self.channels.insert(channel_id.into(), channel);
        self
    }
}

/// Value of the `status` field in an RTSPtoWeb response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Failure,
    Success,
}

impl StatusCode {
    /// The server sends the status as a number, older builds as a string.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let raw = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => return None,
        };
        match raw.as_str() {
            "1" => Some(Self::Success),
            "0" => Some(Self::Failure),
            _ => None,
        }
    }
}

/// Which gateway is answering behind a server URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    /// RTSPtoWeb, with the stream management API.
    Web,
    /// RTSPtoWebRTC, with the single offer endpoint.
    #[serde(rename = "webrtc")]
    WebRtc,
}

impl ServerKind {
    pub fn label(&self) -> &'static str {
        match self {
            ServerKind::Web => "RTSPtoWeb",
            ServerKind::WebRtc => "RTSPtoWebRTC",
        }
    }
}

impl std::fmt::Display for ServerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
