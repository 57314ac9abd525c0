#[cfg(feature = "cli")]
pub mod cli;

use crate::core::discovery::get_adaptive_client;
use crate::core::web_client::WebClient;
use crate::core::webrtc_client::WebRtcClient;
use crate::domain::ports::OfferClient;
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;
const MAX_REQUEST_TIMEOUT_SECONDS: u64 = 300;

/// Which client to use against the configured server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ServerSelection {
    /// Probe both APIs and pick whichever answers.
    #[default]
    Auto,
    Web,
    Webrtc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    #[serde(default)]
    pub kind: ServerSelection,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECONDS
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server: ServerConfig {
                url: server_url.into(),
                kind: ServerSelection::Auto,
                request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
                user_agent: None,
            },
            logging: LoggingConfig::default(),
        }
    }

    /// Load and validate a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_seconds)
    }

    pub fn build_http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().timeout(self.request_timeout());
        if let Some(user_agent) = &self.server.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        builder.build().map_err(|e| ClientError::ConfigError {
            message: format!("Unable to build HTTP client: {}", e),
        })
    }

    pub fn web_client(&self) -> Result<WebClient> {
        WebClient::new(self.build_http_client()?, &self.server.url)
    }

    /// Client that negotiates offers, chosen by `server.kind`.
    pub async fn offer_client(&self) -> Result<Box<dyn OfferClient>> {
        let http = self.build_http_client()?;
        match self.server.kind {
            ServerSelection::Auto => get_adaptive_client(http, &self.server.url).await,
            ServerSelection::Web => Ok(Box::new(WebClient::new(http, &self.server.url)?)),
            ServerSelection::Webrtc => Ok(Box::new(WebRtcClient::new(http, &self.server.url)?)),
        }
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validate_url("server.url", &self.server.url)?;
        validate_range(
            "server.request_timeout_seconds",
            self.server.request_timeout_seconds,
            1,
            MAX_REQUEST_TIMEOUT_SECONDS,
        )?;
        if let Some(user_agent) = &self.server.user_agent {
            validate_non_empty_string("server.user_agent", user_agent)?;
        }
        Ok(())
    }
}
