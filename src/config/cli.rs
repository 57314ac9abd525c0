use crate::config::{ClientConfig, ServerSelection};
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{validate_required_field, Validate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "rtsp-to-web")]
#[command(about = "Command line client for RTSPtoWeb and RTSPtoWebRTC servers")]
pub struct CliConfig {
    /// Server base URL, e.g. http://localhost:8083
    #[arg(long, env = "RTSP_TO_WEB_SERVER_URL")]
    pub server_url: Option<String>,

    /// TOML configuration file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub server_kind: Option<ServerSelection>,

    #[arg(long)]
    pub request_timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Print diagnostics counters after the command")]
    pub diagnostics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Detect which server answers at the URL
    Discover,
    /// Check that the server is alive
    Heartbeat,
    /// List streams (RTSPtoWeb)
    Streams,
    /// Show one stream (RTSPtoWeb)
    StreamInfo { stream_id: String },
    /// Register a single-channel stream (RTSPtoWeb)
    AddStream {
        stream_id: String,
        rtsp_url: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove a stream (RTSPtoWeb)
    DeleteStream { stream_id: String },
    /// Restart a stream (RTSPtoWeb)
    ReloadStream { stream_id: String },
    /// Show one channel (RTSPtoWeb)
    ChannelInfo {
        stream_id: String,
        #[arg(default_value = "0")]
        channel_id: String,
    },
    /// Show codecs detected on a channel (RTSPtoWeb)
    Codec {
        stream_id: String,
        #[arg(default_value = "0")]
        channel_id: String,
    },
    /// Send an SDP offer read from a file and print the answer
    Offer {
        rtsp_url: String,
        #[arg(long)]
        sdp_file: PathBuf,
        #[arg(long)]
        stream_id: Option<String>,
    },
}

impl CliConfig {
    /// Merge the optional config file with command line overrides.
    pub fn resolve(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => {
                let server_url = validate_required_field("server_url", &self.server_url)?;
                ClientConfig::new(server_url.clone())
            }
        };

        if let Some(server_url) = &self.server_url {
            config.server.url = server_url.clone();
        }
        if let Some(kind) = self.server_kind {
            config.server.kind = kind;
        }
        if let Some(timeout) = self.request_timeout_seconds {
            config.server.request_timeout_seconds = timeout;
        }
        if self.verbose {
            config.logging.verbose = Some(true);
        }
        if self.json_logs {
            config.logging.json = Some(true);
        }

        config.validate()?;
        Ok(config)
    }
}

impl Command {
    /// Stream management only exists on RTSPtoWeb.
    pub fn requires_web_server(&self) -> bool {
        !matches!(
            self,
            Command::Discover | Command::Heartbeat | Command::Offer { .. }
        )
    }

    pub fn check_server_kind(&self, kind: ServerSelection) -> Result<()> {
        if self.requires_web_server() && kind == ServerSelection::Webrtc {
            return Err(ClientError::ConfigError {
                message: "stream management requires an RTSPtoWeb server".to_string(),
            });
        }
        Ok(())
    }
}
