use clap::Parser;
use rtsp_to_web_client::config::cli::{CliConfig, Command};
use rtsp_to_web_client::utils::diagnostics::get_diagnostics;
use rtsp_to_web_client::utils::logger;
use rtsp_to_web_client::{stream_id_for_url, Channel, ClientConfig, ClientError, Result, Stream};
use serde::Serialize;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let verbose = config.logging.verbose.unwrap_or(false);
    if config.logging.json.unwrap_or(false) {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    let result = run(&cli.command, &config).await;

    if cli.diagnostics {
        match serde_json::to_string_pretty(&get_diagnostics()) {
            Ok(json) => eprintln!("{}", json),
            Err(e) => tracing::warn!("Unable to render diagnostics: {}", e),
        }
    }

    if let Err(e) = result {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        std::process::exit(e.severity().exit_code());
    }
}

async fn run(command: &Command, config: &ClientConfig) -> Result<()> {
    command.check_server_kind(config.server.kind)?;

    match command {
        Command::Discover => {
            let client = config.offer_client().await?;
            println!("{} server at {}", client.kind(), config.server.url);
        }
        Command::Heartbeat => {
            let client = config.offer_client().await?;
            client.heartbeat().await?;
            println!("✅ {} server is alive", client.kind());
        }
        Command::Streams => {
            let streams = config.web_client()?.list_streams().await?;
            print_json(&streams)?;
        }
        Command::StreamInfo { stream_id } => {
            let stream = config.web_client()?.get_stream_info(stream_id).await?;
            print_json(&stream)?;
        }
        Command::AddStream {
            stream_id,
            rtsp_url,
            name,
        } => {
            let stream = Stream::new(name.clone().unwrap_or_else(|| stream_id.clone()))
                .with_channel("0", Channel::new("ch1", rtsp_url.clone()));
            config.web_client()?.add_stream(stream_id, &stream).await?;
            println!("✅ Added stream {}", stream_id);
        }
        Command::DeleteStream { stream_id } => {
            config.web_client()?.delete_stream(stream_id).await?;
            println!("✅ Deleted stream {}", stream_id);
        }
        Command::ReloadStream { stream_id } => {
            config.web_client()?.reload_stream(stream_id).await?;
            println!("✅ Reloaded stream {}", stream_id);
        }
        Command::ChannelInfo {
            stream_id,
            channel_id,
        } => {
            let channel = config
                .web_client()?
                .get_channel_info(stream_id, channel_id)
                .await?;
            print_json(&channel)?;
        }
        Command::Codec {
            stream_id,
            channel_id,
        } => {
            let codecs = config
                .web_client()?
                .get_channel_codec(stream_id, channel_id)
                .await?;
            print_json(&codecs)?;
        }
        Command::Offer {
            rtsp_url,
            sdp_file,
            stream_id,
        } => {
            let offer_sdp = tokio::fs::read_to_string(sdp_file).await?;
            let client = config.offer_client().await?;
            let stream_id = stream_id
                .clone()
                .unwrap_or_else(|| stream_id_for_url(rtsp_url));
            tracing::info!("Sending offer to {} server as stream {}", client.kind(), stream_id);
            let answer = client
                .offer_stream_id(&stream_id, &offer_sdp, rtsp_url, None)
                .await?;
            println!("{}", answer);
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| ClientError::ConfigError {
        message: format!("Unable to render response: {}", e),
    })?;
    println!("{}", json);
    Ok(())
}
