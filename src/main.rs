use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use deva_gateway::api::ApiServerBuilder;
use deva_gateway::{Config, GeminiClient, TranslateTts};

/// Deva - voice assistant web backend
#[derive(Parser)]
#[command(name = "deva", version, about)]
struct Cli {
    /// Address to bind
    #[arg(long, env = "DEVA_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "DEVA_PORT")]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Reply with text only, never synthesize audio
    #[arg(long)]
    no_tts: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,deva_gateway=info",
        1 => "info,deva_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.no_tts {
        config.tts.enabled = false;
    }

    tracing::debug!(?config, "loaded configuration");
    tracing::info!(
        model = %config.llm.model,
        host = %config.server.host,
        port = config.server.port,
        tts = config.tts.enabled,
        "starting deva gateway"
    );

    let model = GeminiClient::new(&config.llm)?;
    let tts = TranslateTts::new(&config.tts)?;

    let server = ApiServerBuilder::new(Arc::new(model), Arc::new(tts))
        .host(config.server.host.clone())
        .port(config.server.port)
        .max_sessions(config.server.max_sessions)
        .tts_config(&config.tts)
        .build();

    server.run().await?;

    Ok(())
}
