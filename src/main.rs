//! meta-critique - HTTP backend for critiquing student peer feedback via an LLM

use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use meta_critique::config::Config;
use meta_critique::critique::CritiqueHandler;
use meta_critique::server::CritiqueServer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "meta-critique")]
#[command(about = "HTTP backend for critiquing student peer feedback via an LLM")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Missing credential is fatal at startup, not a per-request error
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting meta-critique server with model {}", config.model);

    let handler = CritiqueHandler::new(config)?;
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    let server = CritiqueServer::new(addr, handler);
    if let Err(e) = server.run().await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
