use std::net::IpAddr;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Greeting web service.
#[derive(Debug, Parser)]
#[command(name = "hola", version, about)]
struct Config {
    /// Address to listen on.
    #[arg(long, env = "HOLA_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "HOLA_PORT", default_value_t = 5000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hola=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    tracing::debug!(?config, "configuration loaded");

    hola::Server::bind((config.host, config.port))
        .await?
        .serve(hola::app())
        .await?;

    Ok(())
}
