//! ratingsmeta - Stremio addon serving Cinemeta metadata with MDBList
//! ratings layered into the description.

use std::net::SocketAddr;

use clap::Parser;

use ratingsmeta::{cli::Cli, config::Config, server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    if config.mdblist_api_key.is_none() {
        tracing::info!("MDBLIST_API_KEY not set; serving metadata without ratings enrichment");
    }

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    server::run_server(addr, config).await?;
    Ok(())
}
