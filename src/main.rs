use anyhow::Result;
use auction_house::{
    config::ServerConfig,
    diagnostic,
    event::{Event, ServerEvent},
    registry, service,
};
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let config = ServerConfig::parse();

    let sink = diagnostic::FileSink::open_shared(&config.log_file)?;
    sink.event(&Event::Server(ServerEvent::StartingUp));

    let registry = registry::AuctionRegistry::with_seed_data()?;
    info!(auctions = registry.len(), "auctions initialized");
    sink.event(&Event::Server(ServerEvent::AuctionsInitialized(registry.len())));

    let svc_ctr = service::ServiceControl::new();

    ctrlc::set_handler({
        let svc_ctr = svc_ctr.clone();
        move || {
            eprintln!("Stopping the server...");
            svc_ctr.stop_all();
        }
    })?;

    service::Acceptor::bind(&config, registry, sink)
        .await?
        .run(svc_ctr)
        .await
}
