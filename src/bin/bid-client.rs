use anyhow::{Context, Result};
use auction_house::{
    client,
    config::ClientConfig,
    diagnostic,
    event::{ClientEvent, Event},
};
use clap::Parser;
use tokio::{io::BufReader, net::TcpStream};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::parse();

    let sink = diagnostic::FileSink::open_shared(&config.log_file)?;
    sink.event(&Event::Client(ClientEvent::StartingUp));

    let stream = match TcpStream::connect(config.server).await {
        Ok(stream) => stream,
        Err(e) => {
            sink.event(&Event::Client(ClientEvent::ConnectFailed(e.to_string())));
            return Err(e).with_context(|| format!("Connection to server {} failed", config.server));
        }
    };
    sink.event(&Event::Client(ClientEvent::Connected(config.server)));
    println!("Connected to the auction server.");

    client::run(
        stream,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        sink,
    )
    .await
}
