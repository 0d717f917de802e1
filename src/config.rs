//! Command line configuration
//!
//! There is no config file: the listen address, the diagnostic log location
//! and a couple of limits is all there is to tune. Tracing verbosity comes
//! from `RUST_LOG`.
use crate::service::DEFAULT_MAX_LINE_LEN;
use clap::Parser;
use std::{net::SocketAddr, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_CLIENTS: usize = 10;

#[derive(Parser, Debug, Clone)]
#[command(name = "auction-house", version, about = "Live auction server")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,
    /// Diagnostic log, appended to
    #[arg(long, default_value = "server_log.txt")]
    pub log_file: PathBuf,
    /// Simultaneous clients allowed; 0 disables the limit
    #[arg(long, default_value_t = DEFAULT_MAX_CLIENTS)]
    pub max_clients: usize,
    /// Longest accepted request line, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_LEN)]
    pub max_line_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            log_file: "server_log.txt".into(),
            max_clients: DEFAULT_MAX_CLIENTS,
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "bid-client", version, about = "Interactive auction client")]
pub struct ClientConfig {
    /// Auction server to connect to
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub server: SocketAddr,
    #[arg(long, default_value = "client_log.txt")]
    pub log_file: PathBuf,
}
