use crate::{
    config::ServerConfig,
    diagnostic::{InMemorySink, SharedSink},
    protocol,
    registry::AuctionRegistry,
    service::{Acceptor, ServiceControl},
};
use anyhow::Result;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpStream,
    },
    task::JoinHandle,
};

const TIMEOUT: Duration = Duration::from_secs(5);

struct Server {
    addr: SocketAddr,
    svc_ctl: ServiceControl,
    handle: JoinHandle<Result<()>>,
    sink: Arc<InMemorySink>,
}

async fn start_server(max_clients: usize) -> Result<Server> {
    let config = ServerConfig {
        bind: "127.0.0.1:0".parse()?,
        max_clients,
        ..Default::default()
    };
    let sink = InMemorySink::new_shared();
    let acceptor = Acceptor::bind(
        &config,
        AuctionRegistry::with_seed_data()?,
        sink.clone() as SharedSink,
    )
    .await?;
    let addr = acceptor.local_addr()?;
    let svc_ctl = ServiceControl::new();
    let handle = tokio::spawn(acceptor.run(svc_ctl.clone()));
    Ok(Server {
        addr,
        svc_ctl,
        handle,
        sink,
    })
}

struct Conn {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Conn {
    async fn connect(addr: SocketAddr) -> Result<Self> {
        let (reader, writer) = TcpStream::connect(addr).await?.into_split();
        Ok(Self {
            reader: BufReader::new(reader),
            writer,
        })
    }

    async fn line(&mut self) -> Result<String> {
        let mut line = String::new();
        tokio::time::timeout(TIMEOUT, self.reader.read_line(&mut line)).await??;
        Ok(line.trim_end().to_owned())
    }

    async fn skip(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.line().await?;
        }
        Ok(())
    }

    async fn send(&mut self, request: &str) -> Result<()> {
        self.writer
            .write_all(format!("{request}\n").as_bytes())
            .await?;
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn clients_get_increasing_ids_and_share_auctions() -> Result<()> {
    let server = start_server(0).await?;

    let mut alice = Conn::connect(server.addr).await?;
    alice.skip(4).await?;
    let mut bob = Conn::connect(server.addr).await?;
    bob.skip(4).await?;

    alice.send("1 60.01").await?;
    assert_eq!(
        alice.line().await?,
        "Update: Auction ID 1: New highest bid is 60.01 by Client 0"
    );
    alice.skip(1).await?;

    // bob has to beat alice's bid now
    bob.send("1 70").await?;
    assert_eq!(
        bob.line().await?,
        "Error: Bid must be at least 72.01 (20% more than current bid of 60.01)"
    );
    bob.send("1 80").await?;
    assert_eq!(
        bob.line().await?,
        "Update: Auction ID 1: New highest bid is 80.00 by Client 1"
    );
    bob.skip(1).await?;

    alice.send("ls").await?;
    assert_eq!(alice.line().await?, protocol::LIST_HEADER);
    assert_eq!(
        alice.line().await?,
        "Auction ID 1: Antique Vase, Current Bid: 80.00 (Minimum next bid: 96.00)"
    );

    server.svc_ctl.stop_all();
    tokio::time::timeout(TIMEOUT, server.handle).await???;
    assert!(server.sink.contains("New client connected. Client ID: 1"));
    assert!(server.sink.contains("Server shutting down"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn connections_over_the_limit_are_turned_away() -> Result<()> {
    let server = start_server(1).await?;

    let mut first = Conn::connect(server.addr).await?;
    assert_eq!(first.line().await?, protocol::WELCOME_HEADER);
    first.skip(3).await?;

    let mut second = Conn::connect(server.addr).await?;
    assert_eq!(second.line().await?, protocol::SERVER_FULL.trim_end());
    assert_eq!(second.line().await?, "");

    // the slot frees up once the first client leaves
    drop(first);
    let mut admitted = false;
    for _ in 0..50 {
        let mut next = Conn::connect(server.addr).await?;
        if next.line().await? == protocol::WELCOME_HEADER {
            admitted = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(admitted);
    assert!(server.sink.contains("server is full"));

    server.svc_ctl.stop_all();
    tokio::time::timeout(TIMEOUT, server.handle).await???;
    Ok(())
}

#[tokio::test]
async fn stops_when_asked() -> Result<()> {
    let server = start_server(0).await?;
    assert!(!server.svc_ctl.is_stopped());

    server.svc_ctl.stop_all();
    assert!(server.svc_ctl.is_stopped());
    tokio::time::timeout(TIMEOUT, server.handle).await???;

    assert!(server.sink.contains("listening for connections"));
    Ok(())
}

#[tokio::test]
async fn stop_before_waiting_is_not_lost() -> Result<()> {
    let svc_ctl = ServiceControl::new();
    svc_ctl.stop_all();
    tokio::time::timeout(TIMEOUT, svc_ctl.stopped()).await?;
    Ok(())
}
