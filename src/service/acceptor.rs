//! Connection acceptor
//!
//! Accepts connections and hands each one to its own [`Session`] task.
//! The acceptor never waits on a session; a failed `accept` is logged and
//! the loop carries on.
use super::{session::Session, ServiceControl};
use crate::{
    auction::ClientId,
    config::ServerConfig,
    diagnostic::SharedSink,
    event::{Event, ServerEvent, SessionEvent},
    protocol,
    registry::SharedRegistry,
};
use anyhow::{Context, Result};
use std::{net::SocketAddr, sync::Arc};
use tokio::{
    io::{AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
    sync::{OwnedSemaphorePermit, Semaphore},
};
use tracing::{debug, error, info, warn};

pub struct Acceptor {
    listener: TcpListener,
    registry: SharedRegistry,
    sink: SharedSink,
    /// `None` means no connection limit
    slots: Option<Arc<Semaphore>>,
    max_line_len: usize,
    next_client_id: ClientId,
}

impl Acceptor {
    pub async fn bind(
        config: &ServerConfig,
        registry: SharedRegistry,
        sink: SharedSink,
    ) -> Result<Self> {
        let listener = TcpListener::bind(config.bind)
            .await
            .with_context(|| format!("Failed to bind {}", config.bind))?;

        Ok(Self {
            listener,
            registry,
            sink,
            slots: (config.max_clients > 0).then(|| Arc::new(Semaphore::new(config.max_clients))),
            max_line_len: config.max_line_len,
            next_client_id: 0,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `svc_ctl` is stopped
    pub async fn run(mut self, svc_ctl: ServiceControl) -> Result<()> {
        let addr = self.local_addr()?;
        info!(%addr, "listening for connections");
        self.sink.event(&Event::Server(ServerEvent::Listening(addr)));

        loop {
            tokio::select! {
                _ = svc_ctl.stopped() => break,
                res = self.listener.accept() => match res {
                    Ok((stream, peer)) => self.dispatch(stream, peer),
                    // e.g. out of file descriptors; the listener itself stays usable
                    Err(e) => {
                        error!(error = %e, "failed to accept connection");
                        self.sink.event(&Event::Server(ServerEvent::AcceptFailed(e.to_string())));
                    }
                },
            }
        }

        info!("acceptor stopped");
        self.sink.event(&Event::Server(ServerEvent::ShuttingDown));
        Ok(())
    }

    fn dispatch(&mut self, stream: TcpStream, peer: SocketAddr) {
        let permit = match self.try_admit() {
            Some(permit) => permit,
            None => {
                warn!(%peer, "server is full, rejecting connection");
                self.sink.event(&Event::Server(ServerEvent::ServerFull(peer)));
                tokio::spawn(turn_away(stream));
                return;
            }
        };

        let client_id = self.next_client_id;
        self.next_client_id += 1;

        info!(client_id, %peer, "client connected");
        self.sink
            .event(&Event::Session(client_id, SessionEvent::Connected(peer)));

        let session = Session::new(
            client_id,
            self.registry.clone(),
            self.sink.clone(),
            self.max_line_len,
        );
        tokio::spawn(async move {
            // held for as long as the session runs
            let _permit = permit;
            let (reader, writer) = stream.into_split();
            if let Err(e) = session.run(BufReader::new(reader), writer).await {
                debug!(client_id, error = %e, "session ended with an error");
            }
            info!(client_id, "client disconnected");
        });
    }

    /// `Some(None)` when there is no limit, `None` when full
    fn try_admit(&self) -> Option<Option<OwnedSemaphorePermit>> {
        match &self.slots {
            None => Some(None),
            Some(slots) => slots.clone().try_acquire_owned().ok().map(Some),
        }
    }
}

async fn turn_away(mut stream: TcpStream) {
    if let Err(e) = stream.write_all(protocol::SERVER_FULL.as_bytes()).await {
        debug!(error = %e, "failed to notify rejected client");
    }
    let _ = stream.shutdown().await;
}
