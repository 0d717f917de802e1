//! Client session
//!
//! One per connection. Sends the welcome listing, then loops reading a
//! request line, handling it against the registry and writing back exactly
//! one response, until the client disconnects or the transport fails.
use crate::{
    auction::{BidOutcome, ClientId},
    diagnostic::SharedSink,
    event::{Event, SessionEvent},
    protocol::{self, Request},
    registry::SharedRegistry,
};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace, warn};

/// Longest request line accepted, excluding the `\n` or `\r\n` ending
pub const DEFAULT_MAX_LINE_LEN: usize = 1024;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("request longer than {0} bytes")]
    RequestTooLong(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    AwaitingRequest,
    ProcessingRequest,
    Closed,
}

pub struct Session {
    client_id: ClientId,
    registry: SharedRegistry,
    sink: SharedSink,
    max_line_len: usize,
    state: SessionState,
}

impl Session {
    pub fn new(
        client_id: ClientId,
        registry: SharedRegistry,
        sink: SharedSink,
        max_line_len: usize,
    ) -> Self {
        Self {
            client_id,
            registry,
            sink,
            max_line_len,
            state: SessionState::AwaitingRequest,
        }
    }

    /// Serve the client until the connection is gone
    ///
    /// A clean disconnect is `Ok`; anything else is the transport error
    /// that ended the session.
    pub async fn run<R, W>(mut self, reader: R, mut writer: W) -> Result<(), SessionError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let res = self.serve(reader, &mut writer).await;
        self.enter(SessionState::Closed);

        match &res {
            Ok(()) => {}
            Err(SessionError::RequestTooLong(_)) => {
                warn!(client_id = self.client_id, "request too long, closing connection");
                self.record(SessionEvent::RequestTooLong);
            }
            Err(SessionError::Io(e)) => {
                warn!(client_id = self.client_id, error = %e, "connection error");
                self.record(SessionEvent::TransportError(e.to_string()));
            }
        }
        self.record(SessionEvent::Disconnected);
        res
    }

    async fn serve<R, W>(&mut self, mut reader: R, writer: &mut W) -> Result<(), SessionError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let welcome = protocol::welcome(&self.registry.list());
        writer.write_all(welcome.as_bytes()).await?;
        writer.flush().await?;

        let mut line = Vec::with_capacity(128);
        loop {
            self.enter(SessionState::AwaitingRequest);
            line.clear();
            if !read_request(&mut reader, &mut line, self.max_line_len).await? {
                return Ok(());
            }

            self.enter(SessionState::ProcessingRequest);
            let response = self.handle_line(&String::from_utf8_lossy(&line));
            writer.write_all(response.as_bytes()).await?;
            writer.flush().await?;
        }
    }

    /// Turn one request line into its response
    pub fn handle_line(&self, line: &str) -> String {
        match Request::parse(line) {
            Ok(Request::List) => {
                debug!(client_id = self.client_id, "list requested");
                self.record(SessionEvent::ListRequested);
                protocol::listing(&self.registry.list())
            }
            Ok(Request::Bid { auction_id, amount }) => {
                debug!(client_id = self.client_id, auction_id, amount, "bid");
                self.record(SessionEvent::BidReceived { auction_id, amount });

                let outcome = self.registry.try_bid(auction_id, amount, self.client_id);
                self.record(match outcome {
                    BidOutcome::Accepted { .. } => SessionEvent::NewHighestBid { auction_id, amount },
                    BidOutcome::Rejected { .. } => SessionEvent::BidTooLow { auction_id, amount },
                    BidOutcome::NotFound => SessionEvent::InvalidBid,
                });
                protocol::bid_response(&outcome)
            }
            Err(e) => {
                debug!(client_id = self.client_id, error = %e, "malformed request");
                self.record(SessionEvent::InvalidBid);
                protocol::INVALID_BID.to_owned()
            }
        }
    }

    fn enter(&mut self, next: SessionState) {
        if self.state != next {
            trace!(client_id = self.client_id, from = ?self.state, to = ?next, "session state");
            self.state = next;
        }
    }

    fn record(&self, event: SessionEvent) {
        self.sink.event(&Event::Session(self.client_id, event));
    }
}

/// Read one line into `buf`, line ending included
///
/// Returns `false` at end of stream. A final line without a newline still
/// counts as a request. Only the content counts towards `max_len`, so a
/// `\r\n` ending gets two bytes of slack.
async fn read_request<R>(reader: &mut R, buf: &mut Vec<u8>, max_len: usize) -> Result<bool, SessionError>
where
    R: AsyncBufRead + Unpin,
{
    let limit = u64::try_from(max_len).unwrap_or(u64::MAX).saturating_add(2);
    let n = (&mut *reader).take(limit).read_until(b'\n', buf).await?;
    if n == 0 {
        return Ok(false);
    }
    let content = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
    let content = content.strip_suffix(b"\r").unwrap_or(content);
    if content.len() > max_len {
        return Err(SessionError::RequestTooLong(max_len));
    }
    Ok(true)
}
