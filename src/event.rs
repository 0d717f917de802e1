use crate::auction::{Amount, AuctionId, ClientId};
use std::{fmt, net::SocketAddr};

/// Things worth leaving a trace of in the diagnostic log
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Server(ServerEvent),
    Session(ClientId, SessionEvent),
    Client(ClientEvent),
    #[cfg(test)]
    Test(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ServerEvent {
    StartingUp,
    AuctionsInitialized(usize),
    Listening(SocketAddr),
    AcceptFailed(String),
    ServerFull(SocketAddr),
    ShuttingDown,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Connected(SocketAddr),
    Disconnected,
    ListRequested,
    BidReceived { auction_id: AuctionId, amount: Amount },
    NewHighestBid { auction_id: AuctionId, amount: Amount },
    BidTooLow { auction_id: AuctionId, amount: Amount },
    InvalidBid,
    RequestTooLong,
    TransportError(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClientEvent {
    StartingUp,
    Connected(SocketAddr),
    ConnectFailed(String),
    Received(String),
    Sending(String),
    ServerClosed,
    TransportError(String),
    Quit,
    ShuttingDown,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Server(event) => fmt::Display::fmt(event, f),
            Event::Session(client_id, event) => write_session_event(f, *client_id, event),
            Event::Client(event) => fmt::Display::fmt(event, f),
            #[cfg(test)]
            Event::Test(msg) => f.write_str(msg),
        }
    }
}

impl fmt::Display for ServerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ServerEvent::*;
        match self {
            StartingUp => f.write_str("Server starting up..."),
            AuctionsInitialized(n) => write!(f, "Auctions initialized: {n} items"),
            Listening(addr) => write!(
                f,
                "Server is running and listening for connections on {addr}..."
            ),
            AcceptFailed(e) => write!(f, "Failed to accept client connection: {e}"),
            ServerFull(addr) => write!(f, "Rejected connection from {addr}: server is full"),
            ShuttingDown => f.write_str("Server shutting down"),
        }
    }
}

fn write_session_event(
    f: &mut fmt::Formatter<'_>,
    client_id: ClientId,
    event: &SessionEvent,
) -> fmt::Result {
    use SessionEvent::*;
    match event {
        Connected(addr) => write!(f, "New client connected. Client ID: {client_id} ({addr})"),
        Disconnected => write!(f, "Client {client_id} disconnected"),
        ListRequested => write!(f, "Client {client_id} requested current auction list"),
        BidReceived { auction_id, amount } => write!(
            f,
            "Received bid from Client {client_id}: Auction ID {auction_id}, Amount {amount:.2}"
        ),
        NewHighestBid { auction_id, amount } => write!(
            f,
            "New highest bid: Auction ID {auction_id}, Amount {amount:.2}, Client {client_id}"
        ),
        BidTooLow { auction_id, amount } => write!(
            f,
            "Invalid bid (below minimum increase): Auction ID {auction_id}, Amount {amount:.2}, Client {client_id}"
        ),
        InvalidBid => write!(f, "Invalid bid received from Client {client_id}"),
        RequestTooLong => write!(f, "Client {client_id} sent an oversized request"),
        TransportError(e) => write!(f, "Connection error for Client {client_id}: {e}"),
    }
}

impl fmt::Display for ClientEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ClientEvent::*;
        match self {
            StartingUp => f.write_str("Client starting up..."),
            Connected(addr) => write!(f, "Connected to the auction server at {addr}"),
            ConnectFailed(e) => write!(f, "Connection to server failed: {e}"),
            Received(text) => write!(f, "Received server response: {}", text.trim_end()),
            Sending(line) => write!(f, "Sending: {}", line.trim_end()),
            ServerClosed => f.write_str("Server closed the connection"),
            TransportError(e) => write!(f, "Connection error: {e}"),
            Quit => f.write_str("User initiated quit command"),
            ShuttingDown => f.write_str("Client shutting down"),
        }
    }
}
