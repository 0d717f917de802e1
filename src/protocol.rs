//! Line protocol
//!
//! Requests are single `\n`-terminated lines:
//!
//! * `ls` (any case, anything may follow) lists the auctions,
//! * `<auction id> <amount>` places a bid,
//! * anything else is an invalid bid.
//!
//! Every request gets exactly one response; responses may span several
//! lines and always end with `\n`.
use crate::auction::{self, Amount, AuctionId, AuctionView, BidOutcome};
use thiserror::Error;

pub const WELCOME_HEADER: &str = "Welcome to the Auction! Current items:";
pub const LIST_HEADER: &str = "Current Auction List:";
pub const INVALID_BID: &str = "Error: Invalid auction ID or bid amount\n";
pub const SERVER_FULL: &str = "Error: Server is full, try again later\n";

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Request {
    List,
    Bid { auction_id: AuctionId, amount: Amount },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("empty request")]
    Empty,
    #[error("invalid auction id: {0:?}")]
    InvalidAuctionId(String),
    #[error("invalid bid amount: {0:?}")]
    InvalidAmount(String),
}

impl Request {
    pub fn parse(line: &str) -> Result<Self, RequestError> {
        let line = line.trim_end_matches(['\r', '\n']);

        if line
            .get(..2)
            .map(|cmd| cmd.eq_ignore_ascii_case("ls"))
            .unwrap_or(false)
        {
            return Ok(Request::List);
        }

        let mut tokens = line.split_whitespace();
        let auction_id = tokens.next().ok_or(RequestError::Empty)?;
        let auction_id = auction_id
            .parse()
            .map_err(|_| RequestError::InvalidAuctionId(auction_id.to_owned()))?;

        let amount_str = tokens.next().unwrap_or_default();
        let amount: Amount = amount_str
            .parse()
            .map_err(|_| RequestError::InvalidAmount(amount_str.to_owned()))?;
        if !auction::is_valid_amount(amount) {
            return Err(RequestError::InvalidAmount(amount_str.to_owned()));
        }

        // trailing tokens are ignored
        Ok(Request::Bid { auction_id, amount })
    }
}

pub fn auction_line(view: &AuctionView) -> String {
    format!(
        "Auction ID {}: {}, Current Bid: {:.2} (Minimum next bid: {:.2})\n",
        view.id, view.name, view.current_bid, view.minimum_next_bid
    )
}

fn with_header(header: &str, auctions: &[AuctionView]) -> String {
    let mut out = String::with_capacity(64 * (auctions.len() + 1));
    out.push_str(header);
    out.push('\n');
    for view in auctions {
        out.push_str(&auction_line(view));
    }
    out
}

/// Sent as soon as a client connects
pub fn welcome(auctions: &[AuctionView]) -> String {
    with_header(WELCOME_HEADER, auctions)
}

/// Response to `ls`
pub fn listing(auctions: &[AuctionView]) -> String {
    with_header(LIST_HEADER, auctions)
}

pub fn bid_response(outcome: &BidOutcome) -> String {
    match *outcome {
        BidOutcome::Accepted {
            auction_id,
            amount,
            bidder,
            new_minimum,
        } => format!(
            "Update: Auction ID {auction_id}: New highest bid is {amount:.2} by Client {bidder}\n\
             Minimum next bid required: {new_minimum:.2}\n"
        ),
        BidOutcome::Rejected {
            minimum,
            current_bid,
            ..
        } => format!(
            "Error: Bid must be at least {minimum:.2} (20% more than current bid of {current_bid:.2})\n"
        ),
        BidOutcome::NotFound => INVALID_BID.to_owned(),
    }
}
