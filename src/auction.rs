pub type AuctionId = u32;
pub type ClientId = u64;

/// Bid amount.
///
/// Single precision on purpose: the minimum next bid shown to clients and the
/// threshold used to accept a bid are the very same `f32` value.
pub type Amount = f32;

/// Every new bid has to be at least 20% above the current one
pub const MIN_BID_INCREASE: Amount = 1.20;

/// Longest item name an auction can carry
pub const MAX_NAME_LEN: usize = 49;

/// The lowest amount that would outbid `current_bid`
pub fn minimum_next_bid(current_bid: Amount) -> Amount {
    current_bid * MIN_BID_INCREASE
}

/// Whether `amount` can stand as a bid at all
///
/// The minimum next bid above it must itself be a finite amount, otherwise
/// nobody could ever outbid it.
pub fn is_valid_amount(amount: Amount) -> bool {
    amount.is_finite() && minimum_next_bid(amount).is_finite()
}

pub fn is_acceptable(amount: Amount, current_bid: Amount) -> bool {
    is_valid_amount(amount) && amount >= minimum_next_bid(current_bid)
}

/// Who holds the highest bid on an auction
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Bidder {
    #[default]
    Nobody,
    Client(ClientId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Auction {
    id: AuctionId,
    name: String,
    current_bid: Amount,
    highest_bidder: Bidder,
}

impl Auction {
    pub fn new(id: AuctionId, name: impl Into<String>, starting_bid: Amount) -> Self {
        Self {
            id,
            name: name.into(),
            current_bid: starting_bid,
            highest_bidder: Bidder::Nobody,
        }
    }

    pub fn id(&self) -> AuctionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn view(&self) -> AuctionView {
        AuctionView {
            id: self.id,
            name: self.name.clone(),
            current_bid: self.current_bid,
            highest_bidder: self.highest_bidder,
            minimum_next_bid: minimum_next_bid(self.current_bid),
        }
    }

    /// Apply a bid if it clears the minimum.
    ///
    /// This is the only place an auction's bid ever changes, and since the
    /// minimum is always above the current bid, the bid can only go up.
    pub fn place_bid(&mut self, amount: Amount, bidder: ClientId) -> BidOutcome {
        let minimum = minimum_next_bid(self.current_bid);
        if is_acceptable(amount, self.current_bid) {
            self.current_bid = amount;
            self.highest_bidder = Bidder::Client(bidder);
            BidOutcome::Accepted {
                auction_id: self.id,
                amount,
                bidder,
                new_minimum: minimum_next_bid(amount),
            }
        } else {
            BidOutcome::Rejected {
                auction_id: self.id,
                minimum,
                current_bid: self.current_bid,
            }
        }
    }
}

/// Point-in-time copy of an auction, as returned by registry reads
#[derive(Clone, Debug, PartialEq)]
pub struct AuctionView {
    pub id: AuctionId,
    pub name: String,
    pub current_bid: Amount,
    pub highest_bidder: Bidder,
    pub minimum_next_bid: Amount,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BidOutcome {
    Accepted {
        auction_id: AuctionId,
        amount: Amount,
        bidder: ClientId,
        new_minimum: Amount,
    },
    /// The auction exists but the bid is below the minimum
    Rejected {
        auction_id: AuctionId,
        minimum: Amount,
        current_bid: Amount,
    },
    NotFound,
}
