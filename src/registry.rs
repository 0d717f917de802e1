//! Auction registry
//!
//! The one piece of mutable state shared between all client sessions.
//! Auctions are only reachable through [`AuctionRegistry::list`],
//! [`AuctionRegistry::get`] and [`AuctionRegistry::try_bid`], each of which
//! runs as a single critical section over the whole collection.
use crate::auction::{Amount, Auction, AuctionId, AuctionView, BidOutcome, ClientId, MAX_NAME_LEN};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate auction id: {0}")]
    DuplicateAuction(AuctionId),
    #[error("auction {id} name is too long: {name:?}")]
    NameTooLong { id: AuctionId, name: String },
}

pub type SharedRegistry = Arc<AuctionRegistry>;

/// Items up for auction when the server starts
pub fn seed_auctions() -> Vec<Auction> {
    vec![
        Auction::new(1, "Antique Vase", 50.0),
        Auction::new(2, "Vintage Car", 500.0),
        // Historically shared id 2 with the car; ids are unique now.
        Auction::new(3, "Advanture 360", 500.0),
    ]
}

pub struct AuctionRegistry {
    // Coarse lock: bids on different auctions serialize too. Nothing
    // blocking or slow may run while it is held.
    auctions: Mutex<Vec<Auction>>,
}

impl AuctionRegistry {
    pub fn new(auctions: Vec<Auction>) -> Result<Self, RegistryError> {
        let mut seen = BTreeSet::new();
        for auction in &auctions {
            if auction.name().len() > MAX_NAME_LEN {
                return Err(RegistryError::NameTooLong {
                    id: auction.id(),
                    name: auction.name().to_owned(),
                });
            }
            if !seen.insert(auction.id()) {
                return Err(RegistryError::DuplicateAuction(auction.id()));
            }
        }
        Ok(Self {
            auctions: Mutex::new(auctions),
        })
    }

    pub fn new_shared(auctions: Vec<Auction>) -> Result<SharedRegistry, RegistryError> {
        Ok(Arc::new(Self::new(auctions)?))
    }

    pub fn with_seed_data() -> Result<SharedRegistry, RegistryError> {
        Self::new_shared(seed_auctions())
    }

    pub fn len(&self) -> usize {
        self.auctions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consistent snapshot of every auction, in seed order
    pub fn list(&self) -> Vec<AuctionView> {
        self.auctions.lock().iter().map(Auction::view).collect()
    }

    pub fn get(&self, auction_id: AuctionId) -> Option<AuctionView> {
        self.auctions
            .lock()
            .iter()
            .find(|a| a.id() == auction_id)
            .map(Auction::view)
    }

    /// Locate, validate and apply a bid, all under one lock.
    pub fn try_bid(&self, auction_id: AuctionId, amount: Amount, bidder: ClientId) -> BidOutcome {
        let mut auctions = self.auctions.lock();
        match auctions.iter_mut().find(|a| a.id() == auction_id) {
            Some(auction) => auction.place_bid(amount, bidder),
            None => BidOutcome::NotFound,
        }
    }
}
