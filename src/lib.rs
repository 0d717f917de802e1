//! A small live-auction server
//!
//! Clients connect over TCP, get the list of open auctions and place bids
//! with a line protocol (see [`protocol`]). All auction state lives in one
//! [`registry::AuctionRegistry`] shared by the per-connection sessions.
pub mod auction;
pub mod client;
pub mod config;
pub mod diagnostic;
pub mod event;
pub mod protocol;
pub mod registry;
pub mod service;
