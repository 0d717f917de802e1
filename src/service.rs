pub mod acceptor;
pub mod session;

pub use self::{acceptor::*, session::*};
use std::sync::Arc;
use tokio::sync::watch;

/// Service execution control instance
///
/// Shared by the acceptor and anything that wants to stop it, like the
/// Ctrl-C handler. Stopping is one-way: once stopped, always stopped.
#[derive(Clone)]
pub struct ServiceControl {
    stop_tx: Arc<watch::Sender<bool>>,
    stop_rx: watch::Receiver<bool>,
}

impl Default for ServiceControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceControl {
    pub fn new() -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        Self {
            stop_tx: Arc::new(stop_tx),
            stop_rx,
        }
    }

    /// Safe to call from any thread, including signal handlers
    pub fn stop_all(&self) {
        // we hold a receiver ourselves, so this can't fail
        let _ = self.stop_tx.send(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop_rx.borrow()
    }

    /// Resolves once [`Self::stop_all`] was called
    pub async fn stopped(&self) {
        let mut rx = self.stop_rx.clone();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}
