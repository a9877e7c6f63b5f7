//! Shutdown coordination for the server.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Every running server subscribes; one trigger stops them all.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A receiver to pass to [`crate::http::HttpServer::run`].
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscriber to stop. Returns how many were listening.
    pub fn trigger(&self) -> usize {
        let listening = self.tx.send(()).unwrap_or(0);
        tracing::info!(subscribers = listening, "Shutdown triggered");
        listening
    }

    /// Number of servers still subscribed.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
