//! Lazily established connection to the remote frame.

use crate::remote::{RemoteFrame, RemoteFrameRecord};
use std::sync::Arc;
use tracing::trace;

/// Caches at most one connection for the currently bound record.
///
/// The owner resets it whenever the record changes or is cleared. Connecting
/// goes through the embedder, so [`RemoteEndpointBinder::connect`] is kept
/// apart from the cache and must be called without holding the frame lock.
#[derive(Default)]
pub struct RemoteEndpointBinder {
    connection: Option<Arc<dyn RemoteFrame>>,
}

impl RemoteEndpointBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask `record` for a fresh connection. `None` when it is unreachable.
    pub fn connect(record: &dyn RemoteFrameRecord) -> Option<Arc<dyn RemoteFrame>> {
        let connection = record.connect()?;
        trace!(
            process_id = record.process_id(),
            routing_id = record.routing_id(),
            "Connected to remote frame"
        );
        Some(connection)
    }

    pub fn cached(&self) -> Option<Arc<dyn RemoteFrame>> {
        self.connection.clone()
    }

    /// Cache `connection` unless one is already cached, returning the winner.
    pub fn store(&mut self, connection: Arc<dyn RemoteFrame>) -> Arc<dyn RemoteFrame> {
        Arc::clone(self.connection.get_or_insert(connection))
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn reset(&mut self) {
        self.connection = None;
    }
}

impl std::fmt::Debug for RemoteEndpointBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteEndpointBinder")
            .field("connected", &self.is_connected())
            .finish()
    }
}
