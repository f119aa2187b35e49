use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::models::{ScanIdentifier, ScanType};

/// Tells view owners that cached scan state is stale and must be refetched.
#[derive(Debug, Clone, Serialize)]
pub struct InvalidationEvent {
    pub scan_type: ScanType,
    pub scan_ids: Vec<ScanIdentifier>,
    pub at: DateTime<Utc>,
}

/// Process-wide "invalidate cached views" channel.
///
/// Every subscriber sees every event. Invalidation is a refetch, so concurrent
/// signals from different flows need no ordering.
pub struct ViewInvalidator {
    tx: broadcast::Sender<InvalidationEvent>,
    fired: AtomicU64,
}

impl ViewInvalidator {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            fired: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InvalidationEvent> {
        self.tx.subscribe()
    }

    pub fn invalidate(&self, scan_type: ScanType, scan_ids: Vec<ScanIdentifier>) {
        self.fired.fetch_add(1, Ordering::SeqCst);
        let event = InvalidationEvent {
            scan_type,
            scan_ids,
            at: Utc::now(),
        };
        match self.tx.send(event) {
            Ok(receivers) => debug!(receivers, "Broadcast view invalidation"),
            Err(_) => debug!("View invalidation fired with no subscribers"),
        }
    }

    /// Number of signals fired so far.
    pub fn fired_count(&self) -> u64 {
        self.fired.load(Ordering::SeqCst)
    }
}

impl Default for ViewInvalidator {
    fn default() -> Self {
        Self::new(64)
    }
}
