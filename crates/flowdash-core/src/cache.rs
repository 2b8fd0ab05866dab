//! Short-TTL snapshot cache in front of the aggregator.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::aggregate::{Aggregator, NtopApi};
use crate::error::DashboardError;
use crate::model::DashboardSnapshot;

/// Default snapshot time-to-live.
pub const DEFAULT_TTL: Duration = Duration::from_millis(2000);

struct CachedSnapshot {
    snapshot: Arc<DashboardSnapshot>,
    stored_at: Instant,
}

/// Caches the latest [`DashboardSnapshot`] for a short TTL so a burst of
/// dashboard clients costs one upstream round trip, not one per client.
///
/// The slot lock is held across the refresh fetch, so concurrent misses
/// collapse into a single upstream fetch: one caller refreshes, the rest
/// wait and reuse its result. A failed refresh leaves any stale entry in
/// place; it only serves entries that are still within the TTL.
pub struct SnapshotCache<A> {
    aggregator: Aggregator<A>,
    ttl: Duration,
    slot: Mutex<Option<CachedSnapshot>>,
}

impl<A: NtopApi> SnapshotCache<A> {
    pub fn new(aggregator: Aggregator<A>, ttl: Duration) -> Self {
        Self {
            aggregator,
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn with_default_ttl(aggregator: Aggregator<A>) -> Self {
        Self::new(aggregator, DEFAULT_TTL)
    }

    /// The aggregator behind the cache (for uncached endpoints).
    pub fn aggregator(&self) -> &Aggregator<A> {
        &self.aggregator
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The current snapshot, refreshed through the aggregator when the
    /// cached one has expired.
    pub async fn get(&self) -> Result<Arc<DashboardSnapshot>, DashboardError> {
        let mut slot = self.slot.lock().await;

        // Re-checked under the lock: a caller that queued behind a
        // refresh sees the entry that refresh just stored.
        if let Some(cached) = slot.as_ref() {
            if cached.stored_at.elapsed() < self.ttl {
                debug!("serving cached dashboard snapshot");
                return Ok(Arc::clone(&cached.snapshot));
            }
        }

        let snapshot = Arc::new(self.aggregator.fetch_all().await?);
        *slot = Some(CachedSnapshot {
            snapshot: Arc::clone(&snapshot),
            stored_at: Instant::now(),
        });
        Ok(snapshot)
    }
}
