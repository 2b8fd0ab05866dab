//! Concurrent upstream aggregation into one dashboard snapshot.

use std::future::Future;
use std::sync::Mutex;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::DashboardError;
use crate::model::{ApplicationEntry, DashboardSnapshot, FlowEntry, HostEntry};
use crate::normalize::{
    normalize_applications, normalize_flows, normalize_hosts, normalize_interface,
};
use crate::stats::StatsTracker;

/// Upstream page size for the dashboard's host fetch; more than we keep,
/// so ranking sees a little context beyond the cut.
const HOST_FETCH_PAGE: u32 = 15;
/// Upstream page size for the dashboard's flow fetch.
const FLOW_FETCH_PAGE: u32 = 100;

/// The four upstream resource fetches the aggregator depends on.
///
/// `flowdash_api::NtopClient` is the production implementation; tests
/// inject stubs to exercise the degradation policy without a network.
pub trait NtopApi {
    /// The configured interface selector (snapshot metadata).
    fn ifid(&self) -> i64;

    fn interface_data(&self)
    -> impl Future<Output = Result<Value, flowdash_api::Error>> + Send;

    fn active_hosts(
        &self,
        per_page: u32,
    ) -> impl Future<Output = Result<Value, flowdash_api::Error>> + Send;

    fn active_flows(
        &self,
        per_page: u32,
    ) -> impl Future<Output = Result<Value, flowdash_api::Error>> + Send;

    fn l7_stats(&self) -> impl Future<Output = Result<Value, flowdash_api::Error>> + Send;
}

impl NtopApi for flowdash_api::NtopClient {
    fn ifid(&self) -> i64 {
        flowdash_api::NtopClient::ifid(self)
    }

    async fn interface_data(&self) -> Result<Value, flowdash_api::Error> {
        flowdash_api::NtopClient::interface_data(self).await
    }

    async fn active_hosts(&self, per_page: u32) -> Result<Value, flowdash_api::Error> {
        flowdash_api::NtopClient::active_hosts(self, per_page).await
    }

    async fn active_flows(&self, per_page: u32) -> Result<Value, flowdash_api::Error> {
        flowdash_api::NtopClient::active_flows(self, per_page).await
    }

    async fn l7_stats(&self) -> Result<Value, flowdash_api::Error> {
        flowdash_api::NtopClient::l7_stats(self).await
    }
}

/// List-size bounds for one snapshot build.
#[derive(Debug, Clone, Copy)]
pub struct FetchLimits {
    pub hosts: usize,
    pub flows: usize,
    pub applications: usize,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            hosts: 10,
            flows: 50,
            applications: 10,
        }
    }
}

/// Orchestrates the four upstream fetches and merges the normalized
/// results into one [`DashboardSnapshot`].
///
/// The interface summary is load-bearing: its failure aborts the whole
/// build. Host, flow, and application failures degrade to empty lists —
/// a dashboard with partial data beats no dashboard.
pub struct Aggregator<A> {
    api: A,
    limits: FetchLimits,
    /// Single writer: mutated only from the snapshot-build path, which
    /// the cache serializes. The mutex makes that discipline explicit.
    stats: Mutex<StatsTracker>,
}

impl<A: NtopApi> Aggregator<A> {
    pub fn new(api: A, limits: FetchLimits) -> Self {
        Self {
            api,
            limits,
            stats: Mutex::new(StatsTracker::new()),
        }
    }

    /// The underlying API client (for health probes and raw passthrough).
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetch all four resources concurrently and build a snapshot.
    ///
    /// This is a join, not a race: every fetch runs to completion or
    /// failure before merging starts. No retries — the next poll cycle
    /// is the retry mechanism.
    pub async fn fetch_all(&self) -> Result<DashboardSnapshot, DashboardError> {
        debug!("fetching dashboard data from ntopng");

        let (iface, hosts, flows, l7) = tokio::join!(
            self.api.interface_data(),
            self.api.active_hosts(HOST_FETCH_PAGE),
            self.api.active_flows(FLOW_FETCH_PAGE),
            self.api.l7_stats(),
        );

        // No partial snapshot without core interface data.
        let iface = iface.map_err(|source| DashboardError::Unavailable { source })?;
        let interface = normalize_interface(&iface)?;

        let top_talkers =
            Self::degrade("top talkers", hosts, |v| normalize_hosts(v, self.limits.hosts));
        let active_flows =
            Self::degrade("active flows", flows, |v| normalize_flows(v, self.limits.flows));
        let top_applications = Self::degrade("applications", l7, |v| {
            normalize_applications(v, self.limits.applications)
        });

        let stats = self
            .stats
            .lock()
            .expect("stats lock poisoned")
            .update(interface.current_speed);

        Ok(DashboardSnapshot {
            active_flows_count: interface.num_flows,
            total_devices: interface.num_hosts,
            local_devices: interface.num_local_hosts,
            timestamp: Utc::now().timestamp_millis(),
            data_source: "ntop_live",
            ntop_interface: interface.interface_id.unwrap_or_else(|| self.api.ifid()),
            ntop_interface_name: interface.interface_name.clone(),
            top_talkers,
            active_flows,
            top_applications,
            interface,
            stats,
        })
    }

    /// Collapse a supplementary resource's fetch or normalization failure
    /// into an empty list, logging the degradation.
    fn degrade<T>(
        what: &str,
        fetched: Result<Value, flowdash_api::Error>,
        normalize: impl FnOnce(&Value) -> Result<Vec<T>, DashboardError>,
    ) -> Vec<T> {
        let result = match fetched {
            Ok(payload) => normalize(&payload).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        result.unwrap_or_else(|reason| {
            warn!("{what} unavailable, serving empty list: {reason}");
            Vec::new()
        })
    }

    // ── Direct (uncached) resource views ─────────────────────────────

    /// Top-`limit` hosts, fetched fresh.
    pub async fn top_talkers(&self, limit: usize) -> Result<Vec<HostEntry>, DashboardError> {
        let page = u32::try_from(limit).unwrap_or(u32::MAX);
        let payload = self
            .api
            .active_hosts(page)
            .await
            .map_err(|source| DashboardError::Unavailable { source })?;
        normalize_hosts(&payload, limit)
    }

    /// Top-`limit` flows, fetched fresh.
    pub async fn top_flows(&self, limit: usize) -> Result<Vec<FlowEntry>, DashboardError> {
        let page = u32::try_from(limit).unwrap_or(u32::MAX);
        let payload = self
            .api
            .active_flows(page)
            .await
            .map_err(|source| DashboardError::Unavailable { source })?;
        normalize_flows(&payload, limit)
    }

    /// Ranked application breakdown, fetched fresh.
    pub async fn applications(&self) -> Result<Vec<ApplicationEntry>, DashboardError> {
        let payload = self
            .api
            .l7_stats()
            .await
            .map_err(|source| DashboardError::Unavailable { source })?;
        normalize_applications(&payload, self.limits.applications)
    }
}
