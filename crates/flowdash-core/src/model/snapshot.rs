use serde::Serialize;

use super::{ApplicationEntry, FlowEntry, HostEntry, InterfaceSnapshot};

/// Rolling throughput statistics across poll cycles.
///
/// `peak_speed` is the lifetime maximum (monotonically non-decreasing for
/// the life of the process); `avg_speed` and `speed_history` are bounded
/// to the retained window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingStats {
    pub peak_speed: f64,
    pub avg_speed: f64,
    pub min_speed: f64,
    /// Retained samples in arrival order, oldest first.
    pub speed_history: Vec<f64>,
    /// Seconds since the tracker was created.
    pub uptime: u64,
}

/// The complete dashboard payload served by `/api/ntop/stats`.
///
/// Immutable once produced; the cache replaces it wholesale, never
/// mutates it. Interface and stats fields are flattened into the top
/// level to keep the wire contract flat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    #[serde(flatten)]
    pub interface: InterfaceSnapshot,
    #[serde(flatten)]
    pub stats: RollingStats,

    pub top_talkers: Vec<HostEntry>,
    pub active_flows: Vec<FlowEntry>,
    pub active_flows_count: u64,
    pub top_applications: Vec<ApplicationEntry>,

    pub total_devices: u64,
    pub local_devices: u64,

    /// Capture time, epoch milliseconds.
    pub timestamp: i64,
    pub data_source: &'static str,
    pub ntop_interface: i64,
    pub ntop_interface_name: String,
}
