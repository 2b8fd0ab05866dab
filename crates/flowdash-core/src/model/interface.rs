use serde::Serialize;

/// Canonical per-interface traffic summary.
///
/// Invariants: all counters are non-negative (enforced by type), and
/// `uplink_percent` is clamped to `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceSnapshot {
    /// Total throughput right now, in Gbps (download + upload).
    pub current_speed: f64,
    pub download_gbps: f64,
    pub upload_gbps: f64,
    /// Share of the link capacity currently in use, 0–100.
    pub uplink_percent: f64,
    pub uplink_capacity_gbps: f64,

    pub total_bytes: u64,
    pub bytes_download: u64,
    pub bytes_upload: u64,

    pub total_packets: u64,
    pub packets_download: u64,
    pub packets_upload: u64,

    pub num_flows: u64,
    pub num_hosts: u64,
    pub num_local_hosts: u64,
    pub num_devices: u64,

    pub interface_id: Option<i64>,
    pub interface_name: String,
    /// Nominal link speed in Mbps.
    pub interface_speed: u64,

    pub alerted_flows: u64,
    pub engaged_alerts: u64,
    pub drops: u64,
    pub uptime_sec: u64,
}
