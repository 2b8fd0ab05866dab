use serde::Serialize;

/// One host in the top-talkers ranking.
///
/// `rank` is 1-based, assigned by stable descending sort on
/// `traffic_raw`; ties keep upstream order. `percent` is the share of the
/// heaviest talker's traffic, formatted to one decimal place and clamped
/// to `[0, 100]` — an all-zero result set yields `"0.0"`, never NaN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostEntry {
    pub rank: u32,
    /// Display name; falls back to the IP, then `"Unknown"`.
    pub name: String,
    pub ip: String,
    pub mac: String,
    /// Human-readable total traffic, e.g. `"1.234 Gbps"`.
    pub traffic: String,
    /// Total traffic in bytes (sent + received).
    pub traffic_raw: u64,
    pub bytes_sent: u64,
    pub bytes_rcvd: u64,
    pub num_flows: u64,
    pub is_local: bool,
    pub percent: String,
}

/// One side of a flow's client/server pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEndpoint {
    pub ip: String,
    pub port: u16,
    pub name: String,
}

/// One active client–server traffic session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEntry {
    pub client: FlowEndpoint,
    pub server: FlowEndpoint,
    /// Transport protocol label (TCP/UDP/...), `"Unknown"` if absent.
    pub protocol: String,
    /// Application-layer protocol label from nDPI.
    pub application: String,
    pub bytes: u64,
    pub bytes_sent: u64,
    pub bytes_rcvd: u64,
    pub packets: u64,
    /// Flow duration in seconds.
    pub duration: u64,
    /// Instantaneous throughput in Mbps, formatted to two decimals.
    pub traffic_mbps: String,
}

/// One application in the layer-7 traffic breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationEntry {
    pub rank: u32,
    pub name: String,
    pub traffic: String,
    pub traffic_raw: u64,
    pub bytes_sent: u64,
    pub bytes_rcvd: u64,
    pub packets: u64,
    pub flows: u64,
    pub percent: String,
}
