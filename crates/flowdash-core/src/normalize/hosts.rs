//! Active-host normalization and top-talker ranking.

use serde_json::Value;

use super::{first_bool, first_str, first_u64, format_gbps, percent_of, table_rows};
use crate::error::DashboardError;
use crate::model::HostEntry;

struct RawHost {
    name: String,
    ip: String,
    mac: String,
    bytes_sent: u64,
    bytes_rcvd: u64,
    total: u64,
    num_flows: u64,
    is_local: bool,
}

fn extract_host(row: &Value) -> RawHost {
    let ip = first_str(row, &[&["ip"]]).unwrap_or("N/A").to_owned();
    let name = first_str(row, &[&["name"]])
        .map(str::to_owned)
        .or_else(|| (ip != "N/A").then(|| ip.clone()))
        .unwrap_or_else(|| "Unknown".into());

    let bytes_sent = first_u64(row, &[&["bytes", "sent"], &["bytes_sent"]]).unwrap_or(0);
    let bytes_rcvd = first_u64(row, &[&["bytes", "rcvd"], &["bytes_rcvd"]]).unwrap_or(0);

    RawHost {
        name,
        ip,
        mac: first_str(row, &[&["mac"]]).unwrap_or("N/A").to_owned(),
        bytes_sent,
        bytes_rcvd,
        total: bytes_sent + bytes_rcvd,
        num_flows: first_u64(row, &[&["num_flows"], &["active_flows"]]).unwrap_or(0),
        is_local: first_bool(row, &[&["localhost"], &["is_local"]]).unwrap_or(false),
    }
}

/// Normalize an active-hosts page into the ranked top-talkers list.
///
/// Accepts a bare array of host rows or the `{ data: [...] }` page
/// wrapper. Ranks by stable descending sort on total bytes (ties keep
/// upstream order), keeps the top `limit`, and computes each host's share
/// of the heaviest talker's traffic.
pub fn normalize_hosts(payload: &Value, limit: usize) -> Result<Vec<HostEntry>, DashboardError> {
    let rows = table_rows(payload, "hosts")?;

    let mut raws: Vec<RawHost> = rows.iter().map(|row| extract_host(row)).collect();
    raws.sort_by(|a, b| b.total.cmp(&a.total));
    raws.truncate(limit);

    let max = raws.iter().map(|h| h.total).max().unwrap_or(0);

    Ok(raws
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| HostEntry {
            rank: u32::try_from(idx + 1).unwrap_or(u32::MAX),
            name: raw.name,
            ip: raw.ip,
            mac: raw.mac,
            traffic: format_gbps(raw.total),
            traffic_raw: raw.total,
            bytes_sent: raw.bytes_sent,
            bytes_rcvd: raw.bytes_rcvd,
            num_flows: raw.num_flows,
            is_local: raw.is_local,
            percent: percent_of(raw.total, max),
        })
        .collect())
}
