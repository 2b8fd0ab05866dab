//! Layer-7 application breakdown normalization.

use serde_json::Value;

use super::{first_u64, format_gbps, percent_of};
use crate::error::DashboardError;
use crate::model::ApplicationEntry;

struct RawApp {
    name: String,
    total: u64,
    bytes_sent: u64,
    bytes_rcvd: u64,
    packets: u64,
    flows: u64,
}

fn extract_app(name: &str, stats: &Value) -> RawApp {
    let bytes_sent = first_u64(stats, &[&["bytes", "sent"]]).unwrap_or(0);
    let bytes_rcvd = first_u64(stats, &[&["bytes", "rcvd"]]).unwrap_or(0);
    // Newer builds split bytes into a sent/rcvd object; older ones report
    // a scalar `bytes` or `traffic` total.
    let total = if bytes_sent + bytes_rcvd > 0 {
        bytes_sent + bytes_rcvd
    } else {
        first_u64(stats, &[&["bytes"], &["traffic"]]).unwrap_or(0)
    };

    let packets_sent = first_u64(stats, &[&["packets", "sent"]]).unwrap_or(0);
    let packets_rcvd = first_u64(stats, &[&["packets", "rcvd"]]).unwrap_or(0);
    let packets = first_u64(stats, &[&["packets"]]).unwrap_or(packets_sent + packets_rcvd);

    RawApp {
        name: name.to_owned(),
        total,
        bytes_sent,
        bytes_rcvd,
        packets,
        flows: first_u64(stats, &[&["num_flows"], &["flows"]]).unwrap_or(0),
    }
}

/// Normalize the per-application traffic map into a ranked list.
///
/// The application map sits at the payload root on some builds and under
/// an `applications` or `ndpi` key on others. Entries whose value is not
/// an object are skipped. Ranking is a stable descending sort on total
/// bytes (ties keep the map's upstream order), keeping the top `limit`.
pub fn normalize_applications(
    payload: &Value,
    limit: usize,
) -> Result<Vec<ApplicationEntry>, DashboardError> {
    if !payload.is_object() {
        return Err(DashboardError::Normalization {
            what: "application stats payload is not an object".into(),
        });
    }

    let table = payload
        .get("applications")
        .or_else(|| payload.get("ndpi"))
        .filter(|v| v.is_object())
        .unwrap_or(payload);

    let Some(map) = table.as_object() else {
        return Ok(Vec::new());
    };

    let mut apps: Vec<RawApp> = map
        .iter()
        .filter(|(_, stats)| stats.is_object())
        .map(|(name, stats)| extract_app(name, stats))
        .collect();
    apps.sort_by(|a, b| b.total.cmp(&a.total));
    apps.truncate(limit);

    let max = apps.iter().map(|a| a.total).max().unwrap_or(0);

    Ok(apps
        .into_iter()
        .enumerate()
        .map(|(idx, app)| ApplicationEntry {
            rank: u32::try_from(idx + 1).unwrap_or(u32::MAX),
            name: app.name,
            traffic: format_gbps(app.total),
            traffic_raw: app.total,
            bytes_sent: app.bytes_sent,
            bytes_rcvd: app.bytes_rcvd,
            packets: app.packets,
            flows: app.flows,
            percent: percent_of(app.total, max),
        })
        .collect())
}
