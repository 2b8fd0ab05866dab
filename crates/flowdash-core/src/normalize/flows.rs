//! Active-flow normalization.

use serde_json::Value;

use super::{first_str, first_u64, table_rows};
use crate::error::DashboardError;
use crate::model::{FlowEndpoint, FlowEntry, MEGA};

/// ntopng flow rows key the endpoints with literal dotted names
/// (`"cli.ip"` is one key, not nesting); older builds used flat
/// `client`/`server` fields instead.
fn extract_endpoint(
    row: &Value,
    dotted_ip: &str,
    plain_ip: &str,
    dotted_port: &str,
    plain_port: &str,
    name_key: &str,
) -> FlowEndpoint {
    FlowEndpoint {
        ip: first_str(row, &[&[dotted_ip], &[plain_ip]])
            .unwrap_or("N/A")
            .to_owned(),
        port: first_u64(row, &[&[dotted_port], &[plain_port]])
            .and_then(|p| u16::try_from(p).ok())
            .unwrap_or(0),
        name: first_str(row, &[&[name_key]]).unwrap_or("").to_owned(),
    }
}

fn extract_flow(row: &Value) -> FlowEntry {
    let bytes_sent = first_u64(row, &[&["bytes", "sent"]]).unwrap_or(0);
    let bytes_rcvd = first_u64(row, &[&["bytes", "rcvd"]]).unwrap_or(0);
    // `bytes` is a scalar total on older builds and a nested object on
    // newer ones; first_u64 only matches the scalar form.
    let bytes = first_u64(row, &[&["bytes"]]).unwrap_or(bytes_sent + bytes_rcvd);

    let packets_sent = first_u64(row, &[&["packets", "sent"]]).unwrap_or(0);
    let packets_rcvd = first_u64(row, &[&["packets", "rcvd"]]).unwrap_or(0);
    let packets = first_u64(row, &[&["packets"]]).unwrap_or(packets_sent + packets_rcvd);

    #[allow(clippy::cast_precision_loss)]
    let mbps = (bytes as f64 * 8.0) / MEGA;

    FlowEntry {
        client: extract_endpoint(row, "cli.ip", "client", "cli.port", "client_port", "cli.name"),
        server: extract_endpoint(row, "srv.ip", "server", "srv.port", "server_port", "srv.name"),
        protocol: first_str(row, &[&["proto"], &["protocol"], &["l4proto"]])
            .unwrap_or("Unknown")
            .to_owned(),
        application: first_str(row, &[&["l7proto_name"], &["application"], &["l7proto"]])
            .unwrap_or("Unknown")
            .to_owned(),
        bytes,
        bytes_sent,
        bytes_rcvd,
        packets,
        duration: first_u64(row, &[&["duration"]]).unwrap_or(0),
        traffic_mbps: format!("{mbps:.2}"),
    }
}

/// Normalize an active-flows page, keeping the first `limit` rows in
/// upstream order (the upstream already sorts by traffic descending).
pub fn normalize_flows(payload: &Value, limit: usize) -> Result<Vec<FlowEntry>, DashboardError> {
    let rows = table_rows(payload, "flows")?;

    Ok(rows.into_iter().take(limit).map(extract_flow).collect())
}
