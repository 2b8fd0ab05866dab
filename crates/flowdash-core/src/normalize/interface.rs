//! Interface-summary normalization.

use serde_json::Value;

use super::{first_f64, first_str, first_u64, first_value};
use crate::error::DashboardError;
use crate::model::{GIGA, InterfaceSnapshot};

/// Fallback nominal link speed in Mbps when the upstream omits it.
const DEFAULT_SPEED_MBPS: u64 = 1000;

/// Normalize the interface-summary payload into the canonical snapshot.
///
/// Throughput arrives either split under `throughput.{download,upload}.bps`
/// or pre-summed as `throughput_bps`; byte and packet counters appear flat
/// (`bytes_download`), nested under `eth.{ingress,egress}`, or under the
/// older `bytes_rcvd`/`bytes_sent` names. Absent fields default to zero.
/// The canonical counter and identity output names are accepted as
/// last-resort candidates, so those fields survive re-normalizing the
/// normalizer's own output. The throughput fields do not round-trip:
/// they are emitted unit-converted to Gbps under display names no
/// candidate list reads.
///
/// Fails only when the payload root is not an object.
#[allow(clippy::cast_precision_loss)]
pub fn normalize_interface(payload: &Value) -> Result<InterfaceSnapshot, DashboardError> {
    if !payload.is_object() {
        return Err(DashboardError::Normalization {
            what: "interface payload is not an object".into(),
        });
    }

    let download_bps = first_f64(payload, &[&["throughput", "download", "bps"]]).unwrap_or(0.0);
    let upload_bps = first_f64(payload, &[&["throughput", "upload", "bps"]]).unwrap_or(0.0);
    let total_bps =
        first_f64(payload, &[&["throughput_bps"]]).unwrap_or(download_bps + upload_bps);

    let current_speed = total_bps / GIGA;
    let download_gbps = download_bps / GIGA;
    let upload_gbps = upload_bps / GIGA;

    // A reported speed of 0 is as useless as no speed at all.
    let interface_speed = first_u64(payload, &[&["speed"], &["interface_speed"]])
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_SPEED_MBPS);
    let uplink_capacity_gbps = interface_speed as f64 / 1000.0;
    let uplink_percent = ((current_speed / uplink_capacity_gbps) * 100.0).clamp(0.0, 100.0);

    let bytes_download = first_u64(payload, &[
        &["bytes_download"],
        &["eth", "ingress", "bytes"],
        &["bytes_rcvd"],
    ])
    .unwrap_or(0);
    let bytes_upload = first_u64(payload, &[
        &["bytes_upload"],
        &["eth", "egress", "bytes"],
        &["bytes_sent"],
    ])
    .unwrap_or(0);
    let total_bytes = first_u64(payload, &[&["bytes"], &["total_bytes"]])
        .unwrap_or(bytes_download + bytes_upload);

    let packets_download = first_u64(payload, &[
        &["packets_download"],
        &["eth", "ingress", "packets"],
        &["packets_rcvd"],
    ])
    .unwrap_or(0);
    let packets_upload = first_u64(payload, &[
        &["packets_upload"],
        &["eth", "egress", "packets"],
        &["packets_sent"],
    ])
    .unwrap_or(0);
    let total_packets = first_u64(payload, &[&["packets"], &["total_packets"]])
        .unwrap_or(packets_download + packets_upload);

    Ok(InterfaceSnapshot {
        current_speed,
        download_gbps,
        upload_gbps,
        uplink_percent,
        uplink_capacity_gbps,
        total_bytes,
        bytes_download,
        bytes_upload,
        total_packets,
        packets_download,
        packets_upload,
        num_flows: first_u64(payload, &[&["num_flows"]]).unwrap_or(0),
        num_hosts: first_u64(payload, &[&["num_hosts"]]).unwrap_or(0),
        num_local_hosts: first_u64(payload, &[&["num_local_hosts"]]).unwrap_or(0),
        num_devices: first_u64(payload, &[&["num_devices"]]).unwrap_or(0),
        interface_id: first_value(payload, &[&["ifid"], &["interface_id"]])
            .and_then(Value::as_i64),
        interface_name: first_str(payload, &[&["ifname"], &["interface_name"]])
            .unwrap_or("eth0")
            .to_owned(),
        interface_speed,
        alerted_flows: first_u64(payload, &[&["alerted_flows"]]).unwrap_or(0),
        engaged_alerts: first_u64(payload, &[&["engaged_alerts"]]).unwrap_or(0),
        drops: first_u64(payload, &[&["drops"]]).unwrap_or(0),
        uptime_sec: first_u64(payload, &[&["uptime_sec"]]).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn normalizes_split_throughput_shape() {
        let payload = json!({
            "ifid": 1,
            "ifname": "eth1",
            "speed": 10_000,
            "throughput": {
                "download": { "bps": 400_000_000.0 },
                "upload": { "bps": 100_000_000.0 }
            },
            "bytes_download": 5_000,
            "bytes_upload": 2_000,
            "packets_download": 50,
            "packets_upload": 20,
            "num_flows": 12,
            "num_hosts": 4,
            "num_local_hosts": 2,
            "num_devices": 3,
            "alerted_flows": 1,
            "engaged_alerts": 2,
            "drops": 7,
            "uptime_sec": 3600
        });

        let snap = normalize_interface(&payload).unwrap();

        assert_eq!(snap.current_speed, 0.5);
        assert_eq!(snap.download_gbps, 0.4);
        assert_eq!(snap.upload_gbps, 0.1);
        assert_eq!(snap.uplink_capacity_gbps, 10.0);
        assert_eq!(snap.uplink_percent, 5.0);
        assert_eq!(snap.total_bytes, 7_000);
        assert_eq!(snap.total_packets, 70);
        assert_eq!(snap.interface_id, Some(1));
        assert_eq!(snap.interface_name, "eth1");
        assert_eq!(snap.uptime_sec, 3600);
    }

    #[test]
    fn older_shape_produces_identical_output() {
        // Same traffic expressed through the alternate field locations.
        let newer = json!({
            "throughput_bps": 500_000_000.0,
            "speed": 1000,
            "bytes_download": 5_000,
            "bytes_upload": 2_000
        });
        let older = json!({
            "throughput_bps": 500_000_000.0,
            "speed": 1000,
            "eth": {
                "ingress": { "bytes": 5_000 },
                "egress": { "bytes": 2_000 }
            }
        });

        let a = normalize_interface(&newer).unwrap();
        let b = normalize_interface(&older).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn flat_fields_win_over_nested() {
        let payload = json!({
            "bytes_download": 111,
            "eth": { "ingress": { "bytes": 999 } }
        });

        let snap = normalize_interface(&payload).unwrap();

        assert_eq!(snap.bytes_download, 111);
    }

    #[test]
    fn empty_object_gets_documented_defaults() {
        let snap = normalize_interface(&json!({})).unwrap();

        assert_eq!(snap.current_speed, 0.0);
        assert_eq!(snap.uplink_percent, 0.0);
        assert_eq!(snap.interface_name, "eth0");
        assert_eq!(snap.interface_speed, 1000);
        assert_eq!(snap.interface_id, None);
        assert_eq!(snap.total_bytes, 0);
    }

    #[test]
    fn uplink_percent_is_capped_at_100() {
        let payload = json!({
            // 2 Gbps through a 1 Gbps link.
            "throughput_bps": 2_000_000_000.0,
            "speed": 1000
        });

        let snap = normalize_interface(&payload).unwrap();

        assert_eq!(snap.uplink_percent, 100.0);
    }

    #[test]
    fn zero_speed_falls_back_to_default() {
        let payload = json!({ "speed": 0, "throughput_bps": 0.0 });

        let snap = normalize_interface(&payload).unwrap();

        assert_eq!(snap.interface_speed, 1000);
        assert_eq!(snap.uplink_percent, 0.0);
    }

    #[test]
    fn non_object_root_is_a_normalization_error() {
        assert!(normalize_interface(&json!(null)).is_err());
        assert!(normalize_interface(&json!("nope")).is_err());
    }

    #[test]
    fn normalization_is_idempotent_on_its_own_output() {
        let payload = json!({
            "throughput_bps": 250_000_000.0,
            "speed": 1000,
            "bytes": 9_000,
            "num_flows": 3
        });

        let once = normalize_interface(&payload).unwrap();
        let round_tripped = serde_json::to_value(&once).unwrap();
        // Feeding canonical output back through produces the same core
        // counters; the canonical shape is itself a supported shape.
        let twice = normalize_interface(&round_tripped).unwrap();

        assert_eq!(once.total_bytes, twice.total_bytes);
        assert_eq!(once.num_flows, twice.num_flows);
        assert_eq!(once.interface_name, twice.interface_name);
        assert_eq!(once.interface_speed, twice.interface_speed);
    }
}
