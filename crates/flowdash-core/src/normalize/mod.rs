//! Per-entity payload normalization.
//!
//! ntopng's REST payloads have drifted across versions: the same datum can
//! be flat (`bytes_download`), nested (`eth.ingress.bytes`), or renamed
//! (`bytes_rcvd`). Each canonical field is therefore resolved through an
//! ordered list of candidate paths tried in priority order — the first
//! present location wins, and absence under every candidate yields a
//! documented default instead of an error.
//!
//! A path element is a literal object key. ntopng flow rows use dotted
//! keys literally (`"cli.ip"` is one key, not nesting), so nesting is
//! expressed as multiple elements: `&["throughput", "download", "bps"]`.
//!
//! All functions here are pure; the only failure mode is a payload root
//! that is not an indexable structure at all.

mod applications;
mod flows;
mod hosts;
mod interface;

pub use applications::normalize_applications;
pub use flows::normalize_flows;
pub use hosts::normalize_hosts;
pub use interface::normalize_interface;

use serde_json::Value;

use crate::error::DashboardError;
use crate::model::GIGA;

/// Walk a candidate path of literal object keys.
fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = root;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

/// First candidate path that resolves to any value.
fn first_value<'a>(root: &'a Value, candidates: &[&[&str]]) -> Option<&'a Value> {
    candidates.iter().find_map(|path| lookup(root, path))
}

/// Coerce a JSON number to `u64`, accepting float-encoded counters.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_u64(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
}

/// First candidate that resolves to a non-negative integer.
pub(crate) fn first_u64(root: &Value, candidates: &[&[&str]]) -> Option<u64> {
    candidates
        .iter()
        .find_map(|path| lookup(root, path).and_then(coerce_u64))
}

/// First candidate that resolves to a number.
pub(crate) fn first_f64(root: &Value, candidates: &[&[&str]]) -> Option<f64> {
    candidates
        .iter()
        .find_map(|path| lookup(root, path).and_then(Value::as_f64))
}

/// First candidate that resolves to a non-empty string.
pub(crate) fn first_str<'a>(root: &'a Value, candidates: &[&[&str]]) -> Option<&'a str> {
    candidates.iter().find_map(|path| {
        lookup(root, path)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    })
}

/// First candidate that resolves to a boolean.
pub(crate) fn first_bool(root: &Value, candidates: &[&[&str]]) -> Option<bool> {
    candidates
        .iter()
        .find_map(|path| lookup(root, path).and_then(Value::as_bool))
}

/// Extract the row list from a paged payload.
///
/// Accepts either a bare array or the usual `{ data: [...] }` page
/// wrapper; an object without a `data` array is an empty result, not an
/// error. A null/scalar root is the one malformed-payload case.
fn table_rows<'a>(payload: &'a Value, what: &str) -> Result<Vec<&'a Value>, DashboardError> {
    match payload {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(_) => Ok(payload
            .get("data")
            .and_then(Value::as_array)
            .map(|rows| rows.iter().collect())
            .unwrap_or_default()),
        _ => Err(DashboardError::Normalization {
            what: format!("{what} payload is not an object or array"),
        }),
    }
}

/// Render a byte total as a display string in decimal gigabits-ish form
/// (`"0.123 Gbps"`), matching the dashboard contract.
#[allow(clippy::cast_precision_loss)]
fn format_gbps(bytes: u64) -> String {
    format!("{:.3} Gbps", bytes as f64 / GIGA)
}

/// Share-of-maximum percentage, formatted to one decimal and clamped to
/// `[0, 100]`. A zero maximum is treated as 1 so an all-zero input set
/// yields `"0.0"` instead of NaN.
#[allow(clippy::cast_precision_loss)]
fn percent_of(total: u64, max: u64) -> String {
    let max = max.max(1);
    let pct = ((total as f64 / max as f64) * 100.0).clamp(0.0, 100.0);
    format!("{pct:.1}")
}
