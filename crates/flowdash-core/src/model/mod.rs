//! Canonical dashboard schema.
//!
//! These are the output types of the normalization layer. Field names are
//! the service's JSON contract and must stay stable regardless of which
//! upstream generation the data came from. All entities except
//! [`RollingStats`] are recomputed fresh every poll cycle.

mod interface;
mod snapshot;
mod traffic;

pub use interface::InterfaceSnapshot;
pub use snapshot::{DashboardSnapshot, RollingStats};
pub use traffic::{ApplicationEntry, FlowEndpoint, FlowEntry, HostEntry};

/// Decimal divisor for bytes → gigabits-per-second style display values.
/// ntopng reports decimal units (1000-based), not binary.
pub(crate) const GIGA: f64 = 1_000_000_000.0;

/// Decimal divisor for bits → megabits-per-second.
pub(crate) const MEGA: f64 = 1_000_000.0;
