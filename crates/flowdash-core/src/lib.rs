//! Normalization, aggregation, and caching core for the flowdash service.
//!
//! This crate turns the loosely-typed payloads fetched by `flowdash-api`
//! into one deterministic dashboard schema and bounds how often the
//! upstream is asked for them:
//!
//! - **[`normalize`]** — Pure per-entity functions that tolerate the field
//!   layouts of multiple ntopng generations (flat fields, nested alternate
//!   keys) and fill documented defaults for anything absent. Each canonical
//!   field is resolved through an ordered candidate list; the first present
//!   location wins.
//!
//! - **[`StatsTracker`]** — Bounded rolling window of throughput samples
//!   with derived peak/average/minimum. The only state that survives
//!   across poll cycles; injected into the aggregator, never a global.
//!
//! - **[`Aggregator`]** — Fetches the four upstream resources concurrently
//!   and merges them into a [`DashboardSnapshot`]. Interface data is
//!   load-bearing; host/flow/application failures degrade to empty lists.
//!
//! - **[`SnapshotCache`]** — Single-slot TTL gate in front of the
//!   aggregator. The slot's async lock is held across the fetch, so
//!   concurrent callers arriving during a miss share one in-flight fetch.

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod model;
pub mod normalize;
pub mod stats;

pub use aggregate::{Aggregator, FetchLimits, NtopApi};
pub use cache::SnapshotCache;
pub use error::DashboardError;
pub use model::{
    ApplicationEntry, DashboardSnapshot, FlowEndpoint, FlowEntry, HostEntry, InterfaceSnapshot,
    RollingStats,
};
pub use stats::StatsTracker;
