//! HTTP surface of the flowdash service.
//!
//! The binary in `main.rs` wires configuration and the snapshot cache
//! into [`routes::router`]; everything request-shaped lives in
//! [`routes`] so integration tests can drive the router in-process.

pub mod routes;
