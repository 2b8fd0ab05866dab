//! Async client for the ntopng REST v2 API.
//!
//! ntopng exposes its live traffic data through Lua REST endpoints that
//! return a JSON envelope: `{ "rc": 0, "rc_str": "OK", "rsp": ... }`.
//! This crate owns the transport mechanics:
//!
//! - **[`NtopClient`]** — authenticated GET requests with the configured
//!   interface selector merged into every query, envelope unwrapping, and
//!   typed failures for the three ways an upstream call can go wrong
//!   (no response, bad transport status, non-zero envelope code).
//! - **[`TransportConfig`]** — request timeout and TLS verification
//!   policy, turned into a shared `reqwest::Client`.
//!
//! Payloads are returned as loosely-typed `serde_json::Value` — the field
//! layout varies across ntopng versions, so shape tolerance is handled one
//! layer up, not here.

pub mod client;
pub mod error;
pub mod transport;

pub use client::NtopClient;
pub use error::Error;
pub use transport::{TlsVerification, TransportConfig};
