//! Error types for ntopng API calls.

/// Failures from the ntopng REST API, split by where the request died.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No response was received at all: connection refused, DNS failure,
    /// or the request timed out before the upstream answered.
    #[error("cannot connect to ntopng at {url}: {message}")]
    Unreachable { url: String, message: String },

    /// The upstream answered with a non-success HTTP status.
    #[error("ntopng API error: HTTP {status}: {body}")]
    Protocol { status: u16, body: String },

    /// Transport succeeded but the envelope carried a non-zero `rc` code
    /// (ntopng's own application-level failure signal).
    #[error("ntopng API error: rc={rc}, {message}")]
    Api { rc: i64, message: String },

    /// The response body was not valid JSON.
    #[error("failed to decode ntopng response: {message}")]
    Deserialization { message: String },

    /// The `reqwest::Client` could not be constructed from the transport
    /// config (bad TLS settings, etc.).
    #[error("failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}
