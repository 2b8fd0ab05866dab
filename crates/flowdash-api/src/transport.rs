//! HTTP transport configuration shared by every upstream request.

use std::time::Duration;

use crate::error::Error;

/// TLS certificate verification policy for the upstream connection.
///
/// ntopng installs commonly run with self-signed certificates, so
/// verification can be switched off explicitly. There is no silent
/// fallback — the insecure mode must be requested by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsVerification {
    /// Verify against the system root store.
    #[default]
    SystemDefaults,
    /// Accept any certificate. Only for self-signed upstream installs.
    DangerAcceptInvalid,
}

/// Transport knobs applied to the shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request deadline. This is the only abort mechanism — there is
    /// no separate cancellation once a request is in flight.
    pub timeout: Duration,
    pub tls: TlsVerification,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(10_000),
            tls: TlsVerification::SystemDefaults,
        }
    }
}

impl TransportConfig {
    /// Build the `reqwest::Client` used for all upstream calls.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder().timeout(self.timeout);

        if self.tls == TlsVerification::DangerAcceptInvalid {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder.build().map_err(Error::ClientBuild)
    }
}
