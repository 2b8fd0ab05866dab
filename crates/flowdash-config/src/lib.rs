//! Configuration loading for the flowdash service.
//!
//! Layered via figment: built-in defaults, then an optional
//! `flowdash.toml` in the working directory, then `NTOP_*` environment
//! variables (plus bare `PORT` for the listen port). Later layers win.
//!
//! The upstream password is a [`SecretString`] from the moment it is
//! read; nothing in this crate can serialize it back out.

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use flowdash_api::{NtopClient, TlsVerification, TransportConfig};

/// Config file looked up in the working directory.
const CONFIG_FILE: &str = "flowdash.toml";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("upstream client setup failed: {0}")]
    Client(#[from] flowdash_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// Effective service configuration after all layers are merged.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// ntopng host or address.
    pub host: String,
    /// ntopng HTTP port.
    pub port: u16,
    /// `http` or `https`.
    pub protocol: String,
    pub user: String,
    pub pass: SecretString,
    /// Monitored interface selector (ntopng `ifid`).
    pub interface: i64,
    /// Upstream request timeout in milliseconds.
    pub timeout: u64,
    /// Verify the upstream TLS certificate. Off for self-signed installs.
    pub reject_unauthorized: bool,
    /// Port this service listens on.
    pub listen_port: u16,
    /// Dashboard snapshot time-to-live in milliseconds.
    pub cache_ttl_ms: u64,
}

/// Built-in defaults, serialized into the bottom figment layer.
///
/// Mirrors [`Config`] with a plain-string password so it can be a
/// `Serialized` provider; the merged result is only ever extracted into
/// [`Config`], where the password becomes secret.
#[derive(Debug, Serialize)]
struct ConfigDefaults {
    host: &'static str,
    port: u16,
    protocol: &'static str,
    user: &'static str,
    pass: &'static str,
    interface: i64,
    timeout: u64,
    reject_unauthorized: bool,
    listen_port: u16,
    cache_ttl_ms: u64,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            host: "127.0.0.1",
            port: 3000,
            protocol: "http",
            user: "admin",
            pass: "admin",
            interface: 0,
            timeout: 10_000,
            reject_unauthorized: true,
            listen_port: 3001,
            cache_ttl_ms: 2000,
        }
    }
}

impl Config {
    /// Load configuration from defaults, `flowdash.toml`, and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(ConfigDefaults::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("NTOP_"))
            // Bare PORT (the conventional deploy knob) selects where this
            // service listens, not where ntopng lives.
            .merge(Env::raw().only(&["PORT"]).map(|_| "listen_port".into()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.protocol != "http" && self.protocol != "https" {
            return Err(ConfigError::Validation {
                field: "protocol".into(),
                reason: format!("expected 'http' or 'https', got '{}'", self.protocol),
            });
        }
        Ok(())
    }

    /// The upstream base URL, `{protocol}://{host}:{port}`.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let rendered = format!("{}://{}:{}", self.protocol, self.host, self.port);
        rendered.parse().map_err(|_| ConfigError::Validation {
            field: "host".into(),
            reason: format!("invalid upstream URL: {rendered}"),
        })
    }

    /// Transport settings for the upstream client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_millis(self.timeout),
            tls: if self.reject_unauthorized {
                TlsVerification::SystemDefaults
            } else {
                TlsVerification::DangerAcceptInvalid
            },
        }
    }

    /// Build the authenticated upstream client described by this config.
    pub fn client(&self) -> Result<NtopClient, ConfigError> {
        let client = NtopClient::new(
            self.base_url()?,
            self.interface,
            self.user.clone(),
            self.pass.clone(),
            &self.transport(),
        )?;
        Ok(client)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// The non-secret view served by `/api/config`.
    ///
    /// Credentials are deliberately absent; `pass` cannot be serialized
    /// at all.
    pub fn public_view(&self) -> serde_json::Value {
        serde_json::json!({
            "ntop_host": self.host,
            "ntop_port": self.port,
            "ntop_protocol": self.protocol,
            "ntop_interface": self.interface,
            "cache_ttl_ms": self.cache_ttl_ms,
            "data_source": "ntop_live_only",
            "version": env!("CARGO_PKG_VERSION"),
        })
    }
}
