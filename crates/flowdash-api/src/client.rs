//! ntopng REST v2 HTTP client.
//!
//! Wraps `reqwest::Client` with ntopng-specific query construction,
//! envelope unwrapping, and error mapping. Every request automatically
//! carries the configured interface selector (`ifid`); caller-supplied
//! parameters win on key collision.

use std::collections::BTreeMap;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

// REST v2 endpoint paths (Lua scripts, hence the extension).
const INTERFACE_DATA: &str = "/lua/rest/v2/get/interface/data.lua";
const ACTIVE_HOSTS: &str = "/lua/rest/v2/get/host/active.lua";
const ACTIVE_FLOWS: &str = "/lua/rest/v2/get/flow/active.lua";
const L7_STATS: &str = "/lua/rest/v2/get/interface/l7/stats.lua";

/// Longest body fragment carried into an error, in characters.
const BODY_PREVIEW_CHARS: usize = 200;

/// Truncate an upstream body for inclusion in an error message.
///
/// Cuts on a character boundary: ntopng error pages are HTML and may
/// contain multi-byte text, so a byte-offset slice could split a
/// character and panic.
fn body_preview(body: &str) -> &str {
    match body.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// The `{ rc, rc_str, rsp }` wrapper every REST v2 response arrives in.
///
/// `rc == 0` means success. Older builds put the human-readable message
/// under `rc_str_hr` instead of `rc_str`.
#[derive(serde::Deserialize)]
struct Envelope {
    rc: Option<i64>,
    #[serde(default)]
    rc_str: Option<String>,
    #[serde(default)]
    rc_str_hr: Option<String>,
    #[serde(default)]
    rsp: Option<Value>,
}

/// Authenticated client for one ntopng instance and one monitored interface.
///
/// Payloads come back as `serde_json::Value`: the response layout differs
/// between ntopng versions, and normalizing it is the caller's concern.
pub struct NtopClient {
    http: reqwest::Client,
    base_url: Url,
    ifid: i64,
    username: String,
    password: SecretString,
}

impl NtopClient {
    /// Create a client from connection settings and a transport config.
    pub fn new(
        base_url: Url,
        ifid: i64,
        username: impl Into<String>,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            ifid,
            username: username.into(),
            password,
        })
    }

    /// Wrap a pre-built `reqwest::Client` (used by tests).
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        ifid: i64,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            ifid,
            username: username.into(),
            password,
        }
    }

    /// The upstream base URL (for diagnostics and error bodies).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The configured interface selector.
    pub fn ifid(&self) -> i64 {
        self.ifid
    }

    /// Issue an authenticated GET and unwrap the REST v2 envelope.
    ///
    /// The configured `ifid` is merged with `params`; caller parameters
    /// take precedence on collision. Returns the `rsp` payload, or the
    /// whole body when the response arrives unwrapped (older builds skip
    /// the envelope on some endpoints).
    pub async fn request(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, Error> {
        let mut query: BTreeMap<&str, String> = BTreeMap::new();
        query.insert("ifid", self.ifid.to_string());
        for (key, value) in params {
            query.insert(key, value.clone());
        }

        let url = self.url(endpoint);
        debug!("GET {url} params={query:?}");

        let resp = self
            .http
            .get(url.clone())
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::Unreachable {
                url: self.base_url.to_string(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Unreachable {
            url: self.base_url.to_string(),
            message: format!("response body read failed: {e}"),
        })?;

        if !status.is_success() {
            debug!("ntopng returned HTTP {status} for {endpoint}");
            return Err(Error::Protocol {
                status: status.as_u16(),
                body: body_preview(&body).to_owned(),
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            let snippet = body_preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {snippet:?})"),
            }
        })?;

        Self::unwrap_envelope(value)
    }

    /// Check the envelope's `rc` code and strip the wrapper.
    fn unwrap_envelope(value: Value) -> Result<Value, Error> {
        // Responses are not guaranteed to carry the envelope; anything
        // without a recognizable `rc` field is passed through untouched.
        if let Ok(envelope) = serde_json::from_value::<Envelope>(value.clone()) {
            if let Some(rc) = envelope.rc {
                if rc != 0 {
                    let message = envelope
                        .rc_str
                        .or(envelope.rc_str_hr)
                        .unwrap_or_else(|| "Unknown error".into());
                    return Err(Error::Api { rc, message });
                }
                if let Some(rsp) = envelope.rsp {
                    return Ok(rsp);
                }
            }
        }
        Ok(value)
    }

    fn url(&self, endpoint: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}{endpoint}");
        Url::parse(&full).unwrap_or_else(|_| self.base_url.clone())
    }

    // ── Resource endpoints ───────────────────────────────────────────

    /// Interface summary: throughput, counters, host/flow counts.
    pub async fn interface_data(&self) -> Result<Value, Error> {
        self.request(INTERFACE_DATA, &[]).await
    }

    /// Active hosts sorted by total traffic, one page of `per_page`.
    pub async fn active_hosts(&self, per_page: u32) -> Result<Value, Error> {
        self.request(ACTIVE_HOSTS, &Self::page_params(per_page))
            .await
    }

    /// Active flows sorted by total traffic, one page of `per_page`.
    pub async fn active_flows(&self, per_page: u32) -> Result<Value, Error> {
        self.request(ACTIVE_FLOWS, &Self::page_params(per_page))
            .await
    }

    /// Per-application (nDPI layer-7) traffic breakdown.
    pub async fn l7_stats(&self) -> Result<Value, Error> {
        self.request(L7_STATS, &[]).await
    }

    fn page_params(per_page: u32) -> [(&'static str, String); 4] {
        [
            ("currentPage", "1".into()),
            ("perPage", per_page.to_string()),
            ("sortColumn", "bytes".into()),
            ("sortOrder", "desc".into()),
        ]
    }
}
