//! Route table and request handlers.
//!
//! `/api/ntop/stats` is the only cached endpoint; the list endpoints
//! fetch fresh on every request, and the `raw/*` endpoints pass the
//! upstream payload through untouched for debugging field layouts.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use flowdash_api::NtopClient;
use flowdash_config::Config;
use flowdash_core::normalize::normalize_interface;
use flowdash_core::{DashboardError, SnapshotCache};

/// Shared state behind every handler.
pub struct AppState {
    pub cache: SnapshotCache<NtopClient>,
    pub config: Config,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(cache: SnapshotCache<NtopClient>, config: Config) -> Self {
        Self {
            cache,
            config,
            started_at: Instant::now(),
        }
    }

    fn client(&self) -> &NtopClient {
        self.cache.aggregator().api()
    }

    fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/ntop/stats", get(stats))
        .route("/api/ntop/toptalkers", get(top_talkers))
        .route("/api/ntop/flows", get(flows))
        .route("/api/ntop/applications", get(applications))
        .route("/api/ntop/raw/interface", get(raw_interface))
        .route("/api/ntop/raw/hosts", get(raw_hosts))
        .route("/api/health", get(health))
        .route("/api/config", get(config_view))
        .with_state(state)
}

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

/// 503 body for a list endpoint.
fn unavailable(err: &DashboardError) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}

// ── Handlers ────────────────────────────────────────────────────────

/// The cached dashboard snapshot.
async fn stats(State(state): State<Arc<AppState>>) -> Response {
    match state.cache.get().await {
        Ok(snapshot) => Json((*snapshot).clone()).into_response(),
        Err(err) => {
            warn!("dashboard snapshot unavailable: {err}");
            let body = json!({
                "error": "Cannot connect to ntopng",
                "message": err.to_string(),
                "ntop_url": state.client().base_url().as_str(),
                "ntop_interface": state.config.interface,
                "suggestion": "Check that ntopng is running and the NTOP_* settings point at it",
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}

/// Top hosts by traffic, fetched fresh.
async fn top_talkers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(10);
    match state.cache.aggregator().top_talkers(limit).await {
        Ok(talkers) => Json(talkers).into_response(),
        Err(err) => unavailable(&err),
    }
}

/// Active flows, fetched fresh.
async fn flows(State(state): State<Arc<AppState>>, Query(query): Query<LimitQuery>) -> Response {
    let limit = query.limit.unwrap_or(50);
    match state.cache.aggregator().top_flows(limit).await {
        Ok(flows) => Json(flows).into_response(),
        Err(err) => unavailable(&err),
    }
}

/// Ranked application breakdown, fetched fresh.
async fn applications(State(state): State<Arc<AppState>>) -> Response {
    match state.cache.aggregator().applications().await {
        Ok(apps) => Json(apps).into_response(),
        Err(err) => unavailable(&err),
    }
}

/// Upstream connectivity probe.
async fn health(State(state): State<Arc<AppState>>) -> Response {
    let timestamp = now_ms();
    match state.client().interface_data().await {
        Ok(payload) => {
            // A reachable upstream with an unreadable payload is still
            // degraded.
            match normalize_interface(&payload) {
                Ok(iface) => Json(json!({
                    "status": "ok",
                    "ntop_connected": true,
                    "ntop_url": state.client().base_url().as_str(),
                    "ntop_interface": state.config.interface,
                    "ntop_interface_name": iface.interface_name,
                    "ntop_hosts": iface.num_hosts,
                    "ntop_flows": iface.num_flows,
                    "uptime": state.uptime_secs(),
                    "timestamp": timestamp,
                }))
                .into_response(),
                Err(err) => degraded_health(&state, &err.to_string(), timestamp),
            }
        }
        Err(err) => degraded_health(&state, &err.to_string(), timestamp),
    }
}

fn degraded_health(state: &AppState, error: &str, timestamp: i64) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "status": "degraded",
            "ntop_connected": false,
            "ntop_url": state.client().base_url().as_str(),
            "ntop_interface": state.config.interface,
            "error": error,
            "uptime": state.uptime_secs(),
            "timestamp": timestamp,
        })),
    )
        .into_response()
}

/// Effective non-secret configuration.
#[allow(clippy::unused_async)]
async fn config_view(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(state.config.public_view())
}

/// Raw upstream interface payload, for inspecting field layouts.
async fn raw_interface(State(state): State<Arc<AppState>>) -> Response {
    match state.client().interface_data().await {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

/// Raw upstream hosts payload.
async fn raw_hosts(State(state): State<Arc<AppState>>) -> Response {
    match state.client().active_hosts(10).await {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
