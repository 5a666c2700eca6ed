//! Quote server route handlers.
//!
//! All `/api` endpoints return JSON. State is shared via `Arc<ServerState>`.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::store::QuoteStore;

/// What `/` renders while no quote has ever been cached.
const PLACEHOLDER: &str = "Loading…";

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

pub struct ServerState {
    pub store: Arc<QuoteStore>,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(store: Arc<QuoteStore>) -> Self {
        Self {
            store,
            started_at: Utc::now(),
        }
    }
}

pub type AppState = Arc<ServerState>;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub text: String,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub cycles_started: u64,
    pub quotes_updated: u64,
    pub fetch_failures: u64,
    pub no_match_cycles: u64,
    pub skipped_in_flight: u64,
    pub has_quote: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub uptime_secs: i64,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// `GET /` — the current quote as plain text, placeholder when absent.
pub async fn index(State(state): State<AppState>) -> String {
    match state.store.current_quote() {
        Some(quote) => quote.text,
        None => PLACEHOLDER.to_string(),
    }
}

/// `GET /api/quote` — the current quote, or JSON `null` before the first
/// successful cycle. Absence is a normal outcome, not an HTTP error.
pub async fn get_quote(State(state): State<AppState>) -> Json<Option<QuoteResponse>> {
    let response = state.store.current_quote().map(|quote| QuoteResponse {
        text: quote.text,
        last_updated: state.store.last_updated(),
    });
    Json(response)
}

/// `GET /api/status` — refresh-loop counters and uptime.
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let stats = state.store.stats();
    Json(StatusResponse {
        cycles_started: stats.cycles_started,
        quotes_updated: stats.quotes_updated,
        fetch_failures: stats.fetch_failures,
        no_match_cycles: stats.no_match_cycles,
        skipped_in_flight: stats.skipped_in_flight,
        has_quote: state.store.current_quote().is_some(),
        last_updated: stats.last_updated,
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
    })
}

/// `GET /health` — liveness probe.
pub async fn health() -> &'static str {
    "ok"
}
