//! Per-request access logging.
//!
//! Applied as the outermost app layer so that every request, including
//! ones rejected by the auth middleware and unmatched routes, yields exactly
//! one [`AccessLogEntry`]. The observer never changes the response.

use std::time::Instant;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use chrono::Utc;

use crate::services::access_log::{AccessLogEntry, AccessLogError};
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, observe))
}

async fn observe(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let started_at = Utc::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    tracing::debug!(%method, %path, "request started");

    let response = next.run(req).await;

    let entry = AccessLogEntry {
        started_at,
        method,
        path,
        status: response.status().as_u16(),
        duration: started.elapsed(),
        request_id,
    };

    // best-effort: a failing sink must not affect the client
    if let Err(err) = record(&state, entry).await {
        tracing::warn!(error = %err, "failed to write access log entry");
    }

    response
}

/// Blocking sinks (file) are written from the blocking pool; the entry is
/// still recorded before the response is returned.
async fn record(state: &AppState, entry: AccessLogEntry) -> Result<(), AccessLogError> {
    let sink = state.access_log.clone();
    if !sink.is_blocking() {
        return sink.record(&entry);
    }

    tokio::task::spawn_blocking(move || sink.record(&entry))
        .await
        .map_err(|err| AccessLogError::Io(std::io::Error::other(err)))?
}
