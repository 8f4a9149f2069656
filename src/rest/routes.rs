// rest/routes.rs — Handlers for the config persistence endpoint.
//
// The save contract mirrors the original one-shot script: empty body → 400
// "empty payload", unparsable or non-object body → 400 "invalid json",
// write failure → 500 "write failed", success → {ok, bytes}.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use crate::rest::AppState;
use crate::storage;

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let uptime = state.started_at.elapsed().as_secs();
    Json(json!({
        "status": "ok",
        "uptime_secs": uptime,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn get_config(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let path = &state.settings.page_path;
    let contents = std::fs::read_to_string(path).map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "config not found" })),
        )
    })?;

    serde_json::from_str::<Value>(&contents).map(Json).map_err(|e| {
        warn!(path = %path.display(), err = %e, "page config on disk is not valid JSON");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "config unreadable" })),
        )
    })
}

pub async fn save_config(
    State(state): State<Arc<AppState>>,
    body: String,
) -> (StatusCode, Json<Value>) {
    if body.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "ok": false, "error": "empty payload" })),
        );
    }

    let parsed = serde_json::from_str::<Value>(&body);
    let value = match parsed {
        Ok(value) if value.is_object() => value,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "ok": false, "error": "invalid json" })),
            );
        }
    };

    match storage::write_page_value(&state.settings.page_path, &value) {
        Ok(bytes) => (StatusCode::OK, Json(json!({ "ok": true, "bytes": bytes }))),
        Err(e) => {
            warn!(err = %e, "page config write failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": "write failed" })),
            )
        }
    }
}
