// Config persistence endpoint: the save contract and the read-back path.

use axum::extract::State;
use axum::http::StatusCode;
use launchpad::config::Settings;
use launchpad::rest::{routes, AppState};
use std::sync::Arc;
use std::time::Instant;
use tempfile::TempDir;

fn make_state(dir: &TempDir) -> Arc<AppState> {
    let data_dir = dir.path().to_path_buf();
    let settings = Settings::new(
        Some(data_dir.join("startpage.json")),
        Some(data_dir),
        None,
        None,
        Some("error".to_string()),
    );
    Arc::new(AppState {
        settings: Arc::new(settings),
        started_at: Instant::now(),
    })
}

// ─── Save contract ────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_payload_is_rejected() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir);

    let (status, body) = routes::save_config(State(state), "   ".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.0["ok"], false);
    assert_eq!(body.0["error"], "empty payload");
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir);

    let (status, body) = routes::save_config(State(state.clone()), "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.0["error"], "invalid json");

    // Valid JSON that is not an object is rejected the same way.
    let (status, body) = routes::save_config(State(state), "[1,2,3]".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.0["error"], "invalid json");
}

#[tokio::test]
async fn save_overwrites_file_and_reports_bytes() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir);

    let payload = r#"{"username":"pix","tabs":[]}"#;
    let (status, body) = routes::save_config(State(state.clone()), payload.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.0["ok"], true);

    let written = std::fs::read_to_string(&state.settings.page_path).unwrap();
    assert_eq!(body.0["bytes"].as_u64(), Some(written.len() as u64));
    // Pretty-printed on disk.
    assert!(written.contains("\n"));
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&written).unwrap()["username"],
        "pix"
    );
}

#[tokio::test]
async fn save_then_get_round_trips() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir);

    let payload = serde_json::json!({
        "username": "pix",
        "tabs": [{"name": "dev", "categories": []}]
    });
    let (status, _) = routes::save_config(State(state.clone()), payload.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let body = routes::get_config(State(state)).await.unwrap();
    assert_eq!(body.0, payload);
}

#[tokio::test]
async fn get_without_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir);

    let err = routes::get_config(State(state)).await.unwrap_err();
    assert_eq!(err.0, StatusCode::NOT_FOUND);
}

// ─── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_version() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir);

    let body = routes::health(State(state)).await;
    assert_eq!(body.0["status"], "ok");
    assert_eq!(body.0["version"], env!("CARGO_PKG_VERSION"));
}
