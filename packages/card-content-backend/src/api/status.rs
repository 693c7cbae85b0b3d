use axum::{extract::State, response::Json};

use crate::state::AppState;

/// GET /status -- health check.
pub async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "port": state.port,
        "version": state.content.version(),
        "dataFile": state.content.path().display().to_string(),
    }))
}
