use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Status object with the service version and the active analysis mode.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let augmentation = if state.config.use_openai() {
        "openai"
    } else {
        "local"
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "auspex-api",
        "augmentation": augmentation,
    }))
}
