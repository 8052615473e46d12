pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resume/predict", post(handlers::handle_predict))
        .route("/api/v1/resume/profile", post(handlers::handle_profile))
        .route("/api/v1/resume/history", get(handlers::handle_history))
        .route("/api/v1/resume/result/:id", get(handlers::handle_result))
        .with_state(state)
}
