/*
 * Responsibility
 * - GET /health (疎通用, API key 不要)
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let env = if state.app_env.is_production() {
        "production"
    } else {
        "development"
    };
    (StatusCode::OK, Json(json!({"status": "ok", "env": env})))
}
