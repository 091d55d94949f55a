use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    let turns = state.orchestrator.memory().history(&user_id).await;
    Json(json!({
        "user_id": user_id,
        "turns": turns,
    }))
}

pub async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    let cleared = state.orchestrator.memory().clear(&user_id).await;
    Json(json!({
        "user_id": user_id,
        "cleared": cleared,
    }))
}
