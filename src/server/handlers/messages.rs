use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub user_id: String,
    pub text: String,
}

pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = payload.user_id.trim();
    if user_id.is_empty() {
        return Err(ApiError::BadRequest("user_id is required".to_string()));
    }
    if payload.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text is required".to_string()));
    }

    let reply = state
        .orchestrator
        .handle_message(user_id, &payload.text)
        .await;
    Ok(Json(json!({
        "reply": reply.text,
        "report": reply.report,
    })))
}
