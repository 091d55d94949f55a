use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::server::handlers::{conversations, health, messages};
use crate::state::AppState;

/// Creates the application router.
///
/// - `GET /health`
/// - `POST /api/messages` answers one inbound message
/// - `GET|DELETE /api/conversations/:user_id` reads or clears a user's memory
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/messages", post(messages::post_message))
        .route(
            "/api/conversations/:user_id",
            get(conversations::get_conversation)
                .delete(conversations::delete_conversation),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
