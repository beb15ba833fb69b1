use axum::{Json, extract::State};

use crate::server::{AppState, responses::DebugResponse};

/// `GET /api/debug`: every session plus counts.
pub async fn debug_handler(State(state): State<AppState>) -> Json<DebugResponse> {
    Json(state.game.debug_report().await.into())
}
