use axum::{Json, body::Bytes, extract::State};
use serde::Deserialize;
use tracing::debug;

use crate::server::{AppState, errors::AppError, responses::StartResponse};

#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub player_id: Option<String>,
}

/// `POST /api/start`. The body is optional; without a `player_id` a new one is assigned.
pub async fn start_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StartResponse>, AppError> {
    let request: StartRequest = if body.iter().all(u8::is_ascii_whitespace) {
        StartRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::InvalidRequest(format!("Invalid request body: {e}")))?
    };
    debug!(player_id = ?request.player_id, "Start requested");

    let start = state.game.start_game(request.player_id).await?;
    Ok(Json(start.into()))
}
