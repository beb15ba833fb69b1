use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::server::{AppState, errors::AppError, responses::StatusResponse};

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub player_id: Option<String>,
}

/// `GET /api/status?player_id=...`
pub async fn status_handler(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, AppError> {
    let player_id = query.player_id.unwrap_or_default();
    let status = state.game.status(&player_id).await?;
    Ok(Json(status.into()))
}
