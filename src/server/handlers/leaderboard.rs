use axum::{Json, extract::State};

use crate::server::{AppState, responses::LeaderboardResponse};

/// `GET /api/leaderboard`
pub async fn leaderboard_handler(State(state): State<AppState>) -> Json<LeaderboardResponse> {
    Json(state.game.leaderboard().await.into())
}
