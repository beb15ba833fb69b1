use axum::{Json, extract::State, response::IntoResponse};

use crate::server::{AppState, responses::HealthResponse};

pub async fn health_check() -> impl IntoResponse {
    "healthy"
}

/// `GET /api/health`: player count and uptime.
pub async fn api_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        players: state.game.store().len(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}
