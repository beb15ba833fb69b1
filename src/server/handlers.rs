pub mod answer;
pub mod debug;
pub mod health;
pub mod leaderboard;
pub mod start;
pub mod status;

use axum::{Json, http::StatusCode, response::IntoResponse};

use crate::server::responses::ErrorResponse;

/// Fallback for unknown API routes.
pub async fn endpoint_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Endpoint not found")),
    )
}
