use axum::{Json, body::Bytes, extract::State};
use serde::Deserialize;

use crate::game::GameError;
use crate::server::{AppState, errors::AppError, responses::AnswerResponse};

const MISSING_FIELDS: &str = "player_id and answer are required";
const UNKNOWN_PLAYER: &str = "Player not found. Start a new game.";

#[derive(Debug, Default, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub player_id: Option<String>,
    /// The player's judgment of whether the shown equation is true.
    #[serde(default)]
    pub answer: Option<bool>,
}

/// `POST /api/answer`
pub async fn answer_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnswerResponse>, AppError> {
    let request: AnswerRequest = serde_json::from_slice(&body)
        .map_err(|_| AppError::InvalidRequest(MISSING_FIELDS.into()))?;

    let (Some(player_id), Some(answer)) = (
        request.player_id.filter(|id| !id.is_empty()),
        request.answer,
    ) else {
        return Err(AppError::InvalidRequest(MISSING_FIELDS.into()));
    };

    let outcome = state
        .game
        .submit_answer(&player_id, answer)
        .await
        .map_err(|e| match e {
            GameError::NotFound(_) => AppError::NotFound(UNKNOWN_PLAYER.into()),
            e => e.into(),
        })?;

    Ok(Json(outcome.into()))
}
