use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::game::GameError;
use crate::server::responses::ErrorResponse;

pub(crate) const PLAYER_NOT_FOUND: &str = "Player not found";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// Logs the failure and hides its detail from the client.
    pub fn internal<E: fmt::Debug>(e: E) -> Self {
        tracing::error!("Service failure: {e:?}");
        AppError::Internal
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GameError> for AppError {
    fn from(error: GameError) -> Self {
        match error {
            GameError::NotFound(_) => AppError::NotFound(PLAYER_NOT_FOUND.into()),
            GameError::InvalidRequest(message) => AppError::InvalidRequest(message),
            e @ GameError::Internal(_) => AppError::internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
