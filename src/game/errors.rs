/// Errors surfaced by game operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Player not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("The game service has encountered an unexpected internal state: {0}")]
    Internal(String),
}
