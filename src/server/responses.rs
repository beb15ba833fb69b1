//! JSON bodies returned by the API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::game::{AnswerOutcome, DebugReport, GameStart, LeaderboardEntry, PlayerStatus};
use crate::session::SessionSnapshot;

const SUCCESS: &str = "success";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub status: &'static str,
    pub player_id: String,
    pub problem: String,
    pub time_left: u32,
    pub score: u32,
    pub game_active: bool,
}

impl From<GameStart> for StartResponse {
    fn from(start: GameStart) -> Self {
        Self {
            status: SUCCESS,
            player_id: start.player_id,
            problem: start.problem,
            time_left: start.time_left,
            score: start.score,
            game_active: true,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnswerResponse {
    Continue {
        problem: String,
        time_left: u32,
        score: u32,
        feedback: &'static str,
        game_active: bool,
    },
    GameOver {
        final_score: u32,
    },
}

impl From<AnswerOutcome> for AnswerResponse {
    fn from(outcome: AnswerOutcome) -> Self {
        match outcome {
            AnswerOutcome::Continue {
                problem,
                time_left,
                score,
                feedback,
            } => AnswerResponse::Continue {
                problem,
                time_left,
                score,
                feedback: feedback.as_str(),
                game_active: true,
            },
            AnswerOutcome::GameOver { final_score } => AnswerResponse::GameOver { final_score },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub game_active: bool,
    pub time_left: u32,
    pub score: u32,
    pub current_problem: Option<String>,
    pub last_activity: DateTime<Utc>,
}

impl From<PlayerStatus> for StatusResponse {
    fn from(status: PlayerStatus) -> Self {
        Self {
            status: SUCCESS,
            game_active: status.active,
            time_left: status.time_left,
            score: status.score,
            current_problem: status.current_problem,
            last_activity: status.last_activity,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeaderboardPlayer {
    pub player_id: String,
    /// Best score of the player.
    pub score: u32,
    pub time_left: u32,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub status: &'static str,
    pub players: Vec<LeaderboardPlayer>,
}

impl From<Vec<LeaderboardEntry>> for LeaderboardResponse {
    fn from(entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            status: SUCCESS,
            players: entries
                .into_iter()
                .map(|e| LeaderboardPlayer {
                    player_id: e.player_id,
                    score: e.top_score,
                    time_left: e.time_left,
                    active: e.active,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DebugResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub active_players: usize,
    pub total_players: usize,
    pub players: Vec<SessionSnapshot>,
}

impl From<DebugReport> for DebugResponse {
    fn from(report: DebugReport) -> Self {
        Self {
            status: SUCCESS,
            timestamp: report.timestamp,
            active_players: report.active_players,
            total_players: report.total_players,
            players: report.players,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub players: usize,
    /// Seconds since the server started.
    pub uptime: f64,
}
