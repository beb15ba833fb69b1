//! Game controller: the operations behind the HTTP API.

mod errors;
#[cfg(test)]
mod tests;

pub use errors::GameError;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::problem;
use crate::session::{Countdown, SessionHandle, SessionSnapshot, SessionStore, Sweeper};

type Result<T> = std::result::Result<T, GameError>;

const MAX_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStart {
    pub player_id: String,
    pub problem: String,
    pub time_left: u32,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Wrong,
}

impl Feedback {
    pub fn as_str(self) -> &'static str {
        match self {
            Feedback::Correct => "correct",
            Feedback::Wrong => "wrong",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Continue {
        problem: String,
        time_left: u32,
        score: u32,
        feedback: Feedback,
    },
    GameOver {
        final_score: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStatus {
    pub active: bool,
    pub time_left: u32,
    pub score: u32,
    /// Only present while the run is active.
    pub current_problem: Option<String>,
    pub last_activity: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub player_id: String,
    pub top_score: u32,
    pub time_left: u32,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct DebugReport {
    pub timestamp: DateTime<Utc>,
    pub active_players: usize,
    pub total_players: usize,
    pub players: Vec<SessionSnapshot>,
}

/// Orchestrates sessions, countdowns and problems.
#[derive(Debug, Clone)]
pub struct GameService {
    store: SessionStore,
    config: Arc<GameConfig>,
}

impl GameService {
    pub fn new(store: SessionStore, config: GameConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    fn lookup(&self, player_id: &str) -> Result<SessionHandle> {
        if player_id.trim().is_empty() {
            return Err(GameError::InvalidRequest("player_id is required".into()));
        }
        self.store
            .get(player_id)
            .ok_or_else(|| GameError::NotFound(player_id.to_owned()))
    }

    /// Starts the idle sweeper for this service's store.
    pub fn spawn_sweeper(&self) -> Sweeper {
        Sweeper::spawn(
            self.store.clone(),
            self.config.sweep_interval(),
            self.config.idle_timeout(),
        )
    }

    fn generate_player_id(&self) -> Result<String> {
        for _ in 0..MAX_ATTEMPTS {
            let id = Uuid::new_v4().to_string();
            if !self.store.contains(&id) {
                return Ok(id);
            }
            debug!(player_id = %id, "Player ID collision detected");
        }
        error!("Failed to generate unique player ID after {MAX_ATTEMPTS} attempts");
        Err(GameError::Internal("failed to generate a unique player id".into()))
    }

    /// Starts a new run, creating the session on first use.
    ///
    /// A previous countdown is stopped, and waited for, before the new one
    /// is spawned. The top score absorbs the previous run's score.
    #[instrument(skip(self))]
    pub async fn start_game(&self, player_id: Option<String>) -> Result<GameStart> {
        let player_id = match player_id
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty())
        {
            Some(id) => id,
            None => self.generate_player_id()?,
        };

        for _ in 0..MAX_ATTEMPTS {
            let handle = self.store.get_or_create(&player_id);
            let mut session = handle.lock().await;
            if session.evicted {
                // Lost a race with the sweeper; resolve the id again
                continue;
            }

            if let Some(previous) = session.countdown.take() {
                previous.halt(self.store.stop_timeout()).await;
            }

            session.touch();
            session.top_score = session.top_score.max(session.score);
            session.score = 0;
            session.time_left = self.config.max_time;
            session.active = true;
            let problem = problem::generate();
            session.set_problem(&problem);
            session.countdown = Some(Countdown::spawn(
                handle.clone(),
                player_id.clone(),
                self.config.tick(),
            ));

            info!(player_id = %player_id, top_score = session.top_score, "Game started");
            return Ok(GameStart {
                player_id,
                problem: session.current_problem.clone(),
                time_left: session.time_left,
                score: session.score,
            });
        }

        error!(player_id = %player_id, "Session kept being evicted while starting a game");
        Err(GameError::Internal("could not acquire a live session".into()))
    }

    /// Scores the player's judgment of the current equation.
    #[instrument(skip(self))]
    pub async fn submit_answer(&self, player_id: &str, judgment: bool) -> Result<AnswerOutcome> {
        let handle = self.lookup(player_id)?;
        let mut session = handle.lock().await;
        if session.evicted {
            return Err(GameError::NotFound(player_id.to_owned()));
        }

        session.touch();
        if !session.active {
            return Ok(AnswerOutcome::GameOver {
                final_score: session.score,
            });
        }

        let feedback = if judgment == session.current_answer_is_correct {
            session.time_left = session
                .time_left
                .saturating_add(self.config.correct_bonus)
                .min(self.config.max_time);
            session.score += 1;
            session.top_score = session.top_score.max(session.score);
            Feedback::Correct
        } else {
            session.time_left = session.time_left.saturating_sub(self.config.wrong_penalty);
            Feedback::Wrong
        };

        if session.time_left == 0 {
            session.active = false;
            if let Some(countdown) = &session.countdown {
                countdown.request_stop();
            }
            info!(player_id = %player_id, score = session.score, "Game over, out of time");
            return Ok(AnswerOutcome::GameOver {
                final_score: session.score,
            });
        }

        let problem = problem::generate();
        session.set_problem(&problem);

        Ok(AnswerOutcome::Continue {
            problem: session.current_problem.clone(),
            time_left: session.time_left,
            score: session.score,
            feedback,
        })
    }

    pub async fn status(&self, player_id: &str) -> Result<PlayerStatus> {
        let handle = self.lookup(player_id)?;
        let mut session = handle.lock().await;
        if session.evicted {
            return Err(GameError::NotFound(player_id.to_owned()));
        }

        session.touch();
        let snapshot = session.snapshot();
        Ok(PlayerStatus {
            active: snapshot.active,
            time_left: snapshot.time_left,
            score: snapshot.score,
            current_problem: snapshot.current_problem,
            last_activity: snapshot.last_activity,
        })
    }

    /// All players ordered by top score, best first. Ties keep store order.
    pub async fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut players = self.store.list_all().await;
        players.sort_by(|a, b| b.top_score.cmp(&a.top_score));
        players
            .into_iter()
            .map(|p| LeaderboardEntry {
                player_id: p.player_id,
                top_score: p.top_score,
                time_left: p.time_left,
                active: p.active,
            })
            .collect()
    }

    pub async fn debug_report(&self) -> DebugReport {
        let players = self.store.list_all().await;
        DebugReport {
            timestamp: Utc::now(),
            active_players: players.iter().filter(|p| p.active).count(),
            total_players: players.len(),
            players,
        }
    }

    /// Runs one idle sweep with the configured threshold.
    pub async fn sweep_idle(&self) -> usize {
        self.store
            .sweep_inactive(self.config.idle_timeout(), Instant::now())
            .await
    }
}
