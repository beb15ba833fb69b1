mod countdown;
mod store;
mod sweeper;

pub use countdown::Countdown;
pub use store::{SessionHandle, SessionStore};
pub use sweeper::Sweeper;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;

use crate::problem::Problem;

/// Per-player game state.
///
/// Always accessed through the mutex of its [`SessionHandle`]; the countdown
/// task and request handlers share it.
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub score: u32,
    /// Best score over every run of this session.
    pub top_score: u32,
    pub time_left: u32,
    pub active: bool,
    pub current_problem: String,
    pub current_answer_is_correct: bool,
    /// Monotonic, drives idle eviction.
    pub last_activity: Instant,
    /// Wall-clock twin of `last_activity`, for reporting.
    pub last_seen: DateTime<Utc>,
    pub(crate) countdown: Option<Countdown>,
    pub(crate) evicted: bool,
}

/// Outcome of a single countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running,
    Expired,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            score: 0,
            top_score: 0,
            time_left: 0,
            active: false,
            current_problem: String::new(),
            current_answer_is_correct: false,
            last_activity: Instant::now(),
            last_seen: Utc::now(),
            countdown: None,
            evicted: false,
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
        self.last_seen = Utc::now();
    }

    pub fn is_idle(&self, threshold: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.last_activity) > threshold
    }

    pub fn set_problem(&mut self, problem: &Problem) {
        self.current_problem = problem.text();
        self.current_answer_is_correct = problem.is_correct;
    }

    /// Whether the countdown attached to this session was asked to stop.
    pub fn stop_requested(&self) -> bool {
        self.countdown
            .as_ref()
            .is_some_and(Countdown::is_stop_requested)
    }

    /// Whether a countdown task is attached and still running.
    pub fn has_running_countdown(&self) -> bool {
        self.countdown.as_ref().is_some_and(|c| !c.is_finished())
    }

    /// Removes one second from the clock and ends the run when it hits zero.
    pub fn tick(&mut self) -> Tick {
        self.time_left = self.time_left.saturating_sub(1);
        self.touch();
        if self.time_left == 0 {
            self.active = false;
            Tick::Expired
        } else {
            Tick::Running
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            player_id: self.id.clone(),
            score: self.score,
            top_score: self.top_score,
            time_left: self.time_left,
            active: self.active,
            current_problem: self.active.then(|| self.current_problem.clone()),
            last_activity: self.last_seen,
        }
    }
}

/// Point-in-time copy of a session, safe to hand out without the lock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub player_id: String,
    pub score: u32,
    pub top_score: u32,
    pub time_left: u32,
    pub active: bool,
    pub current_problem: Option<String>,
    pub last_activity: DateTime<Utc>,
}
