use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::info;

use super::{Session, SessionSnapshot};

pub(crate) const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Shared, lockable session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// In-memory session store.
///
/// Sessions live behind their own async mutex; that mutex is the critical
/// section for every read or write of session fields. No map guard is held
/// across an `.await`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, SessionHandle>>,
    stop_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            stop_timeout: DEFAULT_STOP_TIMEOUT,
        }
    }

    /// Configures how long eviction waits for a countdown to stop.
    pub fn with_stop_timeout(mut self, stop_timeout: Duration) -> Self {
        self.stop_timeout = stop_timeout;
        self
    }

    pub fn stop_timeout(&self) -> Duration {
        self.stop_timeout
    }

    /// Returns the session for `id`, inserting a fresh one if absent.
    pub fn get_or_create(&self, id: &str) -> SessionHandle {
        self.sessions
            .entry(id.to_owned())
            .or_insert_with(|| {
                info!(player_id = %id, "New player created");
                Arc::new(Mutex::new(Session::new(id)))
            })
            .clone()
    }

    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Removes a session. The caller must have halted its countdown.
    pub fn delete(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn handles(&self) -> Vec<(String, SessionHandle)> {
        self.sessions
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Snapshots every session, each one taken under its own lock.
    pub async fn list_all(&self) -> Vec<SessionSnapshot> {
        let mut snapshots = Vec::with_capacity(self.sessions.len());
        for (_, handle) in self.handles() {
            snapshots.push(handle.lock().await.snapshot());
        }
        snapshots
    }

    /// Evicts sessions idle for longer than `threshold` as of `now`.
    ///
    /// Each victim's countdown is halted before the session leaves the map.
    /// Returns the number of evicted sessions.
    pub async fn sweep_inactive(&self, threshold: Duration, now: Instant) -> usize {
        let mut removed = 0;
        for (id, handle) in self.handles() {
            let mut session = handle.lock().await;
            if session.evicted || !session.is_idle(threshold, now) {
                continue;
            }
            if let Some(countdown) = session.countdown.take() {
                countdown.halt(self.stop_timeout).await;
            }
            session.active = false;
            session.evicted = true;
            if self
                .sessions
                .remove_if(&id, |_, current| Arc::ptr_eq(current, &handle))
                .is_some()
            {
                info!(player_id = %id, "Cleaned up inactive player");
                removed += 1;
            }
        }
        removed
    }
}
