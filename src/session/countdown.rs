use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{SessionHandle, Tick};

/// A running per-session countdown.
///
/// The task wakes once per `period`, takes the session lock and removes one
/// second from the clock. It exits when the clock reaches zero, when the
/// session is no longer active, or when a stop is requested. Stopping is
/// cooperative: the task watches the token both while sleeping and while
/// waiting for the lock, so the session lock may be held while calling
/// [`Countdown::halt`].
#[derive(Debug)]
pub struct Countdown {
    stop: CancellationToken,
    handle: JoinHandle<()>,
}

impl Countdown {
    pub fn spawn(session: SessionHandle, player_id: String, period: Duration) -> Self {
        let stop = CancellationToken::new();
        let handle = tokio::spawn(run(session, player_id, period, stop.clone()));
        Self { stop, handle }
    }

    pub fn request_stop(&self) {
        self.stop.cancel();
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Requests a stop and waits up to `limit` for the task to exit.
    ///
    /// A task that overruns the limit is aborted.
    pub async fn halt(self, limit: Duration) {
        self.stop.cancel();
        let abort = self.handle.abort_handle();
        match tokio::time::timeout(limit, self.handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.is_cancelled() => {}
            Ok(Err(e)) => error!(error = %e, "Countdown task failed"),
            Err(_) => {
                warn!(?limit, "Countdown did not stop in time, aborting");
                abort.abort();
            }
        }
    }
}

async fn run(session: SessionHandle, player_id: String, period: Duration, stop: CancellationToken) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            _ = interval.tick() => {}
        }

        let mut session = tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            guard = session.lock() => guard,
        };

        if stop.is_cancelled() || !session.active {
            break;
        }

        if session.tick() == Tick::Expired {
            info!(player_id = %player_id, score = session.score, "Game over, time expired");
            break;
        }
    }

    debug!(player_id = %player_id, "Countdown stopped");
}
