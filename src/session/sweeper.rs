use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::SessionStore;

/// Background task evicting idle sessions on a fixed period.
#[derive(Debug)]
pub struct Sweeper {
    stop: CancellationToken,
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Starts sweeping `store` every `period`, evicting sessions idle for
    /// longer than `idle_timeout`. The first sweep runs one period from now.
    pub fn spawn(store: SessionStore, period: Duration, idle_timeout: Duration) -> Self {
        info!(
            period_secs = period.as_secs(),
            idle_timeout_secs = idle_timeout.as_secs(),
            "Starting idle session sweeper"
        );

        let stop = CancellationToken::new();
        let token = stop.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            // The first tick completes immediately
            interval.tick().await;

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }

                debug!("Running idle session sweep");
                let removed = store.sweep_inactive(idle_timeout, Instant::now()).await;
                if removed > 0 {
                    info!(removed, remaining = store.len(), "Idle session sweep finished");
                }
            }
        });

        Self { stop, handle }
    }

    /// Stops the sweeper and waits for it to exit.
    pub async fn shutdown(self) {
        self.stop.cancel();
        let _ = self.handle.await;
    }
}
