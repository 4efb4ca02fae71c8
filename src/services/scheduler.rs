use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use crate::services::session::SessionStore;

/// Periodically drops expired sessions from the store.
pub struct SessionReaper {
    sessions: SessionStore,
    interval: Duration,
}

impl SessionReaper {
    pub fn new(sessions: SessionStore, interval_secs: u64) -> Self {
        Self {
            sessions,
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// Runs until the task is aborted.
    pub async fn start(self) {
        info!("Starting session reaper (interval: {:?})", self.interval);

        loop {
            tokio::time::sleep(self.interval).await;
            self.run_once().await;
        }
    }

    pub async fn run_once(&self) -> usize {
        let purged = self.sessions.purge_expired(Utc::now()).await;
        if purged > 0 {
            info!("Purged {} expired sessions", purged);
        } else {
            debug!("No expired sessions");
        }
        purged
    }
}
