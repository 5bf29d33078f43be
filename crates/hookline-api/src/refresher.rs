//! Background lease refresher.
//!
//! Every tick, subscriptions whose lease ends within the refresh window are
//! renewed. A subscription the upstream no longer knows is recreated at the
//! same endpoint. Other failures are logged and retried on the next tick.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::time::{self, Duration};
use tracing::{debug, error, info};

use hookline_protocols::types::now_timestamp;

use crate::lifecycle;
use crate::state::AppState;

/// Outcome of one refresh pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub refreshed: usize,
    pub failed: usize,
}

/// Periodically renews subscription leases.
pub struct LeaseRefresher {
    state: Arc<AppState>,
    check_interval: Duration,
    refresh_before: Duration,
}

impl LeaseRefresher {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            check_interval: Duration::from_secs(60),
            refresh_before: Duration::from_secs(3600),
        }
    }

    /// Set the check interval.
    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// Set how long before expiry a lease is renewed.
    pub fn with_refresh_before(mut self, window: Duration) -> Self {
        self.refresh_before = window;
        self
    }

    /// Start the refresh loop. Runs until `shutdown` changes.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        info!(
            check_interval = ?self.check_interval,
            refresh_before = ?self.refresh_before,
            "Lease refresher started"
        );

        let mut interval = time::interval(self.check_interval);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let summary = self.check_leases().await;
                    if summary.failed > 0 {
                        error!(failed = summary.failed, "Lease refresh pass had failures");
                    }
                }
                _ = shutdown.changed() => {
                    info!("Lease refresher shutting down");
                    break;
                }
            }
        }
    }

    /// Refresh every subscription that is due.
    pub async fn check_leases(&self) -> RefreshSummary {
        let window = self.refresh_before.as_secs() as i64;
        let due = self.state.store.due_for_refresh(now_timestamp(), window);
        if due.is_empty() {
            debug!("No leases due for refresh");
            return RefreshSummary::default();
        }

        let results = join_all(
            due.iter()
                .map(|stored| lifecycle::refresh_or_recreate(&self.state, &stored.id)),
        )
        .await;

        let mut summary = RefreshSummary::default();
        for (stored, result) in due.iter().zip(results) {
            match result {
                Ok(updated) => {
                    summary.refreshed += 1;
                    info!(
                        subscription_id = %stored.id,
                        expires_at = updated.subscription.expires_at,
                        "Lease refreshed"
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(subscription_id = %stored.id, error = %e, "Lease refresh failed");
                }
            }
        }
        summary
    }
}

#[cfg(test)]
#[path = "refresher_tests.rs"]
mod tests;
