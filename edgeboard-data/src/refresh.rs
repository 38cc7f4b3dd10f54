//! Periodic widget refresh.

use crate::widget::{RefreshOutcome, WidgetState};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

/// Shortest period accepted by [`AutoRefresh::spawn`].
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a background task refreshing one widget on a fixed period.
///
/// Each refresh is awaited before the next tick is taken, so the task never
/// overlaps itself. Ticks missed while a slow refresh is in flight are
/// skipped rather than replayed in a burst.
///
/// The task stops on [`AutoRefresh::stop`] or when the handle is dropped.
#[derive(Debug)]
pub struct AutoRefresh {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<u64>>,
}

impl AutoRefresh {
    /// Start refreshing `widget` every `period`. The first refresh happens one
    /// period from now; the initial load is [`WidgetState::mount`]'s job.
    ///
    /// A `period` shorter than [`MIN_PERIOD`] (including zero) is raised to it.
    pub fn spawn(widget: Arc<WidgetState>, period: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let period = if period < MIN_PERIOD {
            warn!(widget = widget.name(), ?period, min = ?MIN_PERIOD, "Refresh period too short, clamping");
            MIN_PERIOD
        } else {
            period
        };

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut refreshes = 0u64;

            info!(widget = widget.name(), ?period, "Auto refresh started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = shutdown_rx.changed() => break,
                }

                tokio::select! {
                    outcome = widget.refresh() => {
                        refreshes += 1;
                        if outcome == RefreshOutcome::Discarded {
                            debug!(widget = widget.name(), "Auto refresh tick on unmounted widget");
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }

            info!(widget = widget.name(), refreshes, "Auto refresh stopped");
            refreshes
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Stop the task and wait for it to finish. Returns the number of
    /// refreshes it completed, or 0 if the task panicked or was cancelled.
    pub async fn stop(mut self) -> u64 {
        let _ = self.shutdown.send(true);
        let Some(handle) = self.handle.take() else {
            return 0;
        };
        match handle.await {
            Ok(refreshes) => refreshes,
            Err(e) => {
                error!(%e, "Auto refresh task failed");
                0
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}
