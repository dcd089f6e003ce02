//! Remote queue refresh and the fixed-interval poll timer

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::model::{AppEvent, QueueError, QueueItem};

use super::AppController;

impl AppController {
    /// Fetch the queue in the background; the result comes back as
    /// [`AppEvent::QueueFetched`]. No-op while logged out.
    pub fn refresh(&self) {
        let Some(token) = self.model.access_token().map(str::to_string) else {
            tracing::trace!("Skipping queue refresh, not authenticated");
            return;
        };

        let client = self.queue_client.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = client.fetch_queue(&token).await;
            crate::log_api_result!("fetch_queue", result);
            let _ = events.send(AppEvent::QueueFetched(result));
        });
    }

    pub fn apply_queue_result(&mut self, result: Result<Vec<QueueItem>, QueueError>) {
        match result {
            Ok(items) => {
                tracing::debug!(count = items.len(), "Queue refreshed");
                self.model.replace_queue(items);
                self.broadcast_queue();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to refresh queue, keeping previous state");
            }
        }
    }
}

/// Emit [`AppEvent::PollTick`] every `interval` until cancelled. The first
/// tick fires one interval after start; failures never change the cadence.
pub fn start_polling(
    interval: Duration,
    events: UnboundedSender<AppEvent>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tracing::info!(interval_ms = interval.as_millis() as u64, "Starting queue poller");
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Queue poller cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    if events.send(AppEvent::PollTick).is_err() {
                        break;
                    }
                }
            }
        }
    })
}
