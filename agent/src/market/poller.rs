//! Fixed-interval market refresh loop.
//!
//! The poller fetches immediately on [`MarketFeedPoller::start`] and then once per
//! interval. Every attempt produces a snapshot: the fresh quotes on success, an
//! empty one on failure. The interval itself is the retry mechanism.

use super::{MarketSnapshot, MarketSource};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct MarketFeedPoller {
    source: Arc<dyn MarketSource>,
    interval: Duration,
    running: Option<Running>,
}

struct Running {
    cancel: CancellationToken,
    /// Held by the loop while `on_update` runs.
    delivery: Arc<Mutex<()>>,
    task: JoinHandle<()>,
}

impl MarketFeedPoller {
    pub fn new(source: Arc<dyn MarketSource>, interval: Duration) -> Self {
        Self {
            source,
            interval,
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Start refreshing and deliver every snapshot to `on_update`.
    ///
    /// Must be called from within a tokio runtime. A poller that is already
    /// running is cancelled and replaced; its `on_update` is not called again
    /// once this returns.
    pub fn start<F>(&mut self, on_update: F)
    where
        F: FnMut(MarketSnapshot) + Send + 'static,
    {
        if let Some(previous) = self.running.take() {
            previous.cancel.cancel();
            // Waits out a delivery already running on another worker
            drop(previous.delivery.lock().unwrap_or_else(PoisonError::into_inner));
            previous.task.abort();
        }

        let cancel = CancellationToken::new();
        let delivery = Arc::new(Mutex::new(()));
        let task = tokio::spawn(poll_loop(
            self.source.clone(),
            self.interval,
            cancel.clone(),
            delivery.clone(),
            on_update,
        ));
        info!(interval = ?self.interval, "market feed started");

        self.running = Some(Running {
            cancel,
            delivery,
            task,
        });
    }

    /// Cancel the timer and any in-flight fetch.
    ///
    /// Once this returns, `on_update` will not be called again.
    pub async fn stop(&mut self) {
        let Some(Running { cancel, task, .. }) = self.running.take() else {
            return;
        };
        cancel.cancel();
        if let Err(e) = task.await {
            if e.is_panic() {
                warn!("market feed task panicked: {}", e);
            }
        }
        info!("market feed stopped");
    }
}

impl Drop for MarketFeedPoller {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.cancel.cancel();
            running.task.abort();
        }
    }
}

async fn poll_loop<F>(
    source: Arc<dyn MarketSource>,
    interval: Duration,
    cancel: CancellationToken,
    delivery: Arc<Mutex<()>>,
    mut on_update: F,
) where
    F: FnMut(MarketSnapshot) + Send + 'static,
{
    // First tick completes immediately.
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = source.fetch_quotes() => result,
        };

        let snapshot = match result {
            Ok(quotes) => {
                debug!(count = quotes.len(), "market feed refreshed");
                MarketSnapshot::new(quotes)
            }
            Err(e) => {
                warn!("market feed refresh failed, clearing quotes: {}", e);
                MarketSnapshot::empty()
            }
        };

        let _delivering = delivery.lock().unwrap_or_else(PoisonError::into_inner);
        if cancel.is_cancelled() {
            break;
        }
        on_update(snapshot);
    }
}
