//! Fixed-period refresh of price data.
//!
//! A [`Poller`] runs an async task on a tokio interval until its
//! [`PollerHandle`] is cancelled or dropped. The first tick fires
//! immediately. A tick that is still running when cancellation arrives is
//! abandoned at its next await point.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Refresh period for a single ticker's price view.
pub const PRICE_REFRESH: Duration = Duration::from_secs(30);
/// Refresh period for a correlation basket.
pub const BASKET_REFRESH: Duration = Duration::from_secs(60);

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Spawns recurring tasks.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    period: Duration,
}

impl Poller {
    pub fn every(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
        }
    }

    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Run `task` once per period. The task receives the 0-based tick number.
    pub fn spawn<F, Fut>(self, mut task: F) -> PollerHandle
    where
        F: FnMut(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let period = self.period;

        let join = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut tick = 0_u64;
            loop {
                tokio::select! {
                    _ = cancel_rx.changed() => break,
                    _ = interval.tick() => {}
                }

                tokio::select! {
                    _ = cancel_rx.changed() => break,
                    _ = task(tick) => {}
                }
                tick += 1;
            }
            debug!(ticks = tick, "poller stopped");
        });

        PollerHandle { cancel_tx, join }
    }
}

/// Owner of a running poller. Dropping it cancels the poller.
#[derive(Debug)]
pub struct PollerHandle {
    cancel_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl PollerHandle {
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Cancel and wait for the background task to exit.
    pub async fn shutdown(self) {
        self.cancel();
        let PollerHandle { cancel_tx, join } = self;
        let _ = join.await;
        drop(cancel_tx);
    }
}
