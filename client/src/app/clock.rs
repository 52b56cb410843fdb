//! # Refresh Clock
//!
//! Two independently tunable tick counters. `fast` drives account-scoped reads, `slow` drives
//! protocol-wide reads. Ticks are pure re-fetch triggers: consumers watch for a change and
//! never compare tick values to order results.

use crate::core::error::ConfigError;
use crate::debug::spawn_tracked;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

/// Ticking state for one session. Dropping it stops both timers.
pub struct RefreshClock {
    fast: watch::Receiver<u64>,
    slow: watch::Receiver<u64>,
    tasks: Vec<JoinHandle<()>>,
}

impl RefreshClock {
    /// Start both cadences. The fast cadence may not be slower than the slow one.
    pub fn start(fast: Duration, slow: Duration) -> Result<Self, ConfigError> {
        if fast.is_zero() || slow.is_zero() {
            return Err(ConfigError::Invalid("refresh intervals must be non-zero".into()));
        }
        if fast > slow {
            return Err(ConfigError::Invalid(format!(
                "fast refresh ({:?}) is slower than slow refresh ({:?})",
                fast, slow
            )));
        }

        let (fast_tx, fast_rx) = watch::channel(0);
        let (slow_tx, slow_rx) = watch::channel(0);
        let tasks = vec![
            spawn_tracked("refresh_clock_fast", tick_loop(fast, fast_tx)),
            spawn_tracked("refresh_clock_slow", tick_loop(slow, slow_tx)),
        ];

        info!(
            fast_ms = fast.as_millis(),
            slow_ms = slow.as_millis(),
            "Refresh clock started"
        );

        Ok(Self {
            fast: fast_rx,
            slow: slow_rx,
            tasks,
        })
    }

    pub fn fast(&self) -> watch::Receiver<u64> {
        self.fast.clone()
    }

    pub fn slow(&self) -> watch::Receiver<u64> {
        self.slow.clone()
    }

    pub fn stop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for RefreshClock {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn tick_loop(period: Duration, tx: watch::Sender<u64>) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; the counter starts at zero for that instant.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        tx.send_modify(|n| *n += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_inverted_cadences() {
        let result = RefreshClock::start(Duration::from_secs(60), Duration::from_secs(10));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        let result = RefreshClock::start(Duration::ZERO, Duration::from_secs(10));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cadences_tick_independently() {
        let clock = RefreshClock::start(Duration::from_secs(10), Duration::from_secs(60)).unwrap();
        let fast = clock.fast();
        let slow = clock.slow();

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(*fast.borrow(), 6);
        assert_eq!(*slow.borrow(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticking() {
        let clock = RefreshClock::start(Duration::from_secs(1), Duration::from_secs(2)).unwrap();
        let mut fast = clock.fast();
        drop(clock);
        tokio::time::sleep(Duration::from_secs(5)).await;
        // The sender lives in the aborted task, so the channel closes.
        assert!(fast.changed().await.is_err());
    }
}
