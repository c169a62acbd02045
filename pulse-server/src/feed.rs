//! Value feed shared by every `/ws/tweets` connection.

use anyhow::{ensure, Result};
use log::debug;
use std::time::Duration;
use tokio::{
    sync::broadcast,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

/// Values buffered per subscriber before it starts lagging.
const CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeedConfig {
    pub interval: Duration,
    pub min: i64,
    pub max: i64,
}

impl FeedConfig {
    pub fn new(interval: Duration, min: i64, max: i64) -> Result<Self> {
        ensure!(min <= max, "feed range is empty: min {min} > max {max}");
        ensure!(!interval.is_zero(), "feed interval must be positive");
        Ok(Self { interval, min, max })
    }
}

/// Broadcast group of generated values. Dropping the feed stops the
/// producer task.
pub struct Feed {
    tx: broadcast::Sender<f64>,
    task: JoinHandle<()>,
}

impl Feed {
    pub fn spawn(config: FeedConfig) -> Self {
        let (tx, _) = broadcast::channel(CAPACITY);
        let task = tokio::spawn({
            let tx = tx.clone();
            async move { produce(config, tx).await }
        });
        Self { tx, task }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<f64> {
        self.tx.subscribe()
    }

    /// Number of connections currently in the group.
    pub fn listeners(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Drop for Feed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn produce(config: FeedConfig, tx: broadcast::Sender<f64>) {
    let mut ticker = time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let value = fastrand::i64(config.min..=config.max) as f64;
        // An empty group is fine; values are not kept for late joiners.
        let listeners = tx.send(value).unwrap_or(0);
        debug!("Feed: value {value} to {listeners} listener(s)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(FeedConfig::new(Duration::from_millis(10), 5, 5).is_ok());
        assert!(FeedConfig::new(Duration::from_millis(10), 6, 5).is_err());
        assert!(FeedConfig::new(Duration::ZERO, 0, 5).is_err());
    }

    #[tokio::test]
    async fn test_feed_values_in_range() {
        let config = FeedConfig::new(Duration::from_millis(5), -3, 3).unwrap();
        let feed = Feed::spawn(config);
        let mut a = feed.subscribe();
        let mut b = feed.subscribe();
        assert_eq!(feed.listeners(), 2);

        for _ in 0..5 {
            let va = time::timeout(Duration::from_secs(2), a.recv())
                .await
                .unwrap()
                .unwrap();
            let vb = time::timeout(Duration::from_secs(2), b.recv())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(va, vb);
            assert!((-3. ..=3.).contains(&va));
            assert_eq!(va.fract(), 0.);
        }

        drop(b);
        assert_eq!(feed.listeners(), 1);
    }
}
