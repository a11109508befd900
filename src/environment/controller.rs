use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::config::{ClassifierConfig, MonitorConfig};
use crate::models::EnvironmentalSample;
use crate::sources::SampleSource;
use crate::{log_info, log_warn};

use super::monitor::EnvironmentMonitor;

const ENABLE_LOGS: bool = true;

/// Owns the sample window and the poll loop that feeds it. The source
/// returns readings newest first; ingestion replays them oldest first and
/// drops anything at or before the newest retained timestamp.
pub struct EnvironmentController<S: SampleSource> {
    monitor: Arc<Mutex<EnvironmentMonitor>>,
    source: Arc<S>,
    poll_interval: Duration,
    poller: Arc<Mutex<Option<(JoinHandle<()>, CancellationToken)>>>,
}

impl<S: SampleSource> Clone for EnvironmentController<S> {
    fn clone(&self) -> Self {
        Self {
            monitor: self.monitor.clone(),
            source: self.source.clone(),
            poll_interval: self.poll_interval,
            poller: self.poller.clone(),
        }
    }
}

impl<S: SampleSource> EnvironmentController<S> {
    pub fn new(source: S, classifiers: &ClassifierConfig, config: &MonitorConfig) -> Self {
        let monitor = EnvironmentMonitor::new(
            config.sample_window,
            classifiers.temperature,
            classifiers.humidity,
        );
        Self {
            monitor: Arc::new(Mutex::new(monitor)),
            source: Arc::new(source),
            poll_interval: config.sample_poll_interval,
            poller: Arc::new(Mutex::new(None)),
        }
    }

    /// Runs one poll cycle. Transport errors are logged and swallowed;
    /// readings simply stop updating until a later cycle succeeds.
    pub async fn poll_now(&self) {
        let samples = match self.source.fetch_samples().await {
            Ok(samples) => samples,
            Err(err) => {
                log_warn!("sample poll failed, keeping previous window: {err}");
                return;
            }
        };

        let mut monitor = self.monitor.lock().await;
        let cutoff = monitor.latest().map(|s| s.timestamp);
        let mut ingested = 0usize;
        for sample in samples.iter().rev() {
            if cutoff.map_or(true, |ts| sample.timestamp > ts) {
                monitor.push(*sample);
                ingested += 1;
            }
        }
        if ingested > 0 {
            log_info!(
                "ingested {ingested} samples, excursion={}",
                monitor.is_excursion()
            );
        }
    }

    pub async fn latest(&self) -> Option<EnvironmentalSample> {
        self.monitor.lock().await.latest().copied()
    }

    pub async fn is_excursion(&self) -> bool {
        self.monitor.lock().await.is_excursion()
    }

    pub async fn temperature_excursion(&self) -> bool {
        self.monitor.lock().await.temperature_excursion()
    }

    pub async fn humidity_excursion(&self) -> bool {
        self.monitor.lock().await.humidity_excursion()
    }

    /// Snapshot of the trend window, oldest to newest.
    pub async fn window(&self) -> Vec<EnvironmentalSample> {
        self.monitor.lock().await.window().copied().collect()
    }

    pub async fn start_monitoring(&self) {
        let mut poller = self.poller.lock().await;
        if poller.is_some() {
            return;
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();
        let controller = self.clone();
        let poll_interval = self.poll_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        controller.poll_now().await;
                    }
                    _ = token_clone.cancelled() => {
                        log_info!("sample poll loop shutting down");
                        break;
                    }
                }
            }
        });

        *poller = Some((handle, cancel_token));
    }

    pub async fn stop_monitoring(&self) -> Result<()> {
        if let Some((handle, token)) = self.poller.lock().await.take() {
            token.cancel();
            handle.await.context("sample poll task failed to join")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use chrono::{DateTime, Duration, Utc};

    struct FixedSampleSource {
        batches: Mutex<Vec<Vec<EnvironmentalSample>>>,
    }

    impl FixedSampleSource {
        fn new(mut batches: Vec<Vec<EnvironmentalSample>>) -> Self {
            batches.reverse();
            Self {
                batches: Mutex::new(batches),
            }
        }
    }

    impl SampleSource for FixedSampleSource {
        async fn fetch_samples(&self) -> Result<Vec<EnvironmentalSample>, SourceError> {
            self.batches
                .lock()
                .await
                .pop()
                .ok_or_else(|| SourceError::Transport("sensor offline".into()))
        }
    }

    fn sample(base: DateTime<Utc>, offset_secs: i64, temperature: f64) -> EnvironmentalSample {
        EnvironmentalSample {
            timestamp: base + Duration::seconds(offset_secs),
            temperature,
            humidity: 60.0,
        }
    }

    fn controller(batches: Vec<Vec<EnvironmentalSample>>) -> EnvironmentController<FixedSampleSource> {
        EnvironmentController::new(
            FixedSampleSource::new(batches),
            &ClassifierConfig::default(),
            &MonitorConfig::default(),
        )
    }

    #[tokio::test]
    async fn ingests_reverse_chronological_batches_oldest_first() {
        let base = Utc::now();
        // Source returns newest first.
        let batch = vec![
            sample(base, 10, 3.0),
            sample(base, 5, 5.5),
            sample(base, 0, 2.0),
        ];
        let controller = controller(vec![batch]);
        controller.poll_now().await;

        let temps: Vec<f64> = controller
            .window()
            .await
            .iter()
            .map(|s| s.temperature)
            .collect();
        assert_eq!(temps, vec![2.0, 5.5, 3.0]);
        assert_eq!(controller.latest().await.unwrap().temperature, 3.0);
        // Latest sample is back in band, so no excursion right now.
        assert!(!controller.is_excursion().await);
    }

    #[tokio::test]
    async fn repeated_polls_do_not_duplicate_already_seen_samples() {
        let base = Utc::now();
        let first = vec![sample(base, 5, 2.5), sample(base, 0, 2.0)];
        let second = vec![
            sample(base, 10, 3.0),
            sample(base, 5, 2.5),
            sample(base, 0, 2.0),
        ];
        let controller = controller(vec![first, second]);

        controller.poll_now().await;
        assert_eq!(controller.window().await.len(), 2);

        controller.poll_now().await;
        let temps: Vec<f64> = controller
            .window()
            .await
            .iter()
            .map(|s| s.temperature)
            .collect();
        assert_eq!(temps, vec![2.0, 2.5, 3.0]);
    }

    #[tokio::test]
    async fn failed_poll_leaves_the_window_untouched() {
        let base = Utc::now();
        let controller = controller(vec![vec![sample(base, 0, 5.5)]]);
        controller.poll_now().await;
        assert!(controller.is_excursion().await);

        // Script exhausted: next fetch is a transport error.
        controller.poll_now().await;
        assert_eq!(controller.window().await.len(), 1);
        assert!(controller.is_excursion().await);
    }
}
