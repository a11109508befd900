use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::classify::ExpiryThresholds;
use crate::models::{ExpiryAlert, RescueMenu};
use crate::sources::AlertSource;
use crate::{log_info, log_warn};

use super::normalize::normalize_item;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Default)]
struct AlertState {
    alerts: Vec<ExpiryAlert>,
    rescue: Option<RescueMenu>,
}

/// Maintains the current visible set of expiry alerts plus at most one
/// rescue recommendation, refreshed from the alert source on a fixed
/// cadence.
///
/// Each poll replaces the working set wholesale; dismissals are a
/// client-local filter and survive only until the next poll. A failed poll
/// leaves the last-known-good set untouched.
pub struct AlertAggregator<S: AlertSource> {
    state: Arc<Mutex<AlertState>>,
    source: Arc<S>,
    thresholds: ExpiryThresholds,
    poll_interval: Duration,
    poller: Arc<Mutex<Option<(JoinHandle<()>, CancellationToken)>>>,
}

impl<S: AlertSource> Clone for AlertAggregator<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            source: self.source.clone(),
            thresholds: self.thresholds.clone(),
            poll_interval: self.poll_interval,
            poller: self.poller.clone(),
        }
    }
}

impl<S: AlertSource> AlertAggregator<S> {
    pub fn new(source: S, thresholds: ExpiryThresholds, poll_interval: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(AlertState::default())),
            source: Arc::new(source),
            thresholds,
            poll_interval,
            poller: Arc::new(Mutex::new(None)),
        }
    }

    /// Runs one poll cycle: fetch, normalize, classify, replace. Transport
    /// errors are logged and swallowed; the prior working set stays in place
    /// until the next scheduled cycle.
    pub async fn poll_now(&self) {
        let feed = match self.source.fetch().await {
            Ok(feed) => feed,
            Err(err) => {
                log_warn!("alert poll failed, keeping previous working set: {err}");
                return;
            }
        };

        let mut alerts = Vec::with_capacity(feed.expiring_items.len());
        for (idx, raw) in feed.expiring_items.iter().enumerate() {
            match normalize_item(raw, idx, &self.thresholds) {
                Ok(alert) => alerts.push(alert),
                // Skip the record, never abort the whole batch.
                Err(err) => log_warn!("skipping alert record: {err}"),
            }
        }

        let mut state = self.state.lock().await;
        state.alerts = alerts;
        state.rescue = feed.rescue_menu;
        log_info!(
            "alert poll complete: {} alerts, rescue menu {}",
            state.alerts.len(),
            if state.rescue.is_some() { "present" } else { "absent" }
        );
    }

    pub async fn alerts(&self) -> Vec<ExpiryAlert> {
        self.state.lock().await.alerts.clone()
    }

    pub async fn rescue_menu(&self) -> Option<RescueMenu> {
        self.state.lock().await.rescue.clone()
    }

    /// Size of the working set, driving the unread indicator.
    pub async fn current_count(&self) -> usize {
        self.state.lock().await.alerts.len()
    }

    /// Removes one alert from the working set. Purely local; the source of
    /// truth is untouched and the next poll may bring the alert back.
    pub async fn dismiss(&self, id: usize) -> bool {
        let mut state = self.state.lock().await;
        let before = state.alerts.len();
        state.alerts.retain(|alert| alert.id != id);
        state.alerts.len() < before
    }

    /// Clears the working set. Local only: a later poll repopulates it if
    /// the underlying condition still holds.
    pub async fn mark_all_read(&self) {
        self.state.lock().await.alerts.clear();
    }

    /// Spawns the poll loop. The loop serializes its own cycles: the next
    /// tick is not processed until the current cycle's replace has finished.
    pub async fn start_polling(&self) {
        let mut poller = self.poller.lock().await;
        if poller.is_some() {
            return;
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();
        let aggregator = self.clone();
        let poll_interval = self.poll_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        aggregator.poll_now().await;
                    }
                    _ = token_clone.cancelled() => {
                        log_info!("alert poll loop shutting down");
                        break;
                    }
                }
            }
        });

        *poller = Some((handle, cancel_token));
    }

    pub async fn stop_polling(&self) -> Result<()> {
        if let Some((handle, token)) = self.poller.lock().await.take() {
            token.cancel();
            handle.await.context("alert poll task failed to join")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Urgency;
    use crate::config::{ClassifierConfig, MonitorConfig};
    use crate::error::SourceError;
    use crate::models::{AlertFeed, RescueNutrition};

    struct ScriptedAlertSource {
        responses: Mutex<Vec<Result<AlertFeed, SourceError>>>,
    }

    impl ScriptedAlertSource {
        fn new(mut responses: Vec<Result<AlertFeed, SourceError>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    impl AlertSource for ScriptedAlertSource {
        async fn fetch(&self) -> Result<AlertFeed, SourceError> {
            self.responses
                .lock()
                .await
                .pop()
                .unwrap_or_else(|| Err(SourceError::Transport("script exhausted".into())))
        }
    }

    fn feed(json: serde_json::Value) -> AlertFeed {
        serde_json::from_value(json).unwrap()
    }

    fn aggregator_with(
        responses: Vec<Result<AlertFeed, SourceError>>,
    ) -> AlertAggregator<ScriptedAlertSource> {
        AlertAggregator::new(
            ScriptedAlertSource::new(responses),
            ClassifierConfig::default().alerts,
            MonitorConfig::default().alert_poll_interval,
        )
    }

    fn two_item_feed() -> AlertFeed {
        feed(serde_json::json!({
            "expiring_items": [
                {"name": "Tomat", "qty": 3, "unit": "Kg", "expiry_days": 1},
                {"item_name": "Wortel", "quantity": 5, "unit": "Ikat", "expiry_days": 4},
            ]
        }))
    }

    #[tokio::test]
    async fn poll_normalizes_and_classifies_the_feed() {
        let aggregator = aggregator_with(vec![Ok(two_item_feed())]);
        aggregator.poll_now().await;

        let alerts = aggregator.alerts().await;
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].item_name, "Tomat");
        assert_eq!(alerts[0].urgency, Urgency::Critical);
        assert_eq!(alerts[1].item_name, "Wortel");
        assert_eq!(alerts[1].urgency, Urgency::Info);
        assert_eq!(aggregator.current_count().await, 2);
    }

    #[tokio::test]
    async fn dismiss_removes_exactly_one_alert_until_the_next_poll() {
        let aggregator = aggregator_with(vec![Ok(two_item_feed()), Ok(two_item_feed())]);
        aggregator.poll_now().await;

        assert!(aggregator.dismiss(0).await);
        assert_eq!(aggregator.current_count().await, 1);
        assert!(aggregator.alerts().await.iter().all(|a| a.id != 0));

        // Dismissing an unknown id is a no-op.
        assert!(!aggregator.dismiss(7).await);
        assert_eq!(aggregator.current_count().await, 1);

        // Identity is positional, so the next poll resurrects the dismissal.
        aggregator.poll_now().await;
        assert_eq!(aggregator.current_count().await, 2);
    }

    #[tokio::test]
    async fn mark_all_read_clears_only_the_local_working_set() {
        let aggregator = aggregator_with(vec![Ok(two_item_feed()), Ok(two_item_feed())]);
        aggregator.poll_now().await;
        aggregator.mark_all_read().await;
        assert_eq!(aggregator.current_count().await, 0);

        aggregator.poll_now().await;
        assert_eq!(aggregator.current_count().await, 2);
    }

    #[tokio::test]
    async fn transport_failure_keeps_the_previous_working_set() {
        let aggregator = aggregator_with(vec![
            Ok(two_item_feed()),
            Err(SourceError::Transport("connection refused".into())),
        ]);
        aggregator.poll_now().await;
        aggregator.poll_now().await;
        assert_eq!(aggregator.current_count().await, 2);
    }

    #[tokio::test]
    async fn malformed_records_are_skipped_without_aborting_the_batch() {
        let aggregator = aggregator_with(vec![Ok(feed(serde_json::json!({
            "expiring_items": [
                {"qty": 9, "expiry_days": 1},
                {"name": "Wortel", "quantity": 5, "expiry_days": 4},
            ]
        })))]);
        aggregator.poll_now().await;

        let alerts = aggregator.alerts().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].item_name, "Wortel");
        // Positional identity reflects the raw list, not the surviving set.
        assert_eq!(alerts[0].id, 1);
    }

    #[tokio::test]
    async fn rescue_slot_is_replaced_or_cleared_each_poll() {
        let rescue = RescueMenu {
            menu_name: "Sup Sayur Penyelamat".into(),
            description: "Habiskan wortel dan tomat yang hampir kadaluarsa".into(),
            ingredients_needed: vec!["Wortel".into(), "Tomat".into()],
            cooking_steps: vec!["Potong sayuran".into(), "Rebus 15 menit".into()],
            nutrition: RescueNutrition {
                calories: "250 kkal".into(),
                protein: "8 g".into(),
            },
            reason: "3 Kg tomat kadaluarsa besok".into(),
        };
        let mut with_rescue = two_item_feed();
        with_rescue.rescue_menu = Some(rescue.clone());

        let aggregator = aggregator_with(vec![Ok(with_rescue), Ok(two_item_feed())]);

        aggregator.poll_now().await;
        assert_eq!(aggregator.rescue_menu().await, Some(rescue));

        aggregator.poll_now().await;
        assert_eq!(aggregator.rescue_menu().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_loop_runs_on_the_interval_and_stops_cleanly() {
        let aggregator = aggregator_with(vec![Ok(two_item_feed())]);
        aggregator.start_polling().await;

        // First tick fires immediately; give the spawned loop a chance to run.
        tokio::time::advance(Duration::from_millis(10)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(aggregator.current_count().await, 2);

        aggregator.stop_polling().await.unwrap();
        // Stopping twice is harmless.
        aggregator.stop_polling().await.unwrap();
    }
}
