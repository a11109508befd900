use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Periodic trigger for time-derived freshness recomputation.
///
/// Publishes the current wall-clock time on every tick; subscribers do the
/// actual work. The loop is an owned, cancellable task so repeated
/// start/stop cycles never leak a perpetual timer.
pub struct SessionClock {
    tick_tx: watch::Sender<DateTime<Utc>>,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SessionClock {
    pub fn new(interval: Duration) -> Self {
        let (tick_tx, _) = watch::channel(Utc::now());
        Self {
            tick_tx,
            interval,
            handle: None,
            cancel_token: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DateTime<Utc>> {
        self.tick_tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();
        let tick_tx = self.tick_tx.clone();
        let tick_interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        tick_tx.send_replace(Utc::now());
                    }
                    _ = token_clone.cancelled() => {
                        info!("session clock shutting down");
                        break;
                    }
                }
            }
        });

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        if let Some(handle) = self.handle.take() {
            handle.await.context("session clock task failed to join")?;
        }
        Ok(())
    }
}
