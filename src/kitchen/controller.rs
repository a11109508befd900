use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::clock::SessionClock;
use crate::config::MonitorConfig;
use crate::error::SessionError;
use crate::models::{CookingSession, Freshness};
use crate::sources::SessionSource;
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

/// Per-session derived state published on every session clock tick.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionReport {
    pub session_id: String,
    pub menu_name: String,
    pub qty_produced: i64,
    pub time_left: String,
    pub freshness: Freshness,
    pub storage_tips: String,
}

/// Owns the cooking sessions and their derived freshness reports.
///
/// Sessions are created locally, refreshed from the session source, and
/// monitored against the session clock. Served sessions stay in history but
/// leave the actively monitored set; spoiled sessions do not — they still
/// need an explicit serve to go away.
pub struct KitchenController<S: SessionSource> {
    sessions: Arc<Mutex<Vec<CookingSession>>>,
    source: Arc<S>,
    critical_window_secs: i64,
    report_tx: watch::Sender<Vec<SessionReport>>,
    monitor: Arc<Mutex<Option<(JoinHandle<()>, CancellationToken)>>>,
}

impl<S: SessionSource> Clone for KitchenController<S> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            source: self.source.clone(),
            critical_window_secs: self.critical_window_secs,
            report_tx: self.report_tx.clone(),
            monitor: self.monitor.clone(),
        }
    }
}

impl<S: SessionSource> KitchenController<S> {
    pub fn new(source: S, config: &MonitorConfig) -> Self {
        let (report_tx, _) = watch::channel(Vec::new());
        Self {
            sessions: Arc::new(Mutex::new(Vec::new())),
            source: Arc::new(source),
            critical_window_secs: config.critical_window_secs,
            report_tx,
            monitor: Arc::new(Mutex::new(None)),
        }
    }

    /// Replaces the local history with the source's. Sessions started
    /// locally since the last successful refresh are superseded by the
    /// source copy, which is the source of truth for persistence.
    pub async fn refresh(&self) -> Result<()> {
        let history = self
            .source
            .fetch_sessions()
            .await
            .map_err(|err| anyhow!("failed to fetch session history: {err}"))?;

        {
            let mut sessions = self.sessions.lock().await;
            *sessions = history;
        }
        self.publish_reports(Utc::now()).await;
        Ok(())
    }

    /// Constructs a new active session. Construction errors are surfaced
    /// synchronously and leave no partial state behind.
    pub async fn start_cooking(
        &self,
        menu_name: &str,
        qty_produced: i64,
        expires_at: DateTime<Utc>,
        storage_tips: &str,
    ) -> Result<CookingSession, SessionError> {
        let session = CookingSession::start(menu_name, qty_produced, expires_at, storage_tips)?;
        log_info!(
            "started cooking session {} ({}, {} porsi)",
            session.id,
            session.menu_name,
            session.qty_produced
        );

        self.sessions.lock().await.push(session.clone());
        self.publish_reports(Utc::now()).await;
        Ok(session)
    }

    /// Serves a session: validates the transition, forwards the command to
    /// the source, then applies it locally. A rejected precondition or a
    /// failed command leaves the local state unchanged.
    pub async fn mark_served(&self, id: &str) -> Result<()> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| anyhow!("unknown session {id}"))?;

        if session.is_served() {
            log_warn!("rejected serve for already-served session {id}");
            bail!(SessionError::InvalidTransition(format!(
                "session {id} is already served"
            )));
        }

        self.source
            .mark_served(id)
            .await
            .map_err(|err| anyhow!("serve command failed for session {id}: {err}"))?;

        session
            .mark_served()
            .map_err(|err| anyhow!(err))
            .context("serve transition rejected after source accepted it")?;

        let now = Utc::now();
        drop(sessions);
        self.publish_reports(now).await;
        Ok(())
    }

    /// Sessions still in the actively monitored set (not served; spoiled
    /// sessions remain until explicitly served).
    pub async fn active_sessions(&self) -> Vec<CookingSession> {
        self.sessions
            .lock()
            .await
            .iter()
            .filter(|s| !s.is_served())
            .cloned()
            .collect()
    }

    pub fn reports(&self) -> watch::Receiver<Vec<SessionReport>> {
        self.report_tx.subscribe()
    }

    async fn publish_reports(&self, now: DateTime<Utc>) {
        let sessions = self.sessions.lock().await;
        let reports: Vec<SessionReport> = sessions
            .iter()
            .filter(|s| !s.is_served())
            .map(|s| SessionReport {
                session_id: s.id.clone(),
                menu_name: s.menu_name.clone(),
                qty_produced: s.qty_produced,
                time_left: s.time_left(now).to_string(),
                freshness: s.freshness(now, self.critical_window_secs),
                storage_tips: s.storage_tips.clone(),
            })
            .collect();
        self.report_tx.send_replace(reports);
    }

    /// Recomputes freshness reports on every tick of the session clock.
    pub async fn spawn_monitor(&self, clock: &SessionClock) {
        let mut monitor = self.monitor.lock().await;
        if monitor.is_some() {
            return;
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();
        let controller = self.clone();
        let mut ticks = clock.subscribe();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = ticks.changed() => {
                        if changed.is_err() {
                            log_warn!("session clock dropped, stopping freshness monitor");
                            break;
                        }
                        let now = *ticks.borrow_and_update();
                        controller.publish_reports(now).await;
                    }
                    _ = token_clone.cancelled() => {
                        log_info!("freshness monitor shutting down");
                        break;
                    }
                }
            }
        });

        *monitor = Some((handle, cancel_token));
    }

    pub async fn stop_monitor(&self) -> Result<()> {
        if let Some((handle, token)) = self.monitor.lock().await.take() {
            token.cancel();
            handle.await.context("freshness monitor failed to join")?;
        }
        Ok(())
    }
}
