use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Served,
}

/// Derived freshness tier for an active session. Spoiled outranks critical
/// in presentation but is only a classification: a spoiled session stays in
/// the active set until explicitly served.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    Fresh,
    Critical,
    Spoiled,
}

/// Time remaining until a session expires, in whole hours and truncated
/// minutes. Never fails: past-expiry collapses to `Expired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLeft {
    Remaining { hours: i64, minutes: i64 },
    Expired,
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeLeft::Remaining { hours, minutes } => write!(f, "{hours}j {minutes}m"),
            TimeLeft::Expired => write!(f, "Expired"),
        }
    }
}

/// A single produced batch of food, from creation to being served.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookingSession {
    pub id: String,
    pub menu_name: String,
    pub qty_produced: i64,
    pub created_at: DateTime<Utc>,
    /// Creation time plus the server-computed shelf-life window.
    pub expires_at: DateTime<Utc>,
    pub storage_tips: String,
    pub status: SessionStatus,
}

impl CookingSession {
    /// Constructs a new active session. Rejects eagerly on malformed input;
    /// no partial state is ever created.
    pub fn start(
        menu_name: &str,
        qty_produced: i64,
        expires_at: DateTime<Utc>,
        storage_tips: &str,
    ) -> Result<Self, SessionError> {
        Self::start_at(menu_name, qty_produced, expires_at, storage_tips, Utc::now())
    }

    /// Like [`CookingSession::start`] with an explicit creation timestamp.
    pub fn start_at(
        menu_name: &str,
        qty_produced: i64,
        expires_at: DateTime<Utc>,
        storage_tips: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if menu_name.trim().is_empty() {
            return Err(SessionError::Validation("menu name is empty".into()));
        }
        if qty_produced <= 0 {
            return Err(SessionError::Validation(format!(
                "qty_produced must be positive, got {qty_produced}"
            )));
        }
        if expires_at <= created_at {
            return Err(SessionError::Validation(
                "expiry must be after creation".into(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            menu_name: menu_name.to_string(),
            qty_produced,
            created_at,
            expires_at,
            storage_tips: storage_tips.to_string(),
            status: SessionStatus::Active,
        })
    }

    /// Transitions `active -> served`. Serving is terminal and irreversible;
    /// a second call fails without touching the state.
    pub fn mark_served(&mut self) -> Result<(), SessionError> {
        if self.status == SessionStatus::Served {
            return Err(SessionError::InvalidTransition(format!(
                "session {} is already served",
                self.id
            )));
        }
        self.status = SessionStatus::Served;
        Ok(())
    }

    pub fn is_served(&self) -> bool {
        self.status == SessionStatus::Served
    }

    /// Derived time remaining at `now`. Fractional minutes are truncated,
    /// not rounded.
    pub fn time_left(&self, now: DateTime<Utc>) -> TimeLeft {
        let diff = self.expires_at - now;
        if diff <= Duration::zero() {
            return TimeLeft::Expired;
        }
        TimeLeft::Remaining {
            hours: diff.num_hours(),
            minutes: diff.num_minutes() % 60,
        }
    }

    /// True iff time remaining is strictly positive and inside the critical
    /// window. An expired session is not critical; it is spoiled.
    pub fn is_critical(&self, now: DateTime<Utc>, critical_window_secs: i64) -> bool {
        let diff = self.expires_at - now;
        diff > Duration::zero() && diff < Duration::seconds(critical_window_secs)
    }

    pub fn freshness(&self, now: DateTime<Utc>, critical_window_secs: i64) -> Freshness {
        if self.time_left(now) == TimeLeft::Expired {
            Freshness::Spoiled
        } else if self.is_critical(now, critical_window_secs) {
            Freshness::Critical
        } else {
            Freshness::Fresh
        }
    }
}
