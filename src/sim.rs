//! Simulated backends for the demo binary, standing in for the real alert,
//! session, and IoT endpoints.

use chrono::{Duration, Utc};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

use crate::error::SourceError;
use crate::models::{AlertFeed, CookingSession, EnvironmentalSample};
use crate::sources::{AlertSource, SampleSource, SessionSource};

/// Serves a canned alert feed, alternating the rescue menu in and out so the
/// aggregator's replace/clear path gets exercised.
pub struct SimulatedAlertSource {
    polls: AtomicU64,
}

impl SimulatedAlertSource {
    pub fn new() -> Self {
        Self {
            polls: AtomicU64::new(0),
        }
    }
}

impl Default for SimulatedAlertSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertSource for SimulatedAlertSource {
    async fn fetch(&self) -> Result<AlertFeed, SourceError> {
        let poll = self.polls.fetch_add(1, Ordering::Relaxed);

        // Mixed field spellings on purpose: the backend really is this
        // inconsistent.
        let mut feed = serde_json::json!({
            "expiring_items": [
                {"name": "Tomat", "qty": 3, "unit": "Kg", "expiry_days": 1},
                {"item_name": "Wortel", "quantity": 5, "unit": "Ikat", "expiry_days": 2},
                {"item_name": "Telur", "quantity": 30, "unit": "Butir", "expiry_days": 6},
            ]
        });

        if poll % 2 == 0 {
            feed["rescue_menu"] = serde_json::json!({
                "menu_name": "Sup Sayur Penyelamat",
                "description": "Gunakan tomat dan wortel yang hampir kadaluarsa",
                "ingredients_needed": ["Tomat", "Wortel", "Bawang Merah"],
                "cooking_steps": ["Potong sayuran", "Tumis bumbu", "Rebus 15 menit"],
                "nutrition": {"calories": "250 kkal", "protein": "8 g"},
                "reason": "3 Kg tomat kadaluarsa besok"
            });
        }

        serde_json::from_value(feed)
            .map_err(|err| SourceError::Malformed(format!("simulated feed: {err}")))
    }
}

/// In-memory session history that accepts serve commands.
#[derive(Default)]
pub struct SimulatedSessionSource {
    history: Mutex<Vec<CookingSession>>,
    served: Mutex<Vec<String>>,
}

impl SimulatedSessionSource {
    pub fn with_history(history: Vec<CookingSession>) -> Self {
        Self {
            history: Mutex::new(history),
            served: Mutex::new(Vec::new()),
        }
    }
}

impl SessionSource for SimulatedSessionSource {
    async fn fetch_sessions(&self) -> Result<Vec<CookingSession>, SourceError> {
        Ok(self.history.lock().await.clone())
    }

    async fn mark_served(&self, id: &str) -> Result<(), SourceError> {
        self.served.lock().await.push(id.to_string());
        Ok(())
    }
}

/// Generates fridge-like readings, drifting out of band now and then so the
/// excursion flags have something to do. Keeps a short newest-first history
/// to mimic the real endpoint's reverse-chronological response.
pub struct SimulatedSampleSource {
    history: Mutex<Vec<EnvironmentalSample>>,
    max_history: usize,
}

impl SimulatedSampleSource {
    pub fn new(max_history: usize) -> Self {
        Self {
            history: Mutex::new(Vec::new()),
            max_history,
        }
    }
}

impl SampleSource for SimulatedSampleSource {
    async fn fetch_samples(&self) -> Result<Vec<EnvironmentalSample>, SourceError> {
        let (temperature, humidity) = {
            let mut rng = rand::thread_rng();
            (
                (rng.gen_range(1.0..6.0) * 10.0_f64).round() / 10.0,
                (rng.gen_range(45.0..85.0) * 10.0_f64).round() / 10.0,
            )
        };

        let mut history = self.history.lock().await;
        let timestamp = history
            .first()
            .map(|s: &EnvironmentalSample| s.timestamp + Duration::seconds(5))
            .unwrap_or_else(Utc::now);
        history.insert(
            0,
            EnvironmentalSample {
                timestamp,
                temperature,
                humidity,
            },
        );
        history.truncate(self.max_history);
        Ok(history.clone())
    }
}
