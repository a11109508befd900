use std::time::Duration;

use crate::classify::{ExpiryThresholds, IdealBand};

/// Classification thresholds with tunable boundaries.
///
/// The two expiry sets classify different quantities at different
/// granularities (standing stock vs. the notification feed) and must stay
/// independently configurable.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Standing inventory: critical <= 2 days, warning <= 5 days, else fresh.
    pub inventory: ExpiryThresholds,

    /// Notification feed: critical <= 1 day, warning <= 3 days, else info.
    pub alerts: ExpiryThresholds,

    /// Cold storage ideal band, inclusive (degrees Celsius).
    pub temperature: IdealBand,

    /// Storage humidity ideal band, inclusive (percent).
    pub humidity: IdealBand,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            inventory: ExpiryThresholds {
                critical_days: 2,
                warning_days: 5,
            },
            alerts: ExpiryThresholds {
                critical_days: 1,
                warning_days: 3,
            },
            temperature: IdealBand { min: 0.0, max: 4.0 },
            humidity: IdealBand {
                min: 40.0,
                max: 80.0,
            },
        }
    }
}

/// Cadences and capacities for the periodic loops.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Session clock tick driving freshness recomputation.
    pub clock_interval: Duration,

    /// Alert source poll cadence.
    pub alert_poll_interval: Duration,

    /// Environmental sample poll cadence.
    pub sample_poll_interval: Duration,

    /// Most-recent-N environmental samples retained for trend display.
    pub sample_window: usize,

    /// A session with less than this much time left (and more than zero)
    /// counts as critical.
    pub critical_window_secs: i64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            clock_interval: Duration::from_secs(60),
            alert_poll_interval: Duration::from_secs(30),
            sample_poll_interval: Duration::from_secs(5),
            sample_window: 20,
            critical_window_secs: 60 * 60,
        }
    }
}
