use serde::{Deserialize, Serialize};

/// Urgency tier for the notification feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    Warning,
    Info,
}

/// Status tier for standing inventory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Critical,
    Warning,
    Fresh,
}

/// Generic threshold classifier: boundaries are evaluated in order of
/// descending severity and the first tier whose boundary is satisfied
/// (`value <= boundary`) wins. Falls back to the lowest-severity tier.
pub fn classify<V, T>(value: V, thresholds: &[(V, T)], fallback: T) -> T
where
    V: PartialOrd + Copy,
    T: Copy,
{
    thresholds
        .iter()
        .find(|(boundary, _)| value <= *boundary)
        .map(|(_, tier)| *tier)
        .unwrap_or(fallback)
}

/// Boundaries for a days-to-expiry threshold set.
#[derive(Debug, Clone)]
pub struct ExpiryThresholds {
    pub critical_days: i64,
    pub warning_days: i64,
}

impl ExpiryThresholds {
    /// Inventory-granularity classification (critical/warning/fresh).
    pub fn stock_status(&self, days_left: i64) -> StockStatus {
        classify(
            days_left,
            &[
                (self.critical_days, StockStatus::Critical),
                (self.warning_days, StockStatus::Warning),
            ],
            StockStatus::Fresh,
        )
    }

    /// Alert-feed-granularity classification (critical/warning/info).
    pub fn urgency(&self, days_left: i64) -> Urgency {
        classify(
            days_left,
            &[
                (self.critical_days, Urgency::Critical),
                (self.warning_days, Urgency::Warning),
            ],
            Urgency::Info,
        )
    }
}

/// Inclusive ideal band for an environmental signal. Values on the
/// boundaries are in range; anything outside is an excursion.
#[derive(Debug, Clone, Copy)]
pub struct IdealBand {
    pub min: f64,
    pub max: f64,
}

impl IdealBand {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn is_excursion(&self, value: f64) -> bool {
        !self.contains(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;

    #[test]
    fn inventory_tiers_over_full_range() {
        let config = ClassifierConfig::default();
        for days in -3..=30 {
            let status = config.inventory.stock_status(days);
            let expected = if days <= 2 {
                StockStatus::Critical
            } else if days <= 5 {
                StockStatus::Warning
            } else {
                StockStatus::Fresh
            };
            assert_eq!(status, expected, "days={days}");
        }
    }

    #[test]
    fn inventory_boundaries_land_on_stricter_side() {
        let config = ClassifierConfig::default();
        assert_eq!(config.inventory.stock_status(2), StockStatus::Critical);
        assert_eq!(config.inventory.stock_status(3), StockStatus::Warning);
        assert_eq!(config.inventory.stock_status(5), StockStatus::Warning);
        assert_eq!(config.inventory.stock_status(6), StockStatus::Fresh);
    }

    #[test]
    fn alert_tiers_over_full_range() {
        let config = ClassifierConfig::default();
        for days in -3..=30 {
            let urgency = config.alerts.urgency(days);
            let expected = if days <= 1 {
                Urgency::Critical
            } else if days <= 3 {
                Urgency::Warning
            } else {
                Urgency::Info
            };
            assert_eq!(urgency, expected, "days={days}");
        }
    }

    #[test]
    fn alert_boundaries_land_on_stricter_side() {
        let config = ClassifierConfig::default();
        assert_eq!(config.alerts.urgency(1), Urgency::Critical);
        assert_eq!(config.alerts.urgency(2), Urgency::Warning);
        assert_eq!(config.alerts.urgency(3), Urgency::Warning);
        assert_eq!(config.alerts.urgency(4), Urgency::Info);
    }

    #[test]
    fn the_two_expiry_sets_disagree_by_design() {
        // Collapsing them would silently change alerting behavior.
        let config = ClassifierConfig::default();
        assert_eq!(config.inventory.stock_status(2), StockStatus::Critical);
        assert_eq!(config.alerts.urgency(2), Urgency::Warning);
    }

    #[test]
    fn temperature_band_boundaries_are_not_excursions() {
        let band = ClassifierConfig::default().temperature;
        assert!(!band.is_excursion(0.0));
        assert!(!band.is_excursion(4.0));
        assert!(!band.is_excursion(2.5));
        assert!(band.is_excursion(-0.1));
        assert!(band.is_excursion(4.1));
        assert!(band.is_excursion(5.5));
    }

    #[test]
    fn humidity_band_boundaries_are_not_excursions() {
        let band = ClassifierConfig::default().humidity;
        assert!(!band.is_excursion(40.0));
        assert!(!band.is_excursion(80.0));
        assert!(!band.is_excursion(60.0));
        assert!(band.is_excursion(39.9));
        assert!(band.is_excursion(80.1));
    }

    #[test]
    fn classify_falls_back_when_no_boundary_matches() {
        let tiers = [(10, "low"), (20, "mid")];
        assert_eq!(classify(5, &tiers, "high"), "low");
        assert_eq!(classify(15, &tiers, "high"), "mid");
        assert_eq!(classify(25, &tiers, "high"), "high");
    }
}
