use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One cold-storage sensor reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentalSample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
}
