pub mod alerts;
pub mod classify;
pub mod clock;
pub mod config;
pub mod environment;
pub mod error;
pub mod kitchen;
pub mod models;
pub mod sim;
pub mod sources;
pub mod utils;

pub use alerts::AlertAggregator;
pub use classify::{ExpiryThresholds, IdealBand, StockStatus, Urgency};
pub use clock::SessionClock;
pub use config::{ClassifierConfig, MonitorConfig};
pub use environment::{EnvironmentController, EnvironmentMonitor};
pub use error::{SessionError, SourceError};
pub use kitchen::{KitchenController, SessionReport};
pub use models::{
    AlertFeed, CookingSession, EnvironmentalSample, ExpiryAlert, Freshness, InventoryItem,
    RawExpiringItem, RescueMenu, SessionStatus, TimeLeft,
};
pub use sources::{AlertSource, SampleSource, SessionSource};
