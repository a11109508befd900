pub mod alert;
pub mod inventory;
pub mod sample;
pub mod session;

pub use alert::{AlertFeed, ExpiryAlert, RawExpiringItem, RescueMenu, RescueNutrition};
pub use inventory::InventoryItem;
pub use sample::EnvironmentalSample;
pub use session::{CookingSession, Freshness, SessionStatus, TimeLeft};
