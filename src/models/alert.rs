use serde::{Deserialize, Serialize};

use crate::classify::Urgency;

/// A raw expiring-item record as returned by the alert source. The backend
/// is inconsistent about field naming (`item_name` vs `name`, `quantity` vs
/// `qty`), so both spellings are kept here and resolved once by the
/// normalization boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawExpiringItem {
    pub item_name: Option<String>,
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub qty: Option<f64>,
    pub unit: Option<String>,
    pub expiry_days: Option<i64>,
}

/// One poll's worth of payload from the alert source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertFeed {
    pub expiring_items: Vec<RawExpiringItem>,
    pub rescue_menu: Option<RescueMenu>,
}

/// Canonical expiry alert. Regenerated wholesale on every poll; the id is
/// the item's position in the returned list, so it is only stable within a
/// single poll cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpiryAlert {
    pub id: usize,
    pub item_name: String,
    pub days_left: i64,
    pub quantity: f64,
    pub unit: String,
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RescueNutrition {
    pub calories: String,
    pub protein: String,
}

/// AI-suggested menu that uses up soon-to-expire stock. At most one is held
/// at a time; each poll replaces it or clears it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RescueMenu {
    pub menu_name: String,
    pub description: String,
    pub ingredients_needed: Vec<String>,
    pub cooking_steps: Vec<String>,
    pub nutrition: RescueNutrition,
    pub reason: String,
}
