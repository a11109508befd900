use serde::{Deserialize, Serialize};

use crate::classify::{ExpiryThresholds, StockStatus};

/// Standing stock item. The source of truth lives in the remote store; this
/// core only classifies the remaining shelf life.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    pub expiry_days: i64,
}

impl InventoryItem {
    pub fn status(&self, thresholds: &ExpiryThresholds) -> StockStatus {
        thresholds.stock_status(self.expiry_days)
    }
}
