use crate::classify::ExpiryThresholds;
use crate::error::SourceError;
use crate::models::{ExpiryAlert, RawExpiringItem};

/// Resolves the backend's inconsistent field naming into the canonical alert
/// shape. This is the single place the `item_name`/`name` and
/// `quantity`/`qty` ambiguity is handled.
///
/// The id is the record's position in the returned list; it is only stable
/// until the next poll replaces the working set.
pub fn normalize_item(
    raw: &RawExpiringItem,
    id: usize,
    thresholds: &ExpiryThresholds,
) -> Result<ExpiryAlert, SourceError> {
    let item_name = raw
        .item_name
        .clone()
        .or_else(|| raw.name.clone())
        .ok_or_else(|| SourceError::Malformed(format!("record {id} has no item name")))?;

    let days_left = raw
        .expiry_days
        .ok_or_else(|| SourceError::Malformed(format!("record {id} ({item_name}) has no expiry_days")))?;

    Ok(ExpiryAlert {
        id,
        item_name,
        days_left,
        quantity: raw.quantity.or(raw.qty).unwrap_or(0.0),
        unit: raw.unit.clone().unwrap_or_default(),
        urgency: thresholds.urgency(days_left),
    })
}
