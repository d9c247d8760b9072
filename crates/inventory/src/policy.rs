//! Per-medicine replenishment and expiry thresholds, with defaults.

use serde::{Deserialize, Serialize};

use rxstock_core::ValueObject;

use crate::medicine::Medicine;

/// Fallback minimum stock level when a medicine carries none.
pub const DEFAULT_MIN_STOCK_LEVEL: i64 = 10;
/// Fallback reorder point when a medicine carries none.
pub const DEFAULT_REORDER_POINT: i64 = 20;
/// Days-until-expiry at or below which a medicine is expiry-critical.
pub const DEFAULT_EXPIRY_CRITICAL_DAYS: i64 = 7;
/// Days-until-expiry at or below which a medicine is expiring soon.
pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 30;
/// Suggested order quantity when no max stock level is known.
pub const DEFAULT_ORDER_QUANTITY: i64 = 50;

/// Replenishment/expiry thresholds applied when a medicine record does not
/// carry its own.
///
/// All resolution clamps to ≥ 0 so classifiers never see negative
/// thresholds, whatever the snapshot contained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    pub min_stock_level: i64,
    pub reorder_point: i64,
    pub max_stock_level: Option<i64>,
    pub expiry_critical_days: i64,
    pub expiry_warning_days: i64,
    pub default_order_quantity: i64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            min_stock_level: DEFAULT_MIN_STOCK_LEVEL,
            reorder_point: DEFAULT_REORDER_POINT,
            max_stock_level: None,
            expiry_critical_days: DEFAULT_EXPIRY_CRITICAL_DAYS,
            expiry_warning_days: DEFAULT_EXPIRY_WARNING_DAYS,
            default_order_quantity: DEFAULT_ORDER_QUANTITY,
        }
    }
}

impl ValueObject for ThresholdPolicy {}

impl ThresholdPolicy {
    /// Effective minimum stock level for `medicine`.
    pub fn resolve_min(&self, medicine: &Medicine) -> i64 {
        medicine
            .min_stock_level
            .unwrap_or(self.min_stock_level)
            .max(0)
    }

    /// Effective reorder point for `medicine`.
    pub fn resolve_reorder(&self, medicine: &Medicine) -> i64 {
        medicine
            .reorder_point
            .unwrap_or(self.reorder_point)
            .max(0)
    }

    /// Effective maximum stock level for `medicine`, if any is known.
    pub fn resolve_max(&self, medicine: &Medicine) -> Option<i64> {
        medicine
            .max_stock_level
            .or(self.max_stock_level)
            .map(|v| v.max(0))
    }
}
