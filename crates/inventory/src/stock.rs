//! Stock level classification.
//!
//! A pure, total function: unrepresentable inputs are coerced (clamped to
//! ≥ 0), never rejected. A frozen or erroring dashboard is worse than a
//! slightly-wrong status badge.

use serde::{Deserialize, Serialize};

use crate::medicine::Medicine;
use crate::policy::ThresholdPolicy;

/// Derived stock status, worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    Critical,
    Low,
    Reorder,
    Adequate,
}

impl StockStatus {
    /// Whether this status puts the medicine in the replenishment candidate
    /// set (everything except `adequate`).
    pub fn needs_replenishment(self) -> bool {
        self != StockStatus::Adequate
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StockStatus::OutOfStock => write!(f, "out_of_stock"),
            StockStatus::Critical => write!(f, "critical"),
            StockStatus::Low => write!(f, "low"),
            StockStatus::Reorder => write!(f, "reorder"),
            StockStatus::Adequate => write!(f, "adequate"),
        }
    }
}

/// Classify a stock quantity against its thresholds. First match wins:
///
/// 1. quantity is zero → `out_of_stock`
/// 2. quantity ≤ half the minimum level → `critical`
/// 3. quantity ≤ minimum level → `low`
/// 4. quantity ≤ reorder point → `reorder`
/// 5. otherwise → `adequate`
///
/// Negative inputs are clamped to 0 before evaluation. The half-minimum
/// comparison is done as `2·qty ≤ min`, which is exact in integers.
pub fn classify_stock(stock_quantity: i64, min_stock_level: i64, reorder_point: i64) -> StockStatus {
    let qty = stock_quantity.max(0);
    let min = min_stock_level.max(0);
    let reorder = reorder_point.max(0);

    if qty == 0 {
        StockStatus::OutOfStock
    } else if qty.saturating_mul(2) <= min {
        StockStatus::Critical
    } else if qty <= min {
        StockStatus::Low
    } else if qty <= reorder {
        StockStatus::Reorder
    } else {
        StockStatus::Adequate
    }
}

/// Classify a medicine, resolving missing thresholds against the policy.
pub fn classify_medicine_stock(medicine: &Medicine, policy: &ThresholdPolicy) -> StockStatus {
    classify_stock(
        medicine.stock_quantity,
        policy.resolve_min(medicine),
        policy.resolve_reorder(medicine),
    )
}
