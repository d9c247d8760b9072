//! Replenishment planning.
//!
//! Two entry points with deliberately different candidate sets:
//!
//! - [`plan`] includes everything the classifier flags, down to the
//!   `reorder` band, for review-style screens.
//! - [`bulk_plan`] acts only on genuinely low stock (quantity at or below
//!   the minimum level) and generates one pending purchase order per
//!   candidate in a single batch. Medicines merely approaching their
//!   reorder point are excluded on purpose.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rxstock_core::{AggregateId, ValueObject};
use rxstock_inventory::{
    Medicine, MedicineId, StockStatus, ThresholdPolicy, classify_medicine_stock,
};
use rxstock_purchasing::{OrderPriority, PurchaseOrder, PurchaseOrderId, total_cost};
use rxstock_suppliers::SupplierId;

/// One suggested reorder line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplenishmentPlan {
    pub medicine_id: MedicineId,
    pub medicine_name: String,
    pub current_stock: i64,
    pub stock_status: StockStatus,
    pub suggested_quantity: i64,
    pub priority: OrderPriority,
    pub supplier_id: Option<SupplierId>,
    pub unit_cost: Decimal,
    pub estimated_cost: Decimal,
}

impl ValueObject for ReplenishmentPlan {}

/// Map a stock classification to an order priority.
pub fn priority_for(status: StockStatus) -> OrderPriority {
    match status {
        StockStatus::OutOfStock | StockStatus::Critical => OrderPriority::High,
        StockStatus::Low => OrderPriority::Medium,
        StockStatus::Reorder | StockStatus::Adequate => OrderPriority::Low,
    }
}

/// How much to order: top back up to the max stock level but never less
/// than the minimum level; without a known max, fall back to the policy's
/// default order quantity.
pub fn suggested_quantity(medicine: &Medicine, policy: &ThresholdPolicy) -> i64 {
    let qty = medicine.stock_quantity.max(0);
    let min = policy.resolve_min(medicine);

    match policy.resolve_max(medicine) {
        Some(max) => (max - qty).max(min),
        None => policy.default_order_quantity.max(0),
    }
}

/// Scan the snapshot and produce a reorder plan for every medicine whose
/// stock classification needs replenishment (`reorder` band included).
pub fn plan(medicines: &[Medicine], policy: &ThresholdPolicy) -> Vec<ReplenishmentPlan> {
    let rows: Vec<ReplenishmentPlan> = medicines
        .iter()
        .filter_map(|medicine| {
            let status = classify_medicine_stock(medicine, policy);
            if !status.needs_replenishment() {
                return None;
            }

            let quantity = suggested_quantity(medicine, policy);
            Some(ReplenishmentPlan {
                medicine_id: medicine.id,
                medicine_name: medicine.name.clone(),
                current_stock: medicine.stock_quantity.max(0),
                stock_status: status,
                suggested_quantity: quantity,
                priority: priority_for(status),
                supplier_id: medicine.supplier_id,
                unit_cost: medicine.cost_price,
                estimated_cost: total_cost(quantity, medicine.cost_price),
            })
        })
        .collect();

    tracing::debug!(
        scanned = medicines.len(),
        flagged = rows.len(),
        "replenishment plan computed"
    );
    rows
}

/// Generate one pending purchase order per medicine whose quantity is at or
/// below its minimum stock level.
///
/// Narrower than [`plan`]: the `reorder`-only band is excluded, so a bulk
/// run never orders for stock that is merely approaching its reorder point.
pub fn bulk_plan(
    medicines: &[Medicine],
    policy: &ThresholdPolicy,
    now: DateTime<Utc>,
) -> Vec<PurchaseOrder> {
    let orders: Vec<PurchaseOrder> = medicines
        .iter()
        .filter(|medicine| medicine.stock_quantity.max(0) <= policy.resolve_min(medicine))
        .map(|medicine| {
            let status = classify_medicine_stock(medicine, policy);
            let quantity = suggested_quantity(medicine, policy);
            let mut order = PurchaseOrder::new(
                PurchaseOrderId::new(AggregateId::new()),
                medicine.id,
                medicine.name.clone(),
                quantity,
                medicine.cost_price,
                priority_for(status),
                medicine.supplier_id,
                now,
            );
            order.notes = Some(format!(
                "bulk reorder: stock {} at or below minimum {}",
                medicine.stock_quantity.max(0),
                policy.resolve_min(medicine)
            ));
            order
        })
        .collect();

    tracing::debug!(
        scanned = medicines.len(),
        generated = orders.len(),
        "bulk reorder batch generated"
    );
    orders
}
