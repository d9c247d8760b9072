//! Supplier performance metrics aggregated from purchase order history.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rxstock_core::ValueObject;

use crate::order::{OrderStatus, PurchaseOrder};

/// Aggregated fulfillment and lead-time metrics for one supplier.
///
/// All Decimal outputs are rounded to 2 decimal places for display
/// stability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierPerformance {
    pub total_orders: usize,
    pub fulfilled_orders: usize,
    /// Percentage of orders that reached `received`; 0 when there are no
    /// orders.
    pub fulfillment_rate: Decimal,
    /// Average days from `created_at` to `delivered_at`, computed only over
    /// received orders carrying both timestamps.
    pub avg_delivery_days: Decimal,
    pub total_value: Decimal,
}

impl ValueObject for SupplierPerformance {}

/// Aggregate a supplier's order history.
///
/// The caller passes the orders already filtered to one supplier; the
/// calculator does not second-guess that grouping.
pub fn compute_supplier_performance(orders: &[PurchaseOrder]) -> SupplierPerformance {
    let total_orders = orders.len();
    let fulfilled_orders = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Received)
        .count();

    let fulfillment_rate = if total_orders == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(fulfilled_orders as u64) * Decimal::from(100)
            / Decimal::from(total_orders as u64))
        .round_dp(2)
    };

    // Received orders missing a delivery timestamp (legacy records) still
    // count toward totals; they just drop out of the average.
    let delivery_days: Vec<i64> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Received)
        .filter_map(|o| o.delivered_at.map(|d| (d - o.created_at).num_days()))
        .collect();

    let avg_delivery_days = if delivery_days.is_empty() {
        Decimal::ZERO
    } else {
        (Decimal::from(delivery_days.iter().sum::<i64>())
            / Decimal::from(delivery_days.len() as u64))
        .round_dp(2)
    };

    let total_value = orders
        .iter()
        .map(|o| o.total_cost)
        .sum::<Decimal>()
        .round_dp(2);

    SupplierPerformance {
        total_orders,
        fulfilled_orders,
        fulfillment_rate,
        avg_delivery_days,
        total_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{OrderPriority, PurchaseOrderId};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use rxstock_core::AggregateId;
    use rxstock_inventory::MedicineId;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap()
    }

    fn order(status: OrderStatus, delivery_days: Option<i64>, total: Decimal) -> PurchaseOrder {
        let mut o = PurchaseOrder::new(
            PurchaseOrderId::new(AggregateId::new()),
            MedicineId::new(AggregateId::new()),
            "Metformin 850mg",
            1,
            total,
            OrderPriority::Medium,
            None,
            created_at(),
        );
        o.status = status;
        o.delivered_at = delivery_days.map(|d| created_at() + Duration::days(d));
        o
    }

    #[test]
    fn empty_history_yields_all_zero_metrics() {
        let perf = compute_supplier_performance(&[]);
        assert_eq!(perf.total_orders, 0);
        assert_eq!(perf.fulfilled_orders, 0);
        assert_eq!(perf.fulfillment_rate, Decimal::ZERO);
        assert_eq!(perf.avg_delivery_days, Decimal::ZERO);
        assert_eq!(perf.total_value, Decimal::ZERO);
    }

    #[test]
    fn mixed_history_rounds_to_two_decimal_places() {
        let orders = vec![
            order(OrderStatus::Received, Some(3), dec!(100)),
            order(OrderStatus::Received, Some(4), dec!(250.50)),
            order(OrderStatus::Cancelled, None, dec!(80)),
        ];

        let perf = compute_supplier_performance(&orders);
        assert_eq!(perf.total_orders, 3);
        assert_eq!(perf.fulfilled_orders, 2);
        assert_eq!(perf.fulfillment_rate, dec!(66.67));
        assert_eq!(perf.avg_delivery_days, dec!(3.50));
        assert_eq!(perf.total_value, dec!(430.50));
    }

    #[test]
    fn received_order_without_delivered_at_is_excluded_from_the_average_only() {
        let orders = vec![
            order(OrderStatus::Received, Some(6), dec!(10)),
            order(OrderStatus::Received, None, dec!(10)),
        ];

        let perf = compute_supplier_performance(&orders);
        assert_eq!(perf.total_orders, 2);
        assert_eq!(perf.fulfilled_orders, 2);
        assert_eq!(perf.fulfillment_rate, dec!(100.00));
        // Only the order with a timestamp contributes.
        assert_eq!(perf.avg_delivery_days, dec!(6.00));
    }

    #[test]
    fn pending_only_history_has_zero_rate_without_dividing_by_zero() {
        let orders = vec![order(OrderStatus::Pending, None, dec!(40))];
        let perf = compute_supplier_performance(&orders);
        assert_eq!(perf.fulfillment_rate, Decimal::ZERO);
        assert_eq!(perf.avg_delivery_days, Decimal::ZERO);
        assert_eq!(perf.total_value, dec!(40.00));
    }
}
