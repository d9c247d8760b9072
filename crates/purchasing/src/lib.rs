//! `rxstock-purchasing` — purchase order lifecycle and supplier metrics.
//!
//! Orders move `pending → approved → ordered → shipped → received`, with
//! `cancelled` reachable from every non-received state. Once terminal
//! (`received`/`cancelled`) an order is immutable history; the performance
//! calculator reads that history back into supplier metrics.

pub mod order;
pub mod performance;

pub use order::{
    AmendOrder, ApproveOrder, CancelOrder, MarkOrderShipped, OrderPriority, OrderStatus,
    PlaceOrder, PurchaseOrder, PurchaseOrderCommand, PurchaseOrderEvent, PurchaseOrderId,
    ReceiveOrder, total_cost, transition,
};
pub use performance::{SupplierPerformance, compute_supplier_performance};
