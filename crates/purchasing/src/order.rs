use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rxstock_audit::{AuditEvent, AuditLog};
use rxstock_core::{Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult};
use rxstock_inventory::MedicineId;
use rxstock_suppliers::SupplierId;

/// Purchase order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseOrderId(pub AggregateId);

impl PurchaseOrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PurchaseOrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Purchase order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Approved,
    Ordered,
    Shipped,
    Received,
    Cancelled,
}

impl OrderStatus {
    /// Terminal orders are read-only history.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Received | OrderStatus::Cancelled)
    }

    /// The single allowed forward step, if any.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Approved),
            OrderStatus::Approved => Some(OrderStatus::Ordered),
            OrderStatus::Ordered => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Received),
            OrderStatus::Received | OrderStatus::Cancelled => None,
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Approved => write!(f, "approved"),
            OrderStatus::Ordered => write!(f, "ordered"),
            OrderStatus::Shipped => write!(f, "shipped"),
            OrderStatus::Received => write!(f, "received"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl core::str::FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "approved" => Ok(OrderStatus::Approved),
            "ordered" => Ok(OrderStatus::Ordered),
            "shipped" => Ok(OrderStatus::Shipped),
            "received" => Ok(OrderStatus::Received),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "unrecognized order status: {other}"
            ))),
        }
    }
}

/// Replenishment urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderPriority {
    Low,
    Medium,
    High,
}

impl core::fmt::Display for OrderPriority {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OrderPriority::Low => write!(f, "low"),
            OrderPriority::Medium => write!(f, "medium"),
            OrderPriority::High => write!(f, "high"),
        }
    }
}

/// `unit_cost × quantity`, rounded to 2 decimal places.
///
/// Always recomputed; a `total_cost` arriving in a snapshot is never
/// trusted.
pub fn total_cost(quantity_ordered: i64, unit_cost: Decimal) -> Decimal {
    (unit_cost * Decimal::from(quantity_ordered)).round_dp(2)
}

/// Purchase order snapshot record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: PurchaseOrderId,
    pub medicine_id: MedicineId,
    pub medicine_name: String,
    pub quantity_ordered: i64,
    pub supplier_id: Option<SupplierId>,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
    pub priority: OrderPriority,
    pub status: OrderStatus,
    pub notes: Option<String>,
    /// Delivery fields, set on transition into `received` and immutable
    /// afterwards.
    pub tracking_number: Option<String>,
    pub delivered_quantity: Option<i64>,
    pub delivery_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub version: u64,
}

impl PurchaseOrder {
    /// Build a fresh `pending` order with its total recomputed.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: PurchaseOrderId,
        medicine_id: MedicineId,
        medicine_name: impl Into<String>,
        quantity_ordered: i64,
        unit_cost: Decimal,
        priority: OrderPriority,
        supplier_id: Option<SupplierId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            medicine_id,
            medicine_name: medicine_name.into(),
            quantity_ordered,
            supplier_id,
            unit_cost,
            total_cost: total_cost(quantity_ordered, unit_cost),
            priority,
            status: OrderStatus::Pending,
            notes: None,
            tracking_number: None,
            delivered_quantity: None,
            delivery_notes: None,
            created_at,
            delivered_at: None,
            version: 0,
        }
    }
}

impl AggregateRoot for PurchaseOrder {
    type Id = PurchaseOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: ApproveOrder (pending → approved).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveOrder {
    pub order_id: PurchaseOrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: PlaceOrder (approved → ordered, i.e. sent to the supplier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub order_id: PurchaseOrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: MarkOrderShipped (ordered → shipped).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkOrderShipped {
    pub order_id: PurchaseOrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReceiveOrder (shipped → received). `occurred_at` becomes
/// `delivered_at`; the delivery fields are attached once and frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveOrder {
    pub order_id: PurchaseOrderId,
    pub tracking_number: Option<String>,
    pub delivered_quantity: Option<i64>,
    pub delivery_notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CancelOrder (any non-received, non-terminal state → cancelled).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrder {
    pub order_id: PurchaseOrderId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AmendOrder (edit quantity/unit cost/notes while non-terminal;
/// the total is recomputed, never taken from input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmendOrder {
    pub order_id: PurchaseOrderId,
    pub quantity_ordered: Option<i64>,
    pub unit_cost: Option<Decimal>,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOrderCommand {
    Approve(ApproveOrder),
    Place(PlaceOrder),
    MarkShipped(MarkOrderShipped),
    Receive(ReceiveOrder),
    Cancel(CancelOrder),
    Amend(AmendOrder),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOrderEvent {
    Approved {
        order_id: PurchaseOrderId,
        occurred_at: DateTime<Utc>,
    },
    Placed {
        order_id: PurchaseOrderId,
        occurred_at: DateTime<Utc>,
    },
    Shipped {
        order_id: PurchaseOrderId,
        occurred_at: DateTime<Utc>,
    },
    Received {
        order_id: PurchaseOrderId,
        tracking_number: Option<String>,
        delivered_quantity: Option<i64>,
        delivery_notes: Option<String>,
        occurred_at: DateTime<Utc>,
    },
    Cancelled {
        order_id: PurchaseOrderId,
        reason: Option<String>,
        occurred_at: DateTime<Utc>,
    },
    Amended {
        order_id: PurchaseOrderId,
        quantity_ordered: i64,
        unit_cost: Decimal,
        total_cost: Decimal,
        notes: Option<String>,
        occurred_at: DateTime<Utc>,
    },
}

impl AuditEvent for PurchaseOrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PurchaseOrderEvent::Approved { .. } => "purchasing.order.approved",
            PurchaseOrderEvent::Placed { .. } => "purchasing.order.placed",
            PurchaseOrderEvent::Shipped { .. } => "purchasing.order.shipped",
            PurchaseOrderEvent::Received { .. } => "purchasing.order.received",
            PurchaseOrderEvent::Cancelled { .. } => "purchasing.order.cancelled",
            PurchaseOrderEvent::Amended { .. } => "purchasing.order.amended",
        }
    }

    fn schema_version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PurchaseOrderEvent::Approved { occurred_at, .. }
            | PurchaseOrderEvent::Placed { occurred_at, .. }
            | PurchaseOrderEvent::Shipped { occurred_at, .. }
            | PurchaseOrderEvent::Received { occurred_at, .. }
            | PurchaseOrderEvent::Cancelled { occurred_at, .. }
            | PurchaseOrderEvent::Amended { occurred_at, .. } => *occurred_at,
        }
    }
}

impl Aggregate for PurchaseOrder {
    type Command = PurchaseOrderCommand;
    type Event = PurchaseOrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            PurchaseOrderEvent::Approved { .. } => {
                self.status = OrderStatus::Approved;
            }
            PurchaseOrderEvent::Placed { .. } => {
                self.status = OrderStatus::Ordered;
            }
            PurchaseOrderEvent::Shipped { .. } => {
                self.status = OrderStatus::Shipped;
            }
            PurchaseOrderEvent::Received {
                tracking_number,
                delivered_quantity,
                delivery_notes,
                occurred_at,
                ..
            } => {
                self.status = OrderStatus::Received;
                self.delivered_at = Some(*occurred_at);
                self.tracking_number = tracking_number.clone();
                self.delivered_quantity = *delivered_quantity;
                self.delivery_notes = delivery_notes.clone();
            }
            PurchaseOrderEvent::Cancelled { .. } => {
                self.status = OrderStatus::Cancelled;
            }
            PurchaseOrderEvent::Amended {
                quantity_ordered,
                unit_cost,
                total_cost,
                notes,
                ..
            } => {
                self.quantity_ordered = *quantity_ordered;
                self.unit_cost = *unit_cost;
                self.total_cost = *total_cost;
                if notes.is_some() {
                    self.notes = notes.clone();
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            PurchaseOrderCommand::Approve(cmd) => self.handle_approve(cmd),
            PurchaseOrderCommand::Place(cmd) => self.handle_place(cmd),
            PurchaseOrderCommand::MarkShipped(cmd) => self.handle_mark_shipped(cmd),
            PurchaseOrderCommand::Receive(cmd) => self.handle_receive(cmd),
            PurchaseOrderCommand::Cancel(cmd) => self.handle_cancel(cmd),
            PurchaseOrderCommand::Amend(cmd) => self.handle_amend(cmd),
        }
    }
}

impl PurchaseOrder {
    fn ensure_order_id(&self, order_id: PurchaseOrderId) -> DomainResult<()> {
        if self.id != order_id {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    /// Forward steps move one state at a time; skipping and moving backward
    /// are both rejected with the offending source/target pair.
    fn ensure_step(&self, target: OrderStatus) -> DomainResult<()> {
        if self.status.next() == Some(target) {
            Ok(())
        } else {
            Err(DomainError::invalid_transition(self.status, target))
        }
    }

    fn handle_approve(&self, cmd: &ApproveOrder) -> DomainResult<Vec<PurchaseOrderEvent>> {
        self.ensure_order_id(cmd.order_id)?;
        self.ensure_step(OrderStatus::Approved)?;

        Ok(vec![PurchaseOrderEvent::Approved {
            order_id: cmd.order_id,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_place(&self, cmd: &PlaceOrder) -> DomainResult<Vec<PurchaseOrderEvent>> {
        self.ensure_order_id(cmd.order_id)?;
        self.ensure_step(OrderStatus::Ordered)?;

        Ok(vec![PurchaseOrderEvent::Placed {
            order_id: cmd.order_id,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_mark_shipped(&self, cmd: &MarkOrderShipped) -> DomainResult<Vec<PurchaseOrderEvent>> {
        self.ensure_order_id(cmd.order_id)?;
        self.ensure_step(OrderStatus::Shipped)?;

        Ok(vec![PurchaseOrderEvent::Shipped {
            order_id: cmd.order_id,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_receive(&self, cmd: &ReceiveOrder) -> DomainResult<Vec<PurchaseOrderEvent>> {
        self.ensure_order_id(cmd.order_id)?;
        self.ensure_step(OrderStatus::Received)?;

        if cmd.delivered_quantity.is_some_and(|q| q < 0) {
            return Err(DomainError::validation(
                "delivered quantity cannot be negative",
            ));
        }

        Ok(vec![PurchaseOrderEvent::Received {
            order_id: cmd.order_id,
            tracking_number: cmd.tracking_number.clone(),
            delivered_quantity: cmd.delivered_quantity,
            delivery_notes: cmd.delivery_notes.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_cancel(&self, cmd: &CancelOrder) -> DomainResult<Vec<PurchaseOrderEvent>> {
        self.ensure_order_id(cmd.order_id)?;

        if self.status.is_terminal() {
            return Err(DomainError::invalid_transition(
                self.status,
                OrderStatus::Cancelled,
            ));
        }

        Ok(vec![PurchaseOrderEvent::Cancelled {
            order_id: cmd.order_id,
            reason: cmd.reason.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_amend(&self, cmd: &AmendOrder) -> DomainResult<Vec<PurchaseOrderEvent>> {
        self.ensure_order_id(cmd.order_id)?;

        if self.status.is_terminal() {
            return Err(DomainError::invalid_transition(self.status, "amend"));
        }

        let quantity = cmd.quantity_ordered.unwrap_or(self.quantity_ordered);
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        let unit_cost = cmd.unit_cost.unwrap_or(self.unit_cost);
        if unit_cost < Decimal::ZERO {
            return Err(DomainError::validation("unit cost cannot be negative"));
        }

        Ok(vec![PurchaseOrderEvent::Amended {
            order_id: cmd.order_id,
            quantity_ordered: quantity,
            unit_cost,
            total_cost: total_cost(quantity, unit_cost),
            notes: cmd.notes.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }
}

/// One logical read-modify-write unit: validate, mutate the order, append
/// the audit event. On error nothing is touched.
pub fn transition(
    order: &mut PurchaseOrder,
    log: &mut AuditLog<PurchaseOrderEvent>,
    command: &PurchaseOrderCommand,
) -> DomainResult<PurchaseOrderEvent> {
    let mut events = order.handle(command)?;
    // Purchase order commands emit exactly one event.
    let event = events
        .pop()
        .ok_or_else(|| DomainError::validation("order command emitted no event"))?;

    order.apply(&event);
    log.append(event.clone());
    Ok(event)
}
