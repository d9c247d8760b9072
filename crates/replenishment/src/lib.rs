//! `rxstock-replenishment` — reorder planning over a medicine snapshot.
//!
//! The planner classifies every medicine, turns the low-stock ones into
//! plan rows or pending purchase orders, and hands both back to the caller
//! to persist. It holds no state between invocations.

pub mod planner;

pub use planner::{ReplenishmentPlan, bulk_plan, plan, priority_for, suggested_quantity};
