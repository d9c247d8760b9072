//! `rxstock-audit` — append-only audit trail primitives.
//!
//! State machines in the inventory and purchasing crates record every
//! transition as an audit event. This crate owns the event trait and the
//! append-only container; persistence of the entries is the caller's job.

pub mod event;
pub mod log;

pub use event::AuditEvent;
pub use log::AuditLog;
