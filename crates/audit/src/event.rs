use chrono::{DateTime, Utc};

/// A domain-agnostic audit event.
///
/// Audit events are:
/// - **immutable** (treat them as facts)
/// - **versioned** (schema evolution)
/// - designed to be **append-only**
pub trait AuditEvent: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "inventory.medicine.quarantined").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn schema_version(&self) -> u32;

    /// When the event occurred (business time, injected by the caller).
    fn occurred_at(&self) -> DateTime<Utc>;
}
