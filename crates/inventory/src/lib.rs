//! `rxstock-inventory` — medicine records, stock/expiry classification and
//! the quarantine state machine.
//!
//! Everything here is a pure transformation over snapshot records: the
//! caller supplies the medicines and a "now" timestamp, and gets back
//! derived statuses, updated records and audit entries to persist. The
//! persisted `Medicine::status` is the single source of truth for
//! availability; stock and expiry classifications are derived views and are
//! never written back as authoritative state.

pub mod expiry;
pub mod medicine;
pub mod policy;
pub mod quarantine;
pub mod stock;

pub use expiry::{ExpiryAssessment, ExpiryStatus, assess_medicine_expiry, classify_expiry};
pub use medicine::{Medicine, MedicineId, MedicineStatus};
pub use policy::ThresholdPolicy;
pub use quarantine::{
    MarkMedicineExpired, QuarantineAction, QuarantineCommand, QuarantineLogEntry,
    QuarantineMedicine, QuarantineReason, ReleaseMedicine, transition,
};
pub use stock::{StockStatus, classify_medicine_stock, classify_stock};
