use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rxstock_core::{AggregateId, AggregateRoot, DomainError};
use rxstock_suppliers::SupplierId;

/// Medicine identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedicineId(pub AggregateId);

impl MedicineId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for MedicineId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Persisted availability status of a medicine.
///
/// This is the single source of truth for whether a medicine may be
/// dispensed. Stock and expiry classifications are derived views over it,
/// never the other way around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicineStatus {
    Active,
    Quarantined,
    Expired,
    Inactive,
}

impl core::fmt::Display for MedicineStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MedicineStatus::Active => write!(f, "active"),
            MedicineStatus::Quarantined => write!(f, "quarantined"),
            MedicineStatus::Expired => write!(f, "expired"),
            MedicineStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl core::str::FromStr for MedicineStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(MedicineStatus::Active),
            "quarantined" => Ok(MedicineStatus::Quarantined),
            "expired" => Ok(MedicineStatus::Expired),
            "inactive" => Ok(MedicineStatus::Inactive),
            other => Err(DomainError::validation(format!(
                "unrecognized medicine status: {other}"
            ))),
        }
    }
}

/// Medicine snapshot record.
///
/// Handed to the engine by the host store; threshold fields left `None`
/// resolve against [`crate::policy::ThresholdPolicy`] defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medicine {
    pub id: MedicineId,
    pub name: String,
    pub manufacturer: Option<String>,
    pub batch_number: Option<String>,
    /// Units on hand; negative snapshot values are clamped by classifiers.
    pub stock_quantity: i64,
    pub min_stock_level: Option<i64>,
    pub reorder_point: Option<i64>,
    pub max_stock_level: Option<i64>,
    pub cost_price: Decimal,
    pub selling_price: Decimal,
    pub expiry_date: Option<NaiveDate>,
    pub rack_location: Option<String>,
    /// Preferred supplier, carried onto generated purchase orders.
    pub supplier_id: Option<SupplierId>,
    pub status: MedicineStatus,
    pub version: u64,
}

impl Medicine {
    /// Build a minimal active medicine; callers fill in the rest.
    pub fn new(id: MedicineId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            manufacturer: None,
            batch_number: None,
            stock_quantity: 0,
            min_stock_level: None,
            reorder_point: None,
            max_stock_level: None,
            cost_price: Decimal::ZERO,
            selling_price: Decimal::ZERO,
            expiry_date: None,
            rack_location: None,
            supplier_id: None,
            status: MedicineStatus::Active,
            version: 0,
        }
    }
}

impl AggregateRoot for Medicine {
    type Id = MedicineId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
