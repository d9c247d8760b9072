use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rxstock_audit::AuditEvent;
use rxstock_core::{Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult};

/// Highest allowed supplier rating (inclusive).
pub const MAX_SUPPLIER_RATING: u8 = 5;

/// Supplier identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierId(pub AggregateId);

impl SupplierId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for SupplierId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Supplier status lifecycle.
///
/// `Inactive` is the soft-delete state; the record itself survives so that
/// purchase orders referencing it stay resolvable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    Active,
    Inactive,
}

impl core::fmt::Display for SupplierStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SupplierStatus::Active => write!(f, "active"),
            SupplierStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl core::str::FromStr for SupplierStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(SupplierStatus::Active),
            "inactive" => Ok(SupplierStatus::Inactive),
            other => Err(DomainError::validation(format!(
                "unrecognized supplier status: {other}"
            ))),
        }
    }
}

/// Contact information for a supplier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Supplier snapshot record.
///
/// The engine receives these from the host store; it never loads or saves
/// them itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub contact: ContactInfo,
    /// 0–5 inclusive.
    pub rating: u8,
    pub status: SupplierStatus,
    pub version: u64,
}

impl Supplier {
    /// Build a validated supplier record in `active` status.
    pub fn new(id: SupplierId, name: impl Into<String>, rating: u8) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("supplier name cannot be empty"));
        }
        validate_rating(rating)?;

        Ok(Self {
            id,
            name,
            contact: ContactInfo::default(),
            rating,
            status: SupplierStatus::Active,
            version: 0,
        })
    }

    /// Invariant helper: whether this supplier may be ordered from.
    pub fn can_transact(&self) -> bool {
        self.status == SupplierStatus::Active
    }
}

fn validate_rating(rating: u8) -> DomainResult<()> {
    if rating > MAX_SUPPLIER_RATING {
        return Err(DomainError::validation(format!(
            "rating must be between 0 and {MAX_SUPPLIER_RATING}, got {rating}"
        )));
    }
    Ok(())
}

impl AggregateRoot for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: UpdateSupplier (fields left `None` are kept).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSupplier {
    pub supplier_id: SupplierId,
    pub name: Option<String>,
    pub contact: Option<ContactInfo>,
    pub rating: Option<u8>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeactivateSupplier (soft delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivateSupplier {
    pub supplier_id: SupplierId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReactivateSupplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactivateSupplier {
    pub supplier_id: SupplierId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierCommand {
    Update(UpdateSupplier),
    Deactivate(DeactivateSupplier),
    Reactivate(ReactivateSupplier),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierEvent {
    Updated {
        supplier_id: SupplierId,
        name: String,
        contact: ContactInfo,
        rating: u8,
        occurred_at: DateTime<Utc>,
    },
    Deactivated {
        supplier_id: SupplierId,
        reason: Option<String>,
        occurred_at: DateTime<Utc>,
    },
    Reactivated {
        supplier_id: SupplierId,
        occurred_at: DateTime<Utc>,
    },
}

impl AuditEvent for SupplierEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SupplierEvent::Updated { .. } => "suppliers.supplier.updated",
            SupplierEvent::Deactivated { .. } => "suppliers.supplier.deactivated",
            SupplierEvent::Reactivated { .. } => "suppliers.supplier.reactivated",
        }
    }

    fn schema_version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SupplierEvent::Updated { occurred_at, .. }
            | SupplierEvent::Deactivated { occurred_at, .. }
            | SupplierEvent::Reactivated { occurred_at, .. } => *occurred_at,
        }
    }
}

impl Aggregate for Supplier {
    type Command = SupplierCommand;
    type Event = SupplierEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            SupplierEvent::Updated {
                name,
                contact,
                rating,
                ..
            } => {
                self.name = name.clone();
                self.contact = contact.clone();
                self.rating = *rating;
            }
            SupplierEvent::Deactivated { .. } => {
                self.status = SupplierStatus::Inactive;
            }
            SupplierEvent::Reactivated { .. } => {
                self.status = SupplierStatus::Active;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SupplierCommand::Update(cmd) => self.handle_update(cmd),
            SupplierCommand::Deactivate(cmd) => self.handle_deactivate(cmd),
            SupplierCommand::Reactivate(cmd) => self.handle_reactivate(cmd),
        }
    }
}

impl Supplier {
    fn ensure_supplier_id(&self, supplier_id: SupplierId) -> DomainResult<()> {
        if self.id != supplier_id {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    fn handle_update(&self, cmd: &UpdateSupplier) -> DomainResult<Vec<SupplierEvent>> {
        self.ensure_supplier_id(cmd.supplier_id)?;

        let new_name = cmd.name.clone().unwrap_or_else(|| self.name.clone());
        if new_name.trim().is_empty() {
            return Err(DomainError::validation("supplier name cannot be empty"));
        }
        let new_rating = cmd.rating.unwrap_or(self.rating);
        validate_rating(new_rating)?;
        let new_contact = cmd.contact.clone().unwrap_or_else(|| self.contact.clone());

        Ok(vec![SupplierEvent::Updated {
            supplier_id: cmd.supplier_id,
            name: new_name,
            contact: new_contact,
            rating: new_rating,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_deactivate(&self, cmd: &DeactivateSupplier) -> DomainResult<Vec<SupplierEvent>> {
        self.ensure_supplier_id(cmd.supplier_id)?;

        if self.status == SupplierStatus::Inactive {
            return Err(DomainError::invalid_transition(self.status, "deactivate"));
        }

        Ok(vec![SupplierEvent::Deactivated {
            supplier_id: cmd.supplier_id,
            reason: cmd.reason.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_reactivate(&self, cmd: &ReactivateSupplier) -> DomainResult<Vec<SupplierEvent>> {
        self.ensure_supplier_id(cmd.supplier_id)?;

        if self.status == SupplierStatus::Active {
            return Err(DomainError::invalid_transition(self.status, "reactivate"));
        }

        Ok(vec![SupplierEvent::Reactivated {
            supplier_id: cmd.supplier_id,
            occurred_at: cmd.occurred_at,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_supplier_id() -> SupplierId {
        SupplierId::new(AggregateId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()
    }

    fn test_supplier() -> Supplier {
        Supplier::new(test_supplier_id(), "MediSource Ltd", 4).unwrap()
    }

    #[test]
    fn new_supplier_rejects_blank_name_and_bad_rating() {
        let err = Supplier::new(test_supplier_id(), "   ", 3).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = Supplier::new(test_supplier_id(), "MediSource Ltd", 6).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn deactivate_is_a_soft_status_change() {
        let mut supplier = test_supplier();
        let cmd = SupplierCommand::Deactivate(DeactivateSupplier {
            supplier_id: supplier.id,
            reason: Some("duplicate vendor record".to_string()),
            occurred_at: test_time(),
        });

        let events = supplier.handle(&cmd).unwrap();
        assert_eq!(events.len(), 1);
        supplier.apply(&events[0]);

        // The record is still here, only its status changed.
        assert_eq!(supplier.status, SupplierStatus::Inactive);
        assert_eq!(supplier.name, "MediSource Ltd");
        assert!(!supplier.can_transact());
        assert_eq!(supplier.version, 1);
    }

    #[test]
    fn deactivate_twice_is_an_invalid_transition() {
        let mut supplier = test_supplier();
        let cmd = SupplierCommand::Deactivate(DeactivateSupplier {
            supplier_id: supplier.id,
            reason: None,
            occurred_at: test_time(),
        });
        let events = supplier.handle(&cmd).unwrap();
        supplier.apply(&events[0]);

        let err = supplier.handle(&cmd).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                from: "inactive".to_string(),
                requested: "deactivate".to_string(),
            }
        );
    }

    #[test]
    fn reactivate_returns_supplier_to_active() {
        let mut supplier = test_supplier();
        let deactivate = SupplierCommand::Deactivate(DeactivateSupplier {
            supplier_id: supplier.id,
            reason: None,
            occurred_at: test_time(),
        });
        let events = supplier.handle(&deactivate).unwrap();
        supplier.apply(&events[0]);

        let reactivate = SupplierCommand::Reactivate(ReactivateSupplier {
            supplier_id: supplier.id,
            occurred_at: test_time(),
        });
        let events = supplier.handle(&reactivate).unwrap();
        supplier.apply(&events[0]);

        assert_eq!(supplier.status, SupplierStatus::Active);
        assert!(supplier.can_transact());
    }

    #[test]
    fn update_rejects_rating_above_five() {
        let supplier = test_supplier();
        let cmd = SupplierCommand::Update(UpdateSupplier {
            supplier_id: supplier.id,
            name: None,
            contact: None,
            rating: Some(9),
            occurred_at: test_time(),
        });

        let err = supplier.handle(&cmd).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn command_with_wrong_id_is_not_found() {
        let supplier = test_supplier();
        let cmd = SupplierCommand::Deactivate(DeactivateSupplier {
            supplier_id: test_supplier_id(),
            reason: None,
            occurred_at: test_time(),
        });

        assert_eq!(supplier.handle(&cmd).unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn status_parses_and_rejects_unknown_strings() {
        assert_eq!(
            " Active ".parse::<SupplierStatus>().unwrap(),
            SupplierStatus::Active
        );
        assert!(matches!(
            "deleted".parse::<SupplierStatus>().unwrap_err(),
            DomainError::Validation(_)
        ));
    }
}
