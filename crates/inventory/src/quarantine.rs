//! Quarantine state machine over [`Medicine`].
//!
//! Transitions: active → quarantined (quarantine), quarantined → active
//! (release), active|quarantined → expired (mark_expired). `expired` is
//! terminal here; there is no reactivate path. Every transition appends one
//! [`QuarantineLogEntry`] — the decision (`handle`) and the mutation
//! (`apply`) are split, so a rejected command has touched neither the
//! status nor the log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rxstock_audit::{AuditEvent, AuditLog};
use rxstock_core::{Aggregate, DomainError, DomainResult};

use crate::medicine::{Medicine, MedicineId, MedicineStatus};

/// Why a medicine was quarantined, released or expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuarantineReason {
    QualityIssue,
    DamagedPackaging,
    TemperatureExposure,
    Contamination,
    Expired,
    Recall,
    RegulatoryIssue,
    CustomerComplaint,
    Other,
}

impl core::fmt::Display for QuarantineReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            QuarantineReason::QualityIssue => "quality_issue",
            QuarantineReason::DamagedPackaging => "damaged_packaging",
            QuarantineReason::TemperatureExposure => "temperature_exposure",
            QuarantineReason::Contamination => "contamination",
            QuarantineReason::Expired => "expired",
            QuarantineReason::Recall => "recall",
            QuarantineReason::RegulatoryIssue => "regulatory_issue",
            QuarantineReason::CustomerComplaint => "customer_complaint",
            QuarantineReason::Other => "other",
        };
        write!(f, "{s}")
    }
}

impl core::str::FromStr for QuarantineReason {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quality_issue" => Ok(QuarantineReason::QualityIssue),
            "damaged_packaging" => Ok(QuarantineReason::DamagedPackaging),
            "temperature_exposure" => Ok(QuarantineReason::TemperatureExposure),
            "contamination" => Ok(QuarantineReason::Contamination),
            "expired" => Ok(QuarantineReason::Expired),
            "recall" => Ok(QuarantineReason::Recall),
            "regulatory_issue" => Ok(QuarantineReason::RegulatoryIssue),
            "customer_complaint" => Ok(QuarantineReason::CustomerComplaint),
            "other" => Ok(QuarantineReason::Other),
            other => Err(DomainError::validation(format!(
                "unrecognized quarantine reason: {other}"
            ))),
        }
    }
}

/// What a log entry records having happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuarantineAction {
    Quarantined,
    Released,
    Expired,
}

/// One append-only audit record per transition. Never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarantineLogEntry {
    pub medicine_id: MedicineId,
    pub action: QuarantineAction,
    pub reason: QuarantineReason,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent for QuarantineLogEntry {
    fn event_type(&self) -> &'static str {
        match self.action {
            QuarantineAction::Quarantined => "inventory.medicine.quarantined",
            QuarantineAction::Released => "inventory.medicine.released",
            QuarantineAction::Expired => "inventory.medicine.expired",
        }
    }

    fn schema_version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// Command: QuarantineMedicine (active → quarantined).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarantineMedicine {
    pub medicine_id: MedicineId,
    pub reason: QuarantineReason,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReleaseMedicine (quarantined → active).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseMedicine {
    pub medicine_id: MedicineId,
    pub reason: QuarantineReason,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: MarkMedicineExpired (active|quarantined → expired).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkMedicineExpired {
    pub medicine_id: MedicineId,
    pub reason: QuarantineReason,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuarantineCommand {
    Quarantine(QuarantineMedicine),
    Release(ReleaseMedicine),
    MarkExpired(MarkMedicineExpired),
}

impl Aggregate for Medicine {
    type Command = QuarantineCommand;
    type Event = QuarantineLogEntry;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event.action {
            QuarantineAction::Quarantined => self.status = MedicineStatus::Quarantined,
            QuarantineAction::Released => self.status = MedicineStatus::Active,
            QuarantineAction::Expired => self.status = MedicineStatus::Expired,
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            QuarantineCommand::Quarantine(cmd) => self.handle_quarantine(cmd),
            QuarantineCommand::Release(cmd) => self.handle_release(cmd),
            QuarantineCommand::MarkExpired(cmd) => self.handle_mark_expired(cmd),
        }
    }
}

impl Medicine {
    fn ensure_medicine_id(&self, medicine_id: MedicineId) -> DomainResult<()> {
        if self.id != medicine_id {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    fn handle_quarantine(&self, cmd: &QuarantineMedicine) -> DomainResult<Vec<QuarantineLogEntry>> {
        self.ensure_medicine_id(cmd.medicine_id)?;

        if self.status != MedicineStatus::Active {
            return Err(DomainError::invalid_transition(self.status, "quarantine"));
        }

        Ok(vec![QuarantineLogEntry {
            medicine_id: cmd.medicine_id,
            action: QuarantineAction::Quarantined,
            reason: cmd.reason,
            notes: cmd.notes.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_release(&self, cmd: &ReleaseMedicine) -> DomainResult<Vec<QuarantineLogEntry>> {
        self.ensure_medicine_id(cmd.medicine_id)?;

        if self.status != MedicineStatus::Quarantined {
            return Err(DomainError::invalid_transition(self.status, "release"));
        }

        Ok(vec![QuarantineLogEntry {
            medicine_id: cmd.medicine_id,
            action: QuarantineAction::Released,
            reason: cmd.reason,
            notes: cmd.notes.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_mark_expired(
        &self,
        cmd: &MarkMedicineExpired,
    ) -> DomainResult<Vec<QuarantineLogEntry>> {
        self.ensure_medicine_id(cmd.medicine_id)?;

        if !matches!(
            self.status,
            MedicineStatus::Active | MedicineStatus::Quarantined
        ) {
            return Err(DomainError::invalid_transition(self.status, "mark_expired"));
        }

        Ok(vec![QuarantineLogEntry {
            medicine_id: cmd.medicine_id,
            action: QuarantineAction::Expired,
            reason: cmd.reason,
            notes: cmd.notes.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }
}

/// One logical read-modify-write unit: validate the command, write the new
/// status onto the medicine and append the log entry. On error neither the
/// medicine nor the log is touched.
pub fn transition(
    medicine: &mut Medicine,
    log: &mut AuditLog<QuarantineLogEntry>,
    command: &QuarantineCommand,
) -> DomainResult<QuarantineLogEntry> {
    let mut events = medicine.handle(command)?;
    // Quarantine commands emit exactly one entry.
    let entry = events
        .pop()
        .ok_or_else(|| DomainError::validation("quarantine command emitted no event"))?;

    medicine.apply(&entry);
    log.append(entry.clone());
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rxstock_core::AggregateId;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 2, 12, 0, 0).unwrap()
    }

    fn medicine_with_status(status: MedicineStatus) -> Medicine {
        let mut m = Medicine::new(MedicineId::new(AggregateId::new()), "Cefalexin 250mg");
        m.status = status;
        m
    }

    fn quarantine_cmd(id: MedicineId) -> QuarantineCommand {
        QuarantineCommand::Quarantine(QuarantineMedicine {
            medicine_id: id,
            reason: QuarantineReason::DamagedPackaging,
            notes: Some("crushed blister packs in delivery".to_string()),
            occurred_at: test_time(),
        })
    }

    fn release_cmd(id: MedicineId) -> QuarantineCommand {
        QuarantineCommand::Release(ReleaseMedicine {
            medicine_id: id,
            reason: QuarantineReason::QualityIssue,
            notes: Some("inspection passed".to_string()),
            occurred_at: test_time(),
        })
    }

    fn expire_cmd(id: MedicineId) -> QuarantineCommand {
        QuarantineCommand::MarkExpired(MarkMedicineExpired {
            medicine_id: id,
            reason: QuarantineReason::Expired,
            notes: None,
            occurred_at: test_time(),
        })
    }

    #[test]
    fn quarantine_moves_active_medicine_and_logs_once() {
        let mut m = medicine_with_status(MedicineStatus::Active);
        let mut log = AuditLog::new();

        let id = m.id;
        let entry = transition(&mut m, &mut log, &quarantine_cmd(id)).unwrap();

        assert_eq!(m.status, MedicineStatus::Quarantined);
        assert_eq!(m.version, 1);
        assert_eq!(log.len(), 1);
        assert_eq!(entry.action, QuarantineAction::Quarantined);
        assert_eq!(entry.event_type(), "inventory.medicine.quarantined");
        assert_eq!(log.last(), Some(&entry));
    }

    #[test]
    fn quarantine_then_release_round_trips_with_exactly_two_entries() {
        let mut m = medicine_with_status(MedicineStatus::Active);
        let mut log = AuditLog::new();

        let id = m.id;
        transition(&mut m, &mut log, &quarantine_cmd(id)).unwrap();
        transition(&mut m, &mut log, &release_cmd(id)).unwrap();

        assert_eq!(m.status, MedicineStatus::Active);
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].action, QuarantineAction::Quarantined);
        assert_eq!(log.entries()[1].action, QuarantineAction::Released);
    }

    #[test]
    fn disallowed_pairs_fail_without_partial_mutation() {
        // (source status, command builder) pairs outside the allowed set.
        let cases: Vec<(MedicineStatus, fn(MedicineId) -> QuarantineCommand, &str)> = vec![
            (MedicineStatus::Quarantined, quarantine_cmd, "quarantine"),
            (MedicineStatus::Expired, quarantine_cmd, "quarantine"),
            (MedicineStatus::Inactive, quarantine_cmd, "quarantine"),
            (MedicineStatus::Active, release_cmd, "release"),
            (MedicineStatus::Expired, release_cmd, "release"),
            (MedicineStatus::Inactive, release_cmd, "release"),
            (MedicineStatus::Expired, expire_cmd, "mark_expired"),
            (MedicineStatus::Inactive, expire_cmd, "mark_expired"),
        ];

        for (status, build, requested) in cases {
            let mut m = medicine_with_status(status);
            let mut log = AuditLog::new();
            let before = m.clone();

            let id = m.id;
            let err = transition(&mut m, &mut log, &build(id)).unwrap_err();

            assert_eq!(
                err,
                DomainError::InvalidTransition {
                    from: status.to_string(),
                    requested: requested.to_string(),
                }
            );
            assert_eq!(m, before, "medicine mutated on rejected {requested}");
            assert!(log.is_empty(), "log written on rejected {requested}");
        }
    }

    #[test]
    fn mark_expired_works_from_active_and_quarantined() {
        for status in [MedicineStatus::Active, MedicineStatus::Quarantined] {
            let mut m = medicine_with_status(status);
            let mut log = AuditLog::new();

            let id = m.id;
            let entry = transition(&mut m, &mut log, &expire_cmd(id)).unwrap();
            assert_eq!(m.status, MedicineStatus::Expired);
            assert_eq!(entry.action, QuarantineAction::Expired);
        }
    }

    #[test]
    fn command_for_a_different_medicine_is_not_found() {
        let mut m = medicine_with_status(MedicineStatus::Active);
        let mut log = AuditLog::new();
        let other = MedicineId::new(AggregateId::new());

        let err = transition(&mut m, &mut log, &quarantine_cmd(other)).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
        assert_eq!(m.status, MedicineStatus::Active);
        assert!(log.is_empty());
    }

    #[test]
    fn reason_codes_parse_from_strings_and_reject_unknown_ones() {
        assert_eq!(
            "temperature_exposure".parse::<QuarantineReason>().unwrap(),
            QuarantineReason::TemperatureExposure
        );
        assert_eq!(
            " Recall ".parse::<QuarantineReason>().unwrap(),
            QuarantineReason::Recall
        );
        assert!(matches!(
            "mislabelled".parse::<QuarantineReason>().unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let m = medicine_with_status(MedicineStatus::Active);
        let snapshot = m.clone();

        let _ = m.handle(&quarantine_cmd(m.id)).unwrap();
        let _ = m.handle(&expire_cmd(m.id)).unwrap();

        assert_eq!(m, snapshot);
    }
}
