//! Expiry date classification.
//!
//! Dates are normalized to calendar-day granularity before subtraction so
//! same-day expiry is never misclassified by time-of-day. The injected
//! `now` keeps classification deterministic and testable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use rxstock_core::ValueObject;

use crate::medicine::{Medicine, MedicineStatus};
use crate::policy::ThresholdPolicy;

/// Derived expiry status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Unknown,
    Expired,
    Critical,
    Expiring,
    Valid,
}

impl core::fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ExpiryStatus::Unknown => write!(f, "unknown"),
            ExpiryStatus::Expired => write!(f, "expired"),
            ExpiryStatus::Critical => write!(f, "critical"),
            ExpiryStatus::Expiring => write!(f, "expiring"),
            ExpiryStatus::Valid => write!(f, "valid"),
        }
    }
}

/// Classification result.
///
/// For `expired`, `days_until_expiry` holds the days **since** expiry
/// (always ≥ 0); for everything else it is the days remaining (0 for
/// `unknown`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryAssessment {
    pub status: ExpiryStatus,
    pub days_until_expiry: i64,
}

impl ValueObject for ExpiryAssessment {}

/// Classify an expiry date against the injected `now`.
pub fn classify_expiry(
    expiry_date: Option<NaiveDate>,
    now: DateTime<Utc>,
    policy: &ThresholdPolicy,
) -> ExpiryAssessment {
    let Some(expiry) = expiry_date else {
        return ExpiryAssessment {
            status: ExpiryStatus::Unknown,
            days_until_expiry: 0,
        };
    };

    let today = now.date_naive();
    let days = (expiry - today).num_days();
    let critical = policy.expiry_critical_days.max(0);
    // A warning window narrower than the critical one would leave a gap.
    let warning = policy.expiry_warning_days.max(critical);

    if days < 0 {
        ExpiryAssessment {
            status: ExpiryStatus::Expired,
            days_until_expiry: days.abs(),
        }
    } else if days <= critical {
        ExpiryAssessment {
            status: ExpiryStatus::Critical,
            days_until_expiry: days,
        }
    } else if days <= warning {
        ExpiryAssessment {
            status: ExpiryStatus::Expiring,
            days_until_expiry: days,
        }
    } else {
        ExpiryAssessment {
            status: ExpiryStatus::Valid,
            days_until_expiry: days,
        }
    }
}

/// Classify a medicine's expiry, reconciling the persisted status with the
/// date arithmetic.
///
/// A medicine whose persisted `status` is already `expired` is reported as
/// expired regardless of what the date says: the persisted state wins on
/// conflict. Days-since-expiry is still taken from the date when one is
/// known, else 0.
pub fn assess_medicine_expiry(
    medicine: &Medicine,
    now: DateTime<Utc>,
    policy: &ThresholdPolicy,
) -> ExpiryAssessment {
    let derived = classify_expiry(medicine.expiry_date, now, policy);

    if medicine.status == MedicineStatus::Expired {
        let days_since = if derived.status == ExpiryStatus::Expired {
            derived.days_until_expiry
        } else {
            0
        };
        return ExpiryAssessment {
            status: ExpiryStatus::Expired,
            days_until_expiry: days_since,
        };
    }

    derived
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::medicine::MedicineId;
    use chrono::{Duration, TimeZone};
    use rxstock_core::AggregateId;

    fn now() -> DateTime<Utc> {
        // Late in the day on purpose: day normalization must make
        // time-of-day irrelevant.
        Utc.with_ymd_and_hms(2026, 6, 15, 23, 30, 0).unwrap()
    }

    fn date(offset_days: i64) -> NaiveDate {
        (now() + Duration::days(offset_days)).date_naive()
    }

    fn assess(expiry: Option<NaiveDate>) -> ExpiryAssessment {
        classify_expiry(expiry, now(), &ThresholdPolicy::default())
    }

    #[test]
    fn missing_date_is_unknown() {
        let a = assess(None);
        assert_eq!(a.status, ExpiryStatus::Unknown);
        assert_eq!(a.days_until_expiry, 0);
    }

    #[test]
    fn past_date_is_expired_with_days_since_expiry() {
        let a = assess(Some(date(-3)));
        assert_eq!(a.status, ExpiryStatus::Expired);
        assert_eq!(a.days_until_expiry, 3);
    }

    #[test]
    fn same_day_expiry_is_critical_not_expired() {
        let a = assess(Some(date(0)));
        assert_eq!(a.status, ExpiryStatus::Critical);
        assert_eq!(a.days_until_expiry, 0);
    }

    #[test]
    fn window_boundaries() {
        assert_eq!(assess(Some(date(7))).status, ExpiryStatus::Critical);
        assert_eq!(assess(Some(date(8))).status, ExpiryStatus::Expiring);
        assert_eq!(assess(Some(date(30))).status, ExpiryStatus::Expiring);
        assert_eq!(assess(Some(date(31))).status, ExpiryStatus::Valid);
    }

    #[test]
    fn persisted_expired_status_wins_over_a_future_date() {
        let mut m = Medicine::new(MedicineId::new(AggregateId::new()), "Insulin glargine");
        m.expiry_date = Some(date(90));
        m.status = MedicineStatus::Expired;

        let a = assess_medicine_expiry(&m, now(), &ThresholdPolicy::default());
        assert_eq!(a.status, ExpiryStatus::Expired);
        assert_eq!(a.days_until_expiry, 0);
    }

    #[test]
    fn persisted_expired_status_keeps_date_derived_days() {
        let mut m = Medicine::new(MedicineId::new(AggregateId::new()), "Insulin glargine");
        m.expiry_date = Some(date(-14));
        m.status = MedicineStatus::Expired;

        let a = assess_medicine_expiry(&m, now(), &ThresholdPolicy::default());
        assert_eq!(a.status, ExpiryStatus::Expired);
        assert_eq!(a.days_until_expiry, 14);
    }

    #[test]
    fn active_medicine_uses_date_arithmetic() {
        let mut m = Medicine::new(MedicineId::new(AggregateId::new()), "Insulin glargine");
        m.expiry_date = Some(date(20));

        let a = assess_medicine_expiry(&m, now(), &ThresholdPolicy::default());
        assert_eq!(a.status, ExpiryStatus::Expiring);
        assert_eq!(a.days_until_expiry, 20);
    }
}
