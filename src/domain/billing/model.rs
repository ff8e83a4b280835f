//! Parking fee calculation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{DomainError, DomainResult};

/// Rounding policy applied on top of the hourly rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPolicy {
    /// Floor on billed hours. Applies to every checkout, including one in
    /// the same minute as the entry.
    pub minimum_hours: u32,
}

impl Default for BillingPolicy {
    fn default() -> Self {
        Self { minimum_hours: 1 }
    }
}

/// Fee owed for one stay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bill {
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    /// Whole elapsed minutes, truncated
    pub duration_minutes: i64,
    /// Started hours, never below the policy minimum
    pub duration_hours: u32,
    pub rate_per_hour: Decimal,
    pub total_amount: Decimal,
}

/// Compute the bill for a stay from `entry_time` to `exit_time`.
///
/// `duration_hours` is `ceil(minutes / 60)` raised to the policy minimum and
/// `total_amount` is `duration_hours × rate_per_hour` in exact decimal
/// arithmetic. An exit before the entry is a data-integrity error and is
/// never billed.
pub fn compute_bill(
    entry_time: DateTime<Utc>,
    exit_time: DateTime<Utc>,
    rate_per_hour: Decimal,
    policy: &BillingPolicy,
) -> DomainResult<Bill> {
    if exit_time < entry_time {
        return Err(DomainError::Integrity(format!(
            "exit time {} precedes entry time {}",
            exit_time, entry_time
        )));
    }

    let duration_minutes = (exit_time - entry_time).num_minutes();
    let started_hours = (duration_minutes + 59) / 60;
    let duration_hours = u32::try_from(started_hours)
        .map_err(|_| {
            DomainError::Integrity(format!("stay of {} minutes is out of range", duration_minutes))
        })?
        .max(policy.minimum_hours);

    let total_amount = Decimal::from(duration_hours)
        .checked_mul(rate_per_hour)
        .ok_or_else(|| DomainError::Integrity("fee overflows decimal range".to_string()))?;

    Ok(Bill {
        entry_time,
        exit_time,
        duration_minutes,
        duration_hours,
        rate_per_hour,
        total_amount,
    })
}

// ── Tests ──────────────────────────────────────────────────────
