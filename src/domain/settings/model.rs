//! Parking settings domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{DomainError, DomainResult};

/// Lot capacity and pricing.
///
/// Passed explicitly into allocation and billing rather than read from
/// ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkingSettings {
    /// Upper bound on simultaneous slot claims
    pub total_slots: u32,
    /// Currency units per started hour
    pub rate_per_hour: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl ParkingSettings {
    pub fn new(total_slots: u32, rate_per_hour: Decimal, updated_at: DateTime<Utc>) -> DomainResult<Self> {
        let settings = Self {
            total_slots,
            rate_per_hour,
            updated_at,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.total_slots == 0 {
            return Err(DomainError::Validation(
                "Total slots must be greater than 0".to_string(),
            ));
        }
        if self.rate_per_hour <= Decimal::ZERO {
            return Err(DomainError::Validation(
                "Parking rate must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `slot` addresses a physical space in this lot
    pub fn contains_slot(&self, slot: u32) -> bool {
        (1..=self.total_slots).contains(&slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_settings() {
        let s = ParkingSettings::new(20, Decimal::new(250, 2), Utc::now()).unwrap();
        assert_eq!(s.total_slots, 20);
        assert!(s.contains_slot(1));
        assert!(s.contains_slot(20));
        assert!(!s.contains_slot(0));
        assert!(!s.contains_slot(21));
    }

    #[test]
    fn zero_slots_rejected() {
        let err = ParkingSettings::new(0, Decimal::from(10), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn non_positive_rate_rejected() {
        assert!(ParkingSettings::new(5, Decimal::ZERO, Utc::now()).is_err());
        assert!(ParkingSettings::new(5, Decimal::new(-15, 1), Utc::now()).is_err());
    }
}
