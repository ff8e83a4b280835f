use thiserror::Error;

/// Errors surfaced by the occupancy and billing core.
///
/// None of these are retried by the core; every variant is handed back to
/// the caller for user-facing handling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Parking settings are not configured")]
    SettingsMissing,

    #[error("Parking is full: all {total_slots} slots are claimed")]
    CapacityExceeded { total_slots: u32 },

    #[error("Slot {0} is not available")]
    SlotUnavailable(u32),

    #[error("Vehicle {0} has already exited")]
    AlreadyExited(String),

    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if the caller retries it.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(e.to_string())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_key() {
        let e = DomainError::not_found("ParkingEntry", "vehicle_number", "ABC-1234");
        assert_eq!(
            e.to_string(),
            "Not found: ParkingEntry with vehicle_number=ABC-1234"
        );
    }

    #[test]
    fn only_storage_errors_are_transient() {
        assert!(DomainError::Storage("locked".into()).is_transient());
        assert!(!DomainError::CapacityExceeded { total_slots: 3 }.is_transient());
        assert!(!DomainError::Integrity("dup".into()).is_transient());
    }
}
