//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod entry_repository;
pub mod repository_provider;
pub mod reservation_repository;
pub mod settings_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use crate::domain::DomainError;

/// Map a database error, reporting unique-index hits as integrity violations
pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    match e.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) => {
            DomainError::Integrity(format!("duplicate slot claim rejected by store: {}", msg))
        }
        _ => DomainError::Storage(e.to_string()),
    }
}

/// Parse a decimal stored as text
pub(crate) fn parse_decimal(raw: &str, column: &str) -> Result<rust_decimal::Decimal, DomainError> {
    raw.parse().map_err(|e| {
        DomainError::Integrity(format!("invalid decimal '{}' in {}: {}", raw, column, e))
    })
}

/// Convert a stored slot number, rejecting values that cannot address a slot
pub(crate) fn slot_from_db(raw: i32) -> Result<u32, DomainError> {
    u32::try_from(raw).map_err(|_| DomainError::Integrity(format!("invalid slot number {}", raw)))
}
