//! Partial unique indexes backing the one-claim-per-slot invariant
//!
//! At most one Parked entry and at most one Reserved reservation per slot.
//! Cross-table exclusivity (entry vs reservation) is enforced by the
//! serialized allocation path, not by the schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS uq_parking_entries_parked_slot \
             ON parking_entries (slot_number) WHERE status = 'Parked'",
        )
        .await?;

        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS uq_reservations_reserved_slot \
             ON reservations (slot_number) WHERE status = 'Reserved'",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP INDEX IF EXISTS uq_parking_entries_parked_slot")
            .await?;
        db.execute_unprepared("DROP INDEX IF EXISTS uq_reservations_reserved_slot")
            .await?;
        Ok(())
    }
}
