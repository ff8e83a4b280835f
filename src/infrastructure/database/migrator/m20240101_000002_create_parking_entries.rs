//! Create parking_entries table
//!
//! Permanent log of vehicle visits; rows are updated once at checkout and
//! never deleted.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ParkingEntries::VehicleNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ParkingEntries::OwnerName).string().not_null())
                    .col(
                        ColumnDef::new(ParkingEntries::VehicleType)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingEntries::EntryTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ParkingEntries::ExitTime).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ParkingEntries::SlotNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingEntries::Status)
                            .string()
                            .not_null()
                            .default("Parked"),
                    )
                    .col(
                        ColumnDef::new(ParkingEntries::ReservationFlag)
                            .string()
                            .not_null()
                            .default("No"),
                    )
                    .col(ColumnDef::new(ParkingEntries::DurationHours).integer())
                    .col(ColumnDef::new(ParkingEntries::TotalAmount).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_entries_vehicle_number")
                    .table(ParkingEntries::Table)
                    .col(ParkingEntries::VehicleNumber)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_entries_status")
                    .table(ParkingEntries::Table)
                    .col(ParkingEntries::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_entries_entry_time")
                    .table(ParkingEntries::Table)
                    .col(ParkingEntries::EntryTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingEntries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingEntries {
    Table,
    Id,
    VehicleNumber,
    OwnerName,
    VehicleType,
    EntryTime,
    ExitTime,
    SlotNumber,
    Status,
    ReservationFlag,
    DurationHours,
    TotalAmount,
}
