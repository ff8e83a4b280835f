//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_settings;
mod m20240101_000002_create_parking_entries;
mod m20240101_000003_create_reservations;
mod m20240101_000004_add_slot_claim_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_settings::Migration),
            Box::new(m20240101_000002_create_parking_entries::Migration),
            Box::new(m20240101_000003_create_reservations::Migration),
            Box::new(m20240101_000004_add_slot_claim_indexes::Migration),
        ]
    }
}
