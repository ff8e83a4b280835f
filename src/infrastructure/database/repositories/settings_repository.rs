//! SeaORM implementation of SettingsRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use super::{db_err, parse_decimal, slot_from_db};
use crate::domain::settings::{ParkingSettings, SettingsRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::settings::{self, SETTINGS_ROW_ID};

pub struct SeaOrmSettingsRepository {
    db: DatabaseConnection,
}

impl SeaOrmSettingsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: settings::Model) -> DomainResult<ParkingSettings> {
    Ok(ParkingSettings {
        total_slots: slot_from_db(m.total_slots)?,
        rate_per_hour: parse_decimal(&m.rate_per_hour, "settings.rate_per_hour")?,
        updated_at: m.updated_at,
    })
}

#[async_trait]
impl SettingsRepository for SeaOrmSettingsRepository {
    async fn get(&self) -> DomainResult<Option<ParkingSettings>> {
        settings::Entity::find_by_id(SETTINGS_ROW_ID)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn save(&self, s: &ParkingSettings) -> DomainResult<()> {
        debug!(
            "Saving settings: total_slots={}, rate_per_hour={}",
            s.total_slots, s.rate_per_hour
        );

        let total_slots = i32::try_from(s.total_slots).map_err(|_| {
            DomainError::Validation(format!("Total slots {} is too large", s.total_slots))
        })?;

        let model = settings::ActiveModel {
            id: Set(SETTINGS_ROW_ID),
            total_slots: Set(total_slots),
            rate_per_hour: Set(s.rate_per_hour.to_string()),
            updated_at: Set(s.updated_at),
        };

        settings::Entity::insert(model)
            .on_conflict(
                OnConflict::column(settings::Column::Id)
                    .update_columns([
                        settings::Column::TotalSlots,
                        settings::Column::RatePerHour,
                        settings::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
