//! Settings repository interface

use async_trait::async_trait;

use super::model::ParkingSettings;
use crate::domain::DomainResult;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// The active configuration, if an administrator has created one
    async fn get(&self) -> DomainResult<Option<ParkingSettings>>;

    /// Create the configuration or update it in place
    async fn save(&self, settings: &ParkingSettings) -> DomainResult<()>;
}
