//! Lot configuration service

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use super::lot::{current_ledger, require_settings};
use crate::domain::{DomainResult, ParkingSettings, RepositoryProvider};
use crate::shared::SharedClock;

pub struct SettingsService {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
}

impl SettingsService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self { repos, clock }
    }

    pub async fn get(&self) -> DomainResult<ParkingSettings> {
        require_settings(self.repos.as_ref()).await
    }

    /// Create the configuration or update it in place.
    ///
    /// Shrinking the lot below its current claims is allowed; existing
    /// vehicles keep their slots and new claims are refused until enough
    /// slots free up.
    pub async fn upsert(
        &self,
        total_slots: u32,
        rate_per_hour: Decimal,
    ) -> DomainResult<ParkingSettings> {
        let settings = ParkingSettings::new(total_slots, rate_per_hour, self.clock.now())?;

        let claims = current_ledger(self.repos.as_ref()).await?.active_claims().len();
        if claims > total_slots as usize {
            warn!(total_slots, claims, "Lot reduced below current occupancy");
        }

        self.repos.settings().save(&settings).await?;
        info!(total_slots, rate_per_hour = %rate_per_hour, "Parking settings saved");

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::infrastructure::InMemoryRepositoryProvider;
    use crate::shared::SystemClock;

    fn service() -> SettingsService {
        SettingsService::new(Arc::new(InMemoryRepositoryProvider::new()), Arc::new(SystemClock))
    }

    #[tokio::test]
    async fn missing_until_first_save() {
        let svc = service();
        assert_eq!(svc.get().await.unwrap_err(), DomainError::SettingsMissing);

        svc.upsert(20, Decimal::new(1250, 2)).await.unwrap();
        let stored = svc.get().await.unwrap();
        assert_eq!(stored.total_slots, 20);
        assert_eq!(stored.rate_per_hour, Decimal::new(1250, 2));
    }

    #[tokio::test]
    async fn update_replaces_in_place() {
        let svc = service();
        svc.upsert(20, Decimal::from(10)).await.unwrap();
        svc.upsert(5, Decimal::from(15)).await.unwrap();
        assert_eq!(svc.get().await.unwrap().total_slots, 5);
    }

    #[tokio::test]
    async fn invalid_values_are_not_saved() {
        let svc = service();
        assert!(matches!(
            svc.upsert(0, Decimal::from(10)).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            svc.upsert(10, Decimal::ZERO).await,
            Err(DomainError::Validation(_))
        ));
        assert_eq!(svc.get().await.unwrap_err(), DomainError::SettingsMissing);
    }
}
