//! Shared reads over the current state of the lot

use tracing::error;

use crate::domain::{DomainError, DomainResult, OccupancyLedger, ParkingSettings, RepositoryProvider};

/// Load the lot configuration, failing when no administrator has set it up.
pub(crate) async fn require_settings(repos: &dyn RepositoryProvider) -> DomainResult<ParkingSettings> {
    repos
        .settings()
        .get()
        .await?
        .ok_or(DomainError::SettingsMissing)
}

/// Project the occupancy ledger from Parked entries and Reserved
/// reservations. Duplicate claims are logged; they never pass silently.
pub(crate) async fn current_ledger(repos: &dyn RepositoryProvider) -> DomainResult<OccupancyLedger> {
    let parked = repos.entries().find_parked().await?;
    let reserved = repos.reservations().find_active().await?;
    let ledger = OccupancyLedger::project(&parked, &reserved);

    for conflict in ledger.conflicts() {
        error!(conflict = %conflict, "Slot claim integrity violation");
    }

    Ok(ledger)
}
