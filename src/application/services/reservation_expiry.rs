//! Background task that periodically expires overdue reservations.
//!
//! Runs in a tokio::spawn loop, checking every `check_interval_secs` for
//! Reserved reservations past their hold window and marking them `Expired`,
//! which releases their slots.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{info, warn};

use super::ParkingService;
use crate::shared::shutdown::ShutdownSignal;

/// Start the reservation expiry background task.
pub fn start_reservation_expiry_task(
    service: Arc<ParkingService>,
    shutdown: ShutdownSignal,
    check_interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let hold_minutes = service.reservation_policy().hold_minutes;
        info!(
            check_interval = check_interval_secs,
            hold_minutes, "Reservation expiry task started"
        );

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs.max(1)));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match service.expire_overdue_reservations().await {
                        Ok(0) => {}
                        Ok(count) => info!(count, "Expired overdue reservations"),
                        Err(e) => warn!(error = %e, "Reservation expiry check error"),
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("Reservation expiry task shutting down");
                    break;
                }
            }
        }

        info!("Reservation expiry task stopped");
    })
}
