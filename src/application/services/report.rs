//! Read-only projections over the entry log: search, period summaries and
//! the front-desk dashboard.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use rust_decimal::Decimal;

use super::lot::{current_ledger, require_settings};
use crate::domain::{
    Availability, DomainError, DomainResult, EntryFilter, ParkingEntry, RepositoryProvider,
    ReservationFlag, VehicleType,
};
use crate::shared::SharedClock;

/// Number of parked vehicles shown on the dashboard
pub const RECENT_VEHICLES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl ReportPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Inclusive UTC window containing `now`. Weeks start on Sunday.
    pub fn window(&self, now: DateTime<Utc>) -> DomainResult<(DateTime<Utc>, DateTime<Utc>)> {
        let today = now.date_naive();
        let (first, next) = match self {
            Self::Daily => (today, today + Duration::days(1)),
            Self::Weekly => {
                let sunday = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
                (sunday, sunday + Duration::days(7))
            }
            Self::Monthly => {
                let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1);
                let next = if today.month() == 12 {
                    NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
                };
                match (first, next) {
                    (Some(first), Some(next)) => (first, next),
                    _ => {
                        return Err(DomainError::Validation(format!(
                            "Cannot build a monthly window for {}",
                            today
                        )))
                    }
                }
            }
        };

        let start = first.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = next.and_time(chrono::NaiveTime::MIN).and_utc() - Duration::milliseconds(1);
        Ok((start, end))
    }
}

impl std::str::FromStr for ReportPeriod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(DomainError::Validation(format!(
                "Unknown report period '{}', expected daily, weekly or monthly",
                other
            ))),
        }
    }
}

/// Entries in one hour of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlyCount {
    pub hour: u32,
    pub vehicles: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSummary {
    pub period: ReportPeriod,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub total_vehicles: u32,
    pub exited_vehicles: u32,
    /// Sum of fees of entries in the window that have exited
    pub revenue: Decimal,
    pub cars: u32,
    pub bikes: u32,
    pub walk_ins: u32,
    /// Reservations scheduled inside the window
    pub reservations: u32,
    /// Only hours that saw at least one entry, in order
    pub hourly: Vec<HourlyCount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub availability: Availability,
    pub today_entries: u32,
    pub today_revenue: Decimal,
    pub recent_parked: Vec<ParkingEntry>,
}

pub struct ReportService {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
}

impl ReportService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self { repos, clock }
    }

    /// Search the full entry log, newest first.
    pub async fn search(&self, filter: &EntryFilter) -> DomainResult<Vec<ParkingEntry>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(DomainError::Validation(format!(
                    "Search range starts ({}) after it ends ({})",
                    from, to
                )));
            }
        }
        self.repos.entries().search(filter).await
    }

    pub async fn summary(&self, period: ReportPeriod) -> DomainResult<PeriodSummary> {
        let (from, to) = period.window(self.clock.now())?;
        let entries = self.repos.entries().find_entered_between(from, to).await?;
        let reservations = self
            .repos
            .reservations()
            .find_scheduled_between(from, to)
            .await?;

        let mut hourly: BTreeMap<u32, u32> = BTreeMap::new();
        for entry in &entries {
            *hourly.entry(entry.entry_time.hour()).or_default() += 1;
        }

        Ok(PeriodSummary {
            period,
            from,
            to,
            total_vehicles: count(&entries, |_| true),
            exited_vehicles: count(&entries, |e| !e.is_parked()),
            revenue: revenue(&entries),
            cars: count(&entries, |e| e.vehicle_type == VehicleType::Car),
            bikes: count(&entries, |e| e.vehicle_type == VehicleType::Bike),
            walk_ins: count(&entries, |e| e.reservation_flag == ReservationFlag::No),
            reservations: u32::try_from(reservations.len()).unwrap_or(u32::MAX),
            hourly: hourly
                .into_iter()
                .map(|(hour, vehicles)| HourlyCount { hour, vehicles })
                .collect(),
        })
    }

    pub async fn dashboard(&self) -> DomainResult<Dashboard> {
        let settings = require_settings(self.repos.as_ref()).await?;
        let ledger = current_ledger(self.repos.as_ref()).await?;

        let (from, to) = ReportPeriod::Daily.window(self.clock.now())?;
        let today = self.repos.entries().find_entered_between(from, to).await?;

        let mut recent_parked = self.repos.entries().find_parked().await?;
        recent_parked.truncate(RECENT_VEHICLES);

        Ok(Dashboard {
            availability: ledger.availability(settings.total_slots),
            today_entries: count(&today, |_| true),
            today_revenue: revenue(&today),
            recent_parked,
        })
    }
}

fn count(entries: &[ParkingEntry], keep: impl Fn(&ParkingEntry) -> bool) -> u32 {
    u32::try_from(entries.iter().filter(|e| keep(e)).count()).unwrap_or(u32::MAX)
}

fn revenue(entries: &[ParkingEntry]) -> Decimal {
    entries
        .iter()
        .filter_map(|e| e.exit_record())
        .map(|r| r.total_amount)
        .sum()
}
