//! Parking entry domain entity

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::domain::billing::Bill;
use crate::domain::{DomainError, DomainResult};

/// Vehicle category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleType {
    Bike,
    Car,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bike => "Bike",
            Self::Car => "Car",
        }
    }
}

impl std::str::FromStr for VehicleType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bike" => Ok(Self::Bike),
            "Car" => Ok(Self::Car),
            other => Err(DomainError::Validation(format!(
                "Unknown vehicle type '{}', expected Bike or Car",
                other
            ))),
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether an entry was created by checking in a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReservationFlag {
    Yes,
    #[default]
    No,
}

impl ReservationFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Yes" => Some(Self::Yes),
            "No" => Some(Self::No),
            _ => None,
        }
    }
}

/// Billing outputs captured at checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitRecord {
    pub exit_time: DateTime<Utc>,
    pub duration_hours: u32,
    pub total_amount: Decimal,
}

/// Entry lifecycle. `Parked` is initial, `Exited` is terminal and is the only
/// state that carries billing outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Parked,
    Exited(ExitRecord),
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parked => "Parked",
            Self::Exited(_) => "Exited",
        }
    }
}

/// Canonical form of a vehicle registration number.
///
/// Lookups are case-insensitive; numbers are stored upper-cased so the store
/// can match them with a plain equality filter.
pub fn normalize_vehicle_number(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Entry fields known before the store assigns an id
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub vehicle_number: String,
    pub owner_name: String,
    pub vehicle_type: VehicleType,
    pub entry_time: DateTime<Utc>,
    pub slot_number: u32,
    pub reservation_flag: ReservationFlag,
}

/// One vehicle visit, from arrival to departure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkingEntry {
    pub id: i32,
    pub vehicle_number: String,
    pub owner_name: String,
    pub vehicle_type: VehicleType,
    pub entry_time: DateTime<Utc>,
    /// Assigned once at creation, never changed
    pub slot_number: u32,
    pub reservation_flag: ReservationFlag,
    pub status: EntryStatus,
}

impl ParkingEntry {
    pub fn from_new(id: i32, new: NewEntry) -> Self {
        Self {
            id,
            vehicle_number: new.vehicle_number,
            owner_name: new.owner_name,
            vehicle_type: new.vehicle_type,
            entry_time: new.entry_time,
            slot_number: new.slot_number,
            reservation_flag: new.reservation_flag,
            status: EntryStatus::Parked,
        }
    }

    pub fn is_parked(&self) -> bool {
        matches!(self.status, EntryStatus::Parked)
    }

    pub fn exit_record(&self) -> Option<&ExitRecord> {
        match &self.status {
            EntryStatus::Parked => None,
            EntryStatus::Exited(record) => Some(record),
        }
    }

    /// Case-insensitive match on the registration number
    pub fn matches_vehicle(&self, vehicle_number: &str) -> bool {
        self.vehicle_number.to_uppercase() == normalize_vehicle_number(vehicle_number)
    }

    /// Parked → Exited. Fails on an entry that has already exited so a
    /// repeated checkout can never re-bill.
    pub fn checkout(&mut self, bill: &Bill) -> DomainResult<()> {
        match self.status {
            EntryStatus::Parked => {
                if bill.entry_time != self.entry_time {
                    return Err(DomainError::Integrity(format!(
                        "bill for entry {} was computed from a different entry time",
                        self.id
                    )));
                }
                self.status = EntryStatus::Exited(ExitRecord {
                    exit_time: bill.exit_time,
                    duration_hours: bill.duration_hours,
                    total_amount: bill.total_amount,
                });
                Ok(())
            }
            EntryStatus::Exited(_) => Err(DomainError::AlreadyExited(self.vehicle_number.clone())),
        }
    }
}

/// Search criteria over the entry log. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Case-insensitive substring of the registration number
    pub vehicle_number: Option<String>,
    /// Case-insensitive substring of the owner name
    pub owner_name: Option<String>,
    pub slot_number: Option<u32>,
    /// First day included (UTC)
    pub from: Option<NaiveDate>,
    /// Last day included, through 23:59:59.999 (UTC)
    pub to: Option<NaiveDate>,
}

impl EntryFilter {
    /// Inclusive lower bound on `entry_time`
    pub fn entered_from(&self) -> Option<DateTime<Utc>> {
        self.from
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Inclusive upper bound on `entry_time`
    pub fn entered_to(&self) -> Option<DateTime<Utc>> {
        self.to
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
            .map(|dt| dt.and_utc())
    }

    pub fn matches(&self, entry: &ParkingEntry) -> bool {
        let contains = |haystack: &str, needle: &Option<String>| match needle {
            Some(n) if !n.is_empty() => haystack.to_lowercase().contains(&n.to_lowercase()),
            _ => true,
        };

        contains(&entry.vehicle_number, &self.vehicle_number)
            && contains(&entry.owner_name, &self.owner_name)
            && self.slot_number.map_or(true, |s| entry.slot_number == s)
            && self.entered_from().map_or(true, |from| entry.entry_time >= from)
            && self.entered_to().map_or(true, |to| entry.entry_time <= to)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::{compute_bill, BillingPolicy};
    use chrono::{Duration, TimeZone};

    #[test]
    fn reservation_flag_parses_only_known_values() {
        assert_eq!(ReservationFlag::parse("Yes"), Some(ReservationFlag::Yes));
        assert_eq!(ReservationFlag::parse("No"), Some(ReservationFlag::No));
        assert_eq!(ReservationFlag::parse("yes"), None);
        assert_eq!(ReservationFlag::parse(""), None);
    }

    fn sample_entry() -> ParkingEntry {
        ParkingEntry::from_new(
            7,
            NewEntry {
                vehicle_number: normalize_vehicle_number(" abc-1234 "),
                owner_name: "Dana Reyes".into(),
                vehicle_type: VehicleType::Car,
                entry_time: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
                slot_number: 3,
                reservation_flag: ReservationFlag::No,
            },
        )
    }

    fn bill_for(entry: &ParkingEntry, minutes: i64) -> Bill {
        compute_bill(
            entry.entry_time,
            entry.entry_time + Duration::minutes(minutes),
            Decimal::from(10),
            &BillingPolicy::default(),
        )
        .unwrap()
    }

    #[test]
    fn new_entry_is_parked_without_billing() {
        let e = sample_entry();
        assert!(e.is_parked());
        assert!(e.exit_record().is_none());
        assert_eq!(e.vehicle_number, "ABC-1234");
        assert_eq!(e.status.as_str(), "Parked");
    }

    #[test]
    fn checkout_records_bill() {
        let mut e = sample_entry();
        let bill = bill_for(&e, 61);
        e.checkout(&bill).unwrap();

        let record = e.exit_record().unwrap();
        assert_eq!(record.duration_hours, 2);
        assert_eq!(record.total_amount, Decimal::from(20));
        assert_eq!(record.exit_time, bill.exit_time);
        assert_eq!(e.slot_number, 3);
    }

    #[test]
    fn second_checkout_is_rejected_and_keeps_first_bill() {
        let mut e = sample_entry();
        e.checkout(&bill_for(&e, 30)).unwrap();
        let first = e.exit_record().cloned();

        let err = e.checkout(&bill_for(&e, 300)).unwrap_err();
        assert_eq!(err, DomainError::AlreadyExited("ABC-1234".into()));
        assert_eq!(e.exit_record().cloned(), first);
    }

    #[test]
    fn vehicle_match_ignores_case() {
        let e = sample_entry();
        assert!(e.matches_vehicle("abc-1234"));
        assert!(e.matches_vehicle("ABC-1234"));
        assert!(!e.matches_vehicle("ABC-12345"));
    }

    #[test]
    fn vehicle_type_parsing() {
        assert_eq!("Car".parse::<VehicleType>().unwrap(), VehicleType::Car);
        assert_eq!("Bike".parse::<VehicleType>().unwrap(), VehicleType::Bike);
        assert!("Truck".parse::<VehicleType>().is_err());
    }

    #[test]
    fn filter_by_substrings_and_slot() {
        let e = sample_entry();
        let f = EntryFilter {
            vehicle_number: Some("bc-12".into()),
            owner_name: Some("REYES".into()),
            slot_number: Some(3),
            ..Default::default()
        };
        assert!(f.matches(&e));

        let wrong_slot = EntryFilter {
            slot_number: Some(4),
            ..Default::default()
        };
        assert!(!wrong_slot.matches(&e));
    }

    #[test]
    fn filter_to_date_covers_whole_day() {
        let e = sample_entry();
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let same_day = EntryFilter {
            from: Some(day),
            to: Some(day),
            ..Default::default()
        };
        assert!(same_day.matches(&e));

        let before = EntryFilter {
            to: NaiveDate::from_ymd_opt(2024, 5, 31),
            ..Default::default()
        };
        assert!(!before.matches(&e));
    }
}
