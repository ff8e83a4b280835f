//! Occupancy ledger
//!
//! A pure projection over the current entry and reservation records. It is
//! rebuilt on every read instead of being kept as a counter, so it cannot
//! drift from the records it summarizes.

use std::collections::BTreeSet;

use crate::domain::entry::ParkingEntry;
use crate::domain::reservation::Reservation;

/// Slot counts as shown to staff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    pub total: u32,
    pub occupied: u32,
    pub reserved: u32,
    /// Saturated at zero
    pub available: u32,
}

/// A slot claimed more than once. Always a broken invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotConflict {
    /// Two Parked entries on the same slot
    DuplicateParked(u32),
    /// Two Reserved reservations on the same slot
    DuplicateReserved(u32),
    /// A Parked entry and a Reserved reservation on the same slot
    ParkedAndReserved(u32),
}

impl std::fmt::Display for SlotConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateParked(s) => write!(f, "slot {} held by more than one parked entry", s),
            Self::DuplicateReserved(s) => write!(f, "slot {} held by more than one reservation", s),
            Self::ParkedAndReserved(s) => {
                write!(f, "slot {} held by both a parked entry and a reservation", s)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OccupancyLedger {
    occupied: BTreeSet<u32>,
    reserved: BTreeSet<u32>,
    conflicts: Vec<SlotConflict>,
}

impl OccupancyLedger {
    /// Build the ledger from records. Non-claiming records (Exited entries,
    /// terminal reservations) are ignored, so callers may pass full lists.
    pub fn project<'a>(
        entries: impl IntoIterator<Item = &'a ParkingEntry>,
        reservations: impl IntoIterator<Item = &'a Reservation>,
    ) -> Self {
        let mut ledger = Self::default();

        for entry in entries.into_iter().filter(|e| e.is_parked()) {
            if !ledger.occupied.insert(entry.slot_number) {
                ledger
                    .conflicts
                    .push(SlotConflict::DuplicateParked(entry.slot_number));
            }
        }

        for reservation in reservations.into_iter().filter(|r| r.is_active()) {
            let slot = reservation.slot_number;
            if ledger.occupied.contains(&slot) {
                ledger.conflicts.push(SlotConflict::ParkedAndReserved(slot));
            }
            if !ledger.reserved.insert(slot) {
                ledger.conflicts.push(SlotConflict::DuplicateReserved(slot));
            }
        }

        ledger
    }

    pub fn occupied_slots(&self) -> &BTreeSet<u32> {
        &self.occupied
    }

    pub fn reserved_slots(&self) -> &BTreeSet<u32> {
        &self.reserved
    }

    /// Union of occupied and reserved slots
    pub fn active_claims(&self) -> BTreeSet<u32> {
        self.occupied.union(&self.reserved).copied().collect()
    }

    /// `total_slots − |active claims|`. Negative when the lot was shrunk below
    /// its current occupancy.
    pub fn signed_available(&self, total_slots: u32) -> i64 {
        i64::from(total_slots) - self.active_claims().len() as i64
    }

    /// Available slots, never below zero
    pub fn available_count(&self, total_slots: u32) -> u32 {
        u32::try_from(self.signed_available(total_slots).max(0)).unwrap_or(u32::MAX)
    }

    pub fn availability(&self, total_slots: u32) -> Availability {
        Availability {
            total: total_slots,
            occupied: self.occupied.len() as u32,
            reserved: self.reserved.len() as u32,
            available: self.available_count(total_slots),
        }
    }

    /// Duplicate claims found while projecting
    pub fn conflicts(&self) -> &[SlotConflict] {
        &self.conflicts
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entry::{EntryStatus, ExitRecord, NewEntry, ReservationFlag, VehicleType};
    use crate::domain::reservation::{NewReservation, ReservationStatus};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn parked(id: i32, slot: u32) -> ParkingEntry {
        ParkingEntry::from_new(
            id,
            NewEntry {
                vehicle_number: format!("V-{}", id),
                owner_name: "Owner".into(),
                vehicle_type: VehicleType::Car,
                entry_time: Utc::now(),
                slot_number: slot,
                reservation_flag: ReservationFlag::No,
            },
        )
    }

    fn exited(id: i32, slot: u32) -> ParkingEntry {
        let mut e = parked(id, slot);
        e.status = EntryStatus::Exited(ExitRecord {
            exit_time: Utc::now(),
            duration_hours: 1,
            total_amount: Decimal::from(10),
        });
        e
    }

    fn reserved(id: i32, slot: u32) -> Reservation {
        Reservation::from_new(
            id,
            NewReservation {
                slot_number: slot,
                reservation_datetime: Utc::now(),
                customer_name: "Guest".into(),
                vehicle_number: None,
                vehicle_type: None,
                created_at: Utc::now(),
            },
        )
    }

    #[test]
    fn claims_are_union_of_parked_and_reserved() {
        let entries = vec![parked(1, 1), exited(2, 2), parked(3, 5)];
        let mut cancelled = reserved(11, 4);
        cancelled.status = ReservationStatus::Cancelled;
        let reservations = vec![reserved(10, 3), cancelled];

        let ledger = OccupancyLedger::project(&entries, &reservations);

        assert_eq!(
            ledger.active_claims().into_iter().collect::<Vec<_>>(),
            vec![1, 3, 5]
        );
        assert_eq!(
            ledger.availability(6),
            Availability {
                total: 6,
                occupied: 2,
                reserved: 1,
                available: 3,
            }
        );
        assert!(ledger.conflicts().is_empty());
    }

    #[test]
    fn available_saturates_at_zero() {
        let entries = vec![parked(1, 1), parked(2, 2), parked(3, 3)];
        let ledger = OccupancyLedger::project(&entries, &Vec::<Reservation>::new());
        assert_eq!(ledger.signed_available(2), -1);
        assert_eq!(ledger.available_count(2), 0);
    }

    #[test]
    fn empty_ledger_has_everything_free() {
        let ledger = OccupancyLedger::default();
        assert!(ledger.active_claims().is_empty());
        assert_eq!(ledger.available_count(8), 8);
    }

    #[test]
    fn duplicate_claims_are_reported() {
        let entries = vec![parked(1, 2), parked(2, 2)];
        let reservations = vec![reserved(10, 2), reserved(11, 3), reserved(12, 3)];
        let ledger = OccupancyLedger::project(&entries, &reservations);

        assert_eq!(
            ledger.conflicts(),
            &[
                SlotConflict::DuplicateParked(2),
                SlotConflict::ParkedAndReserved(2),
                SlotConflict::DuplicateReserved(3),
            ]
        );
        // A slot claimed twice still counts once against capacity
        assert_eq!(ledger.active_claims().len(), 2);
    }
}
