//! Occupancy: which slots are claimed, and which slot a new claim gets.

pub mod allocator;
pub mod ledger;

pub use allocator::{allocate, claim_specific, AllocationError};
pub use ledger::{Availability, OccupancyLedger, SlotConflict};
