//! Slot allocator
//!
//! Always hands out the lowest free slot so usage stays compact and
//! allocation is deterministic for a given claim set.

use std::collections::BTreeSet;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("no free slot")]
    Full,
    #[error("slot {0} is out of range or already claimed")]
    SlotUnavailable(u32),
}

/// Pick the lowest slot in `1..=total_slots` that is not in `claims`.
pub fn allocate(claims: &BTreeSet<u32>, total_slots: u32) -> Result<u32, AllocationError> {
    if claims.len() >= total_slots as usize {
        return Err(AllocationError::Full);
    }

    (1..=total_slots)
        .find(|slot| !claims.contains(slot))
        .ok_or(AllocationError::Full)
}

/// Claim a caller-chosen slot, which must be in range and unclaimed.
pub fn claim_specific(
    claims: &BTreeSet<u32>,
    total_slots: u32,
    slot: u32,
) -> Result<u32, AllocationError> {
    if claims.len() >= total_slots as usize {
        return Err(AllocationError::Full);
    }
    if slot == 0 || slot > total_slots || claims.contains(&slot) {
        return Err(AllocationError::SlotUnavailable(slot));
    }
    Ok(slot)
}

// ── Tests ──────────────────────────────────────────────────────
