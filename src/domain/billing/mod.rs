//! Billing engine
//!
//! Turns an entry/exit pair and the configured hourly rate into the fee owed.

pub mod model;

pub use model::{compute_bill, Bill, BillingPolicy};
