//! Remote store reachability indicator.
//!
//! # Responsibility
//! - Poll an external boolean predicate on a fixed cadence.
//! - Expose only the latest result for the status badge.
//!
//! # Invariants
//! - The schedule never outlives its owner (`stop` on drop).
//! - Status never feeds back into session or navigation state.

mod check;
mod prober;

pub use check::{ConnectivityCheck, FlagConnectivity};
pub use prober::{sync_label, ConnectivityProber, MIN_PROBE_INTERVAL};
