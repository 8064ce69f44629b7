//! Connectivity predicate contract.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Zero-argument reachability predicate supplied by the service layer.
///
/// Implementations must be cheap and side-effect free; the prober calls
/// them on every tick.
pub trait ConnectivityCheck: Send + Sync {
    fn is_connected(&self) -> bool;
}

impl<F> ConnectivityCheck for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_connected(&self) -> bool {
        self()
    }
}

/// Shared flag the service layer flips when it learns about reachability.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct FlagConnectivity {
    flag: Arc<AtomicBool>,
}

impl FlagConnectivity {
    pub fn new(initial: bool) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(initial)),
        }
    }

    pub fn set(&self, connected: bool) {
        self.flag.store(connected, Ordering::SeqCst);
    }

    pub fn get(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl ConnectivityCheck for FlagConnectivity {
    fn is_connected(&self) -> bool {
        self.get()
    }
}
