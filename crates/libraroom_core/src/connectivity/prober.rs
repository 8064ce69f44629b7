//! Cancellable fixed-interval connectivity polling.
//!
//! # Invariants
//! - `start` runs one check immediately, then one per interval.
//! - A result is applied only when no newer check was applied before it.
//! - A panicking check leaves the previous status in place.

use super::check::ConnectivityCheck;
use log::{error, info, warn};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const WORKER_THREAD_NAME: &str = "libraroom-connectivity";
/// Shortest accepted cadence; shorter intervals are raised to this.
pub const MIN_PROBE_INTERVAL: Duration = Duration::from_millis(10);

/// Status badge label for a connectivity value.
pub fn sync_label(connected: bool) -> &'static str {
    if connected {
        "Cloud Synced"
    } else {
        "Local Workspace"
    }
}

#[derive(Debug, Default)]
struct StatusState {
    applied_seq: u64,
    connected: bool,
}

#[derive(Debug, Default)]
struct StatusCell {
    next_seq: AtomicU64,
    state: Mutex<StatusState>,
}

impl StatusCell {
    fn lock(&self) -> MutexGuard<'_, StatusState> {
        // State updates cannot panic mid-write, so a poisoned guard is still consistent.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn run_check(&self, check: &dyn ConnectivityCheck) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let connected = match catch_unwind(AssertUnwindSafe(|| check.is_connected())) {
            Ok(connected) => connected,
            Err(_) => {
                warn!(
                    "event=connectivity_check module=connectivity status=error error_code=check_panicked seq={seq}"
                );
                return;
            }
        };

        self.apply(seq, connected);
    }

    fn apply(&self, seq: u64, connected: bool) {
        let mut state = self.lock();
        if seq <= state.applied_seq {
            return;
        }
        state.applied_seq = seq;
        if state.connected != connected {
            info!(
                "event=connectivity_changed module=connectivity status=ok connected={connected} seq={seq}"
            );
            state.connected = connected;
        }
    }
}

struct ProbeWorker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Polls a `ConnectivityCheck` and keeps the latest result.
pub struct ConnectivityProber {
    check: Arc<dyn ConnectivityCheck>,
    interval: Duration,
    status: Arc<StatusCell>,
    worker: Option<ProbeWorker>,
}

impl ConnectivityProber {
    pub fn new(check: impl ConnectivityCheck + 'static, interval: Duration) -> Self {
        Self::from_shared(Arc::new(check), interval)
    }

    pub fn from_shared(check: Arc<dyn ConnectivityCheck>, interval: Duration) -> Self {
        if interval < MIN_PROBE_INTERVAL {
            warn!(
                "event=connectivity_probe module=connectivity status=degraded error_code=interval_too_short interval_ms={} applied_ms={}",
                interval.as_millis(),
                MIN_PROBE_INTERVAL.as_millis()
            );
        }
        Self {
            check,
            interval: interval.max(MIN_PROBE_INTERVAL),
            status: Arc::new(StatusCell::default()),
            worker: None,
        }
    }

    /// Starts the schedule with an immediate check. No-op while running.
    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }

        self.status.run_check(self.check.as_ref());

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let check = Arc::clone(&self.check);
        let status = Arc::clone(&self.status);
        let interval = self.interval;
        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => status.run_check(check.as_ref()),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            });

        match spawned {
            Ok(handle) => {
                info!(
                    "event=connectivity_probe module=connectivity status=started interval_ms={}",
                    interval.as_millis()
                );
                self.worker = Some(ProbeWorker { stop_tx, handle });
            }
            Err(err) => {
                error!(
                    "event=connectivity_probe module=connectivity status=error error_code=spawn_failed error={err}"
                );
            }
        }
    }

    /// Cancels the schedule and joins the worker. Idempotent.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        let _ = worker.stop_tx.send(());
        if worker.handle.join().is_err() {
            warn!("event=connectivity_probe module=connectivity status=error error_code=join_failed");
        }
        info!("event=connectivity_probe module=connectivity status=stopped");
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Runs one check on the caller's thread.
    pub fn check_now(&self) {
        self.status.run_check(self.check.as_ref());
    }

    /// Latest applied result; `false` before the first check.
    pub fn is_connected(&self) -> bool {
        self.status.lock().connected
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Drop for ConnectivityProber {
    fn drop(&mut self) {
        self.stop();
    }
}
