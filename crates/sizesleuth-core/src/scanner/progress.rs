/// Scan progress reporting — counters, ETA estimation and the observer
/// interface through which the frontend receives per-entry updates.
use std::path::Path;
use std::time::{Duration, Instant};

/// Running counters owned by the ranking tracker.
///
/// `total` is fixed by the pre-walk. `scanned` may exceed it if the tree
/// grows between the pre-walk and the streaming walk; nothing here assumes
/// `scanned <= total`.
#[derive(Debug, Clone)]
pub struct ProgressState {
    pub scanned: u64,
    pub total: u64,
    pub started: Instant,
}

impl ProgressState {
    pub fn new(total: u64) -> Self {
        Self {
            scanned: 0,
            total,
            started: Instant::now(),
        }
    }

    pub fn record(&mut self) {
        self.scanned += 1;
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.snapshot_at(Instant::now())
    }

    pub fn snapshot_at(&self, now: Instant) -> ProgressSnapshot {
        let elapsed = now.saturating_duration_since(self.started);
        ProgressSnapshot {
            scanned: self.scanned,
            total: self.total,
            elapsed,
            remaining: estimate_remaining(self.scanned, self.total, elapsed),
        }
    }
}

/// Point-in-time progress, emitted after every ranked entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub scanned: u64,
    pub total: u64,
    pub elapsed: Duration,
    /// Never negative: saturates to zero once `scanned >= total`.
    pub remaining: Duration,
}

/// Estimate the time left from the running rate.
///
/// `rate = scanned / max(1s, elapsed)`, `remaining = (total - scanned) / rate`.
/// The one-second floor keeps the first instants of a scan from producing a
/// huge rate.
pub fn estimate_remaining(scanned: u64, total: u64, elapsed: Duration) -> Duration {
    let left = total.saturating_sub(scanned);
    if left == 0 || scanned == 0 {
        return Duration::ZERO;
    }
    let rate = scanned as f64 / elapsed.as_secs_f64().max(1.0);
    Duration::try_from_secs_f64(left as f64 / rate).unwrap_or(Duration::MAX)
}

/// Receiver of scan events.
///
/// `on_progress` is called on the consumer thread after every entry.
/// `on_paused`/`on_resumed` are called on the producer thread when it reaches
/// a checkpoint while the scan is paused. Every method defaults to a no-op.
pub trait ScanObserver: Sync {
    /// Called once after the pre-walk, before streaming starts.
    fn on_started(&self, _total: u64) {}

    fn on_progress(&self, _snapshot: &ProgressSnapshot) {}

    /// The producer is blocked at the checkpoint after `_dir`.
    fn on_paused(&self, _dir: &Path) {}

    fn on_resumed(&self) {}
}

/// Observer that ignores everything.
impl ScanObserver for () {}
