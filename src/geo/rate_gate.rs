//! Minimum spacing between outbound provider requests.
//!
//! The provider is a shared public resource; its usage policy asks clients
//! not to fire requests back-to-back. The gate guarantees that no two
//! calls from this process begin less than `MIN_REQUEST_INTERVAL` apart,
//! regardless of how many threads are resolving concurrently.

use std::sync::Mutex;
use std::time::Duration;

/// Minimum spacing between outbound requests.
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(500);

/// Process-wide request-timing gate.
pub struct RateGate {
    min_interval_ms: i64,
    /// Epoch millis of the last outbound request. Guarded so that the
    /// read-delay-write sequence is a single critical section; two
    /// concurrent acquires must never both proceed unspaced.
    last_request_ms: Mutex<i64>,
}

impl RateGate {
    pub fn new() -> Self {
        Self::with_interval(MIN_REQUEST_INTERVAL)
    }

    /// Gate with a specific interval (for testing).
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            min_interval_ms: interval.as_millis() as i64,
            last_request_ms: Mutex::new(0),
        }
    }

    /// Block until the minimum spacing since the previous request has
    /// elapsed, then record "now" as the latest request time.
    ///
    /// The lock is held across the sleep so the spacing applies between
    /// concurrent acquirers, and released before the caller goes on to
    /// perform the network call.
    pub fn acquire(&self) {
        let mut last = self.last_request_ms.lock().unwrap_or_else(|e| e.into_inner());
        let now = chrono::Utc::now().timestamp_millis();
        let elapsed = now - *last;
        if elapsed < self.min_interval_ms {
            let remaining = (self.min_interval_ms - elapsed) as u64;
            std::thread::sleep(Duration::from_millis(remaining));
        }
        *last = chrono::Utc::now().timestamp_millis();
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new()
    }
}
