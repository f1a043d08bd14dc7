//! Proof generation metrics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters kept by [`ProverWorker`](super::ProverWorker).
///
/// Uses atomics for lock-free access across threads.
#[derive(Debug, Default)]
pub struct ProofMetrics {
    /// Proofs generated and verified locally
    generated: AtomicU64,

    /// Attempts that ended in an error
    failed: AtomicU64,

    /// Sum of successful proving durations, in nanoseconds
    total_proving_time_nanos: AtomicU64,
}

impl ProofMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, proving_time: Duration) {
        self.generated.fetch_add(1, Ordering::Relaxed);
        self.total_proving_time_nanos
            .fetch_add(proving_time.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn generated(&self) -> u64 {
        self.generated.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Mean proving time over successful proofs.
    pub fn average_proving_time(&self) -> Option<Duration> {
        let count = self.generated();
        if count == 0 {
            return None;
        }
        Some(Duration::from_nanos(
            self.total_proving_time_nanos.load(Ordering::Relaxed) / count,
        ))
    }
}
