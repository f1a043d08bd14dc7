//! Worker tasks that back the turn protocol.
//!
//! Proving is CPU-bound and runs on tokio's blocking pool so that other
//! player tasks keep polling the ledger while a proof is generated.

mod metrics;
mod prover;

pub use metrics::ProofMetrics;
pub use prover::ProverWorker;
