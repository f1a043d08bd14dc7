//! Proof generation worker.
//!
//! Runs [`ProofEngine::prove_and_encode`] on tokio's blocking pool: generate,
//! verify locally, encode. The caller awaits the whole pipeline before it
//! submits anything, so a proof that fails any step never leaves the worker.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};
use zk::{CircuitInputs, EncodedProof, ProofEngine, ProofError};

use super::ProofMetrics;

#[derive(Clone, Debug)]
pub struct ProverWorker {
    engine: ProofEngine,

    /// Shared with whoever wants to report proving statistics
    metrics: Arc<ProofMetrics>,
}

impl ProverWorker {
    pub fn new(engine: ProofEngine) -> Self {
        Self {
            engine,
            metrics: Arc::new(ProofMetrics::new()),
        }
    }

    pub fn engine(&self) -> &ProofEngine {
        &self.engine
    }

    /// Returns a clone of the metrics Arc for external querying.
    pub fn metrics(&self) -> Arc<ProofMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Proves `inputs` off the async runtime and returns wire bytes.
    pub async fn prove(&self, inputs: CircuitInputs) -> Result<EncodedProof, ProofError> {
        let engine = self.engine.clone();
        let circuit = inputs.kind();

        let result = tokio::task::spawn_blocking(move || {
            let started = Instant::now();
            engine
                .prove_and_encode(&inputs)
                .map(|proof| (proof, started.elapsed()))
        })
        .await
        .map_err(|e| ProofError::CircuitProofError(format!("Proof task failed: {e}")))?;

        match result {
            Ok((proof, elapsed)) => {
                self.metrics.record_success(elapsed);
                debug!(%circuit, bytes = proof.len(), "Proof ready for submission");
                Ok(proof)
            }
            Err(err) => {
                self.metrics.record_failure();
                warn!(%circuit, error = %err, "Proof pipeline failed");
                Err(err)
            }
        }
    }
}
