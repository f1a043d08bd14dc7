//! Proof pipeline: prove → verify locally → encode.
//!
//! [`ProofEngine`] is the only path from a claim to submittable bytes. A
//! bundle that fails local verification never reaches the encoder.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::bundle::ProofBundle;
use crate::circuit::{CircuitArtifacts, Groth16Backend};
use crate::encoder::{EncodedProof, ProofEncoder};
use crate::prover::{CircuitBackend, CircuitInputs, CircuitKind, ProofError};

#[derive(Clone)]
pub struct ProofEngine {
    backend: Arc<dyn CircuitBackend>,
    encoder: ProofEncoder,
}

impl ProofEngine {
    pub fn new(backend: Arc<dyn CircuitBackend>) -> Self {
        Self {
            backend,
            encoder: ProofEncoder::new(),
        }
    }

    /// Groth16 engine over explicit artifacts.
    pub fn groth16(artifacts: Arc<CircuitArtifacts>) -> Self {
        Self::new(Arc::new(Groth16Backend::new(artifacts)))
    }

    /// Groth16 engine over the installed artifacts. Fails until
    /// [`CircuitArtifacts::install`] has run.
    pub fn from_installed() -> Result<Self, ProofError> {
        Ok(Self::new(Arc::new(Groth16Backend::installed()?)))
    }

    pub fn encoder(&self) -> &ProofEncoder {
        &self.encoder
    }

    /// Runs the circuit collaborator. Blocking and CPU-bound.
    pub fn prove(&self, inputs: &CircuitInputs) -> Result<ProofBundle, ProofError> {
        let circuit = inputs.kind();
        let started = Instant::now();
        let bundle = self.backend.full_prove(inputs).inspect_err(|e| {
            tracing::warn!(%circuit, error = %e, "Proof generation failed");
        })?;
        tracing::info!(
            %circuit,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Proof generated"
        );
        Ok(bundle)
    }

    pub fn verify_locally(&self, circuit: CircuitKind, bundle: &ProofBundle) -> Result<bool, ProofError> {
        self.backend.verify(circuit, bundle)
    }

    /// Proves and insists on local verification.
    pub fn prove_verified(&self, inputs: &CircuitInputs) -> Result<ProofBundle, ProofError> {
        let circuit = inputs.kind();
        let bundle = self.prove(inputs)?;
        if !self.verify_locally(circuit, &bundle)? {
            tracing::error!(%circuit, "Fresh proof failed local verification");
            return Err(ProofError::LocalVerificationFailure { circuit });
        }
        tracing::debug!(%circuit, "Proof verified locally");
        Ok(bundle)
    }

    pub fn encode(&self, circuit: CircuitKind, bundle: &ProofBundle) -> Result<EncodedProof, ProofError> {
        self.encoder.encode(circuit, bundle)
    }

    /// Full pipeline: generate, verify locally, encode.
    pub fn prove_and_encode(&self, inputs: &CircuitInputs) -> Result<EncodedProof, ProofError> {
        let bundle = self.prove_verified(inputs)?;
        self.encode(inputs.kind(), &bundle)
    }

    /// Verifies wire bytes as a ledger would: decode, then check against the
    /// circuit's verifying key. Malformed bytes are errors, a well-formed but
    /// wrong proof is `Ok(false)`.
    pub fn verify_encoded(&self, circuit: CircuitKind, bytes: &[u8]) -> Result<bool, ProofError> {
        let bundle = self.encoder.decode_bundle(circuit, bytes)?;
        self.backend.verify(circuit, &bundle)
    }
}

impl fmt::Debug for ProofEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProofEngine").finish_non_exhaustive()
    }
}
