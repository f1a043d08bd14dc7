//! Groth16 proving and verification on BN254 curve.

use std::sync::Arc;

use ark_bn254::{Bn254, Fr as Fp254};
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, ProvingKey, VerifyingKey};
use ark_relations::r1cs::ConstraintSynthesizer;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;

use super::{BattleshipCircuit, CircuitArtifacts};
use crate::bundle::ProofBundle;
use crate::prover::{CircuitBackend, CircuitInputs, CircuitKind, ProofError};

/// Groth16 proving and verifying keys
///
/// Contains the cryptographic keys needed for proof generation and verification.
/// Generated during a trusted setup ceremony.
#[derive(Clone)]
pub struct Groth16Keys {
    /// Proving key (secret, used by prover)
    pub proving_key: ProvingKey<Bn254>,
    /// Verifying key (public, used by verifier)
    pub verifying_key: VerifyingKey<Bn254>,
}

impl Groth16Keys {
    /// Generate keys from a circuit (trusted setup)
    ///
    /// # Security Warning
    /// This performs a circuit-specific setup. The randomness used must be destroyed
    /// after key generation to ensure soundness. In production, use a multi-party
    /// computation ceremony.
    pub fn generate<C, R>(circuit: C, rng: &mut R) -> Result<Self, ProofError>
    where
        C: ConstraintSynthesizer<Fp254>,
        R: RngCore,
    {
        let params = Groth16::<Bn254>::generate_random_parameters_with_reduction(circuit, rng)
            .map_err(|e| {
                ProofError::CircuitProofError(format!("Groth16 key generation failed: {:?}", e))
            })?;

        Ok(Self {
            verifying_key: params.vk.clone(),
            proving_key: params,
        })
    }

    /// Serialize both keys to bytes
    ///
    /// Format: [pk_len (8 bytes)][pk_bytes][vk_bytes], compressed points.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProofError> {
        let mut pk_bytes = Vec::new();
        self.proving_key
            .serialize_compressed(&mut pk_bytes)
            .map_err(|e| ProofError::SerializationError(e.to_string()))?;
        let vk_bytes = serialize_verifying_key(&self.verifying_key)?;

        let mut bytes = Vec::with_capacity(8 + pk_bytes.len() + vk_bytes.len());
        bytes.extend_from_slice(&(pk_bytes.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&pk_bytes);
        bytes.extend_from_slice(&vk_bytes);

        Ok(bytes)
    }

    /// Deserialize both keys from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProofError> {
        if bytes.len() < 8 {
            return Err(ProofError::SerializationError(
                "Invalid key bytes: too short".to_string(),
            ));
        }

        let (len, rest) = bytes.split_at(8);
        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(len);
        let pk_len = u64::from_le_bytes(len_bytes) as usize;
        if rest.len() < pk_len {
            return Err(ProofError::SerializationError(
                "Invalid key bytes: pk too short".to_string(),
            ));
        }

        let (pk_bytes, vk_bytes) = rest.split_at(pk_len);
        let proving_key = ProvingKey::<Bn254>::deserialize_compressed(pk_bytes)
            .map_err(|e| ProofError::SerializationError(e.to_string()))?;
        let verifying_key = deserialize_verifying_key(vk_bytes)?;

        Ok(Self {
            proving_key,
            verifying_key,
        })
    }
}

/// Serialize a verifying key (compressed).
pub fn serialize_verifying_key(vk: &VerifyingKey<Bn254>) -> Result<Vec<u8>, ProofError> {
    let mut bytes = Vec::new();
    vk.serialize_compressed(&mut bytes)
        .map_err(|e| ProofError::SerializationError(e.to_string()))?;
    Ok(bytes)
}

pub fn deserialize_verifying_key(bytes: &[u8]) -> Result<VerifyingKey<Bn254>, ProofError> {
    VerifyingKey::<Bn254>::deserialize_compressed(bytes)
        .map_err(|e| ProofError::SerializationError(e.to_string()))
}

/// Generate a Groth16 proof
///
/// Does not check the witness; an unsatisfied circuit yields a proof that
/// will not verify.
pub fn prove<C, R>(
    circuit: C,
    proving_key: &ProvingKey<Bn254>,
    rng: &mut R,
) -> Result<Proof<Bn254>, ProofError>
where
    C: ConstraintSynthesizer<Fp254>,
    R: RngCore,
{
    Groth16::<Bn254>::create_random_proof_with_reduction(circuit, proving_key, rng)
        .map_err(|e| ProofError::CircuitProofError(format!("Groth16 proving failed: {:?}", e)))
}

/// Prepare verifying key for repeated verification.
pub fn prepare_verifying_key(vk: &VerifyingKey<Bn254>) -> PreparedVerifyingKey<Bn254> {
    ark_groth16::prepare_verifying_key(vk)
}

/// Verify a proof using a prepared verifying key
pub fn verify_with_prepared_vk(
    proof: &Proof<Bn254>,
    public_inputs: &[Fp254],
    pvk: &PreparedVerifyingKey<Bn254>,
) -> Result<bool, ProofError> {
    Groth16::<Bn254>::verify_proof(pvk, proof, public_inputs)
        .map_err(|e| ProofError::CircuitProofError(format!("Groth16 verification failed: {:?}", e)))
}

/// [`CircuitBackend`] over a set of [`CircuitArtifacts`].
#[derive(Clone, Debug)]
pub struct Groth16Backend {
    artifacts: Arc<CircuitArtifacts>,
}

impl Groth16Backend {
    pub fn new(artifacts: Arc<CircuitArtifacts>) -> Self {
        Self { artifacts }
    }

    /// Backend over the process-wide installed artifacts.
    pub fn installed() -> Result<Self, ProofError> {
        Ok(Self::new(CircuitArtifacts::global()?))
    }

    pub fn artifacts(&self) -> &Arc<CircuitArtifacts> {
        &self.artifacts
    }
}

impl CircuitBackend for Groth16Backend {
    fn full_prove(&self, inputs: &CircuitInputs) -> Result<ProofBundle, ProofError> {
        let circuit = BattleshipCircuit::from(inputs);
        let kind = circuit.kind();
        circuit.check_witness()?;

        let public_inputs = circuit.public_inputs();
        let proof = prove(
            circuit,
            &self.artifacts.keys(kind).proving_key,
            &mut rand::thread_rng(),
        )?;
        Ok(ProofBundle::from_ark(&proof, &public_inputs))
    }

    fn verify(&self, circuit: CircuitKind, bundle: &ProofBundle) -> Result<bool, ProofError> {
        if bundle.public_signals.len() != circuit.public_signal_count() {
            tracing::debug!(
                %circuit,
                signals = bundle.public_signals.len(),
                "Public signal count does not match the circuit"
            );
            return Ok(false);
        }
        let proof = bundle.to_ark()?;
        let public_inputs = bundle.public_inputs()?;
        verify_with_prepared_vk(
            &proof,
            &public_inputs,
            self.artifacts.prepared_verifying_key(circuit),
        )
    }
}
