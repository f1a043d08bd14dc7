//! Canonical wire encoding of Groth16 proofs.
//!
//! Layout: `A ‖ B ‖ C ‖ s_0 ‖ … ‖ s_n`, where each point is its arkworks
//! compressed form with the byte order of the whole block reversed (G1 = 32
//! bytes, G2 = 64 bytes), and each public signal is a 32-byte big-endian
//! scalar. The verifier rejects any other length or byte order even when
//! local verification passed.

use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
use ark_groth16::Proof;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::bundle::ProofBundle;
use crate::codec::{EncodingError, FIELD_BYTES, biguint_to_bytes, bytes_to_biguint, reverse_bytes, to_hex};
use crate::curve::CurveContext;
use crate::prover::{CircuitKind, ProofError};

pub const G1_COMPRESSED_BYTES: usize = 32;
pub const G2_COMPRESSED_BYTES: usize = 64;
/// `A ‖ B ‖ C` without signals.
pub const PROOF_POINTS_BYTES: usize = 2 * G1_COMPRESSED_BYTES + G2_COMPRESSED_BYTES;

/// Encoded length of a proof for `circuit`: 160 bytes for board proofs,
/// 256 for shot proofs.
pub const fn encoded_len(circuit: CircuitKind) -> usize {
    PROOF_POINTS_BYTES + circuit.public_signal_count() * FIELD_BYTES
}

/// Fixed-length proof bytes, ready to embed in a ledger call.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedProof {
    circuit: CircuitKind,
    bytes: Vec<u8>,
}

impl EncodedProof {
    pub fn circuit(&self) -> CircuitKind {
        self.circuit
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercase hex.
    pub fn to_hex(&self) -> String {
        to_hex(&self.bytes)
    }

    /// Public signal block.
    pub fn signals(&self) -> &[u8] {
        &self.bytes[PROOF_POINTS_BYTES..]
    }
}

impl std::fmt::Debug for EncodedProof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedProof")
            .field("circuit", &self.circuit)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Stateless encoder. Curve constants come from the shared [`CurveContext`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ProofEncoder;

impl ProofEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Reconstructs and validates every point, then emits canonical bytes.
    /// Deterministic: the same bundle always yields the same bytes.
    pub fn encode(&self, circuit: CircuitKind, bundle: &ProofBundle) -> Result<EncodedProof, ProofError> {
        let expected = circuit.public_signal_count();
        if bundle.public_signals.len() != expected {
            return Err(ProofError::SignalCount {
                circuit,
                expected,
                actual: bundle.public_signals.len(),
            });
        }

        let proof = bundle.to_ark()?;
        let mut bytes = Vec::with_capacity(encoded_len(circuit));
        bytes.extend(compress_reversed(&proof.a)?);
        bytes.extend(compress_reversed(&proof.b)?);
        bytes.extend(compress_reversed(&proof.c)?);

        let ctx = CurveContext::get();
        for signal in &bundle.public_signals {
            ctx.fr(signal)?;
            bytes.extend(biguint_to_bytes(signal, FIELD_BYTES)?);
        }

        debug_assert_eq!(bytes.len(), encoded_len(circuit));
        Ok(EncodedProof { circuit, bytes })
    }

    /// Inverse of [`encode`](Self::encode): points are decompressed with
    /// curve and subgroup checks, signals must be canonical scalars.
    pub fn decode(&self, circuit: CircuitKind, bytes: &[u8]) -> Result<(Proof<Bn254>, Vec<Fr>), ProofError> {
        let expected = encoded_len(circuit);
        if bytes.len() != expected {
            return Err(EncodingError::InvalidLength {
                expected,
                actual: bytes.len(),
            }
            .into());
        }

        let (a, rest) = bytes.split_at(G1_COMPRESSED_BYTES);
        let (b, rest) = rest.split_at(G2_COMPRESSED_BYTES);
        let (c, signals) = rest.split_at(G1_COMPRESSED_BYTES);

        let proof = Proof {
            a: decompress_reversed::<G1Affine>(a)?,
            b: decompress_reversed::<G2Affine>(b)?,
            c: decompress_reversed::<G1Affine>(c)?,
        };

        let ctx = CurveContext::get();
        let inputs = signals
            .chunks_exact(FIELD_BYTES)
            .map(|chunk| ctx.fr(&bytes_to_biguint(chunk)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((proof, inputs))
    }

    /// Decodes straight back into a bundle.
    pub fn decode_bundle(&self, circuit: CircuitKind, bytes: &[u8]) -> Result<ProofBundle, ProofError> {
        let (proof, inputs) = self.decode(circuit, bytes)?;
        Ok(ProofBundle::from_ark(&proof, &inputs))
    }
}

fn compress_reversed<P: CanonicalSerialize>(point: &P) -> Result<Vec<u8>, ProofError> {
    let mut buf = Vec::with_capacity(point.compressed_size());
    point
        .serialize_compressed(&mut buf)
        .map_err(|e| ProofError::SerializationError(e.to_string()))?;
    Ok(reverse_bytes(&buf))
}

fn decompress_reversed<P: CanonicalDeserialize>(block: &[u8]) -> Result<P, ProofError> {
    P::deserialize_compressed(reverse_bytes(block).as_slice())
        .map_err(|e| ProofError::InvalidPoint(e.to_string()))
}
