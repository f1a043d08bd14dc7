//! Zero-knowledge proof lifecycle for the battleship protocol.
//!
//! Leaves first:
//!
//! - [`codec`]: decimal strings ↔ fixed-width byte buffers
//! - [`curve`]: process-wide BN254 context, point reconstruction
//! - [`bundle`]: [`ProofBundle`], the typed proof artifact
//! - [`encoder`]: [`ProofEncoder`], the verifier's compressed wire format
//! - [`commitment`]: MiMC-sponge board commitments
//! - [`prover`]: circuit collaborator interface ([`CircuitBackend`])
//! - [`circuit`]: Groth16 board and shot circuits, keys, artifacts
//! - [`engine`]: [`ProofEngine`], prove → verify locally → encode
//!
//! # Example
//!
//! ```no_run
//! use zk::{CircuitArtifacts, CircuitInputs, ProofEngine};
//! # let board = zk::test_helpers::host_board();
//!
//! let artifacts = CircuitArtifacts::dev_setup(7)?;
//! let engine = ProofEngine::groth16(std::sync::Arc::new(artifacts));
//! let encoded = engine.prove_and_encode(&CircuitInputs::board(board))?;
//! assert_eq!(encoded.len(), 160);
//! # Ok::<(), zk::ProofError>(())
//! ```

pub mod bundle;
pub mod circuit;
pub mod codec;
pub mod commitment;
pub mod curve;
pub mod encoder;
pub mod engine;
pub mod prover;
pub mod test_helpers;

pub use bundle::{ProofBundle, SnarkjsProof};
pub use circuit::{CircuitArtifacts, Groth16Backend, Groth16Keys};
pub use codec::{EncodingError, decimal_to_bytes, reverse_bytes};
pub use commitment::{commit, commitment_bytes, commitment_decimal};
pub use curve::CurveContext;
pub use encoder::{EncodedProof, ProofEncoder, encoded_len};
pub use engine::ProofEngine;
pub use prover::{CircuitBackend, CircuitInputs, CircuitKind, ProofError};

pub use ark_bn254::Fr;
