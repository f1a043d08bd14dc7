//! Circuit collaborator interface.
//!
//! The proof engine talks to circuits only through [`CircuitBackend`]: a
//! named circuit plus a `{public, private}` input record goes in, a
//! [`ProofBundle`] comes out, and a bundle can be checked against the
//! circuit's verifying key. The Groth16 implementation lives in
//! [`crate::circuit`].

use std::fmt;

use game_core::{Board, Coordinate};

use crate::bundle::ProofBundle;
use crate::codec::EncodingError;

/// Circuits known to the protocol, keyed by artifact name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircuitKind {
    /// Board commitment opens to a valid fleet placement.
    Board,
    /// Claimed hit/miss bit is consistent with the committed board.
    Shot,
}

impl CircuitKind {
    pub const ALL: [CircuitKind; 2] = [CircuitKind::Board, CircuitKind::Shot];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Board => "board",
            Self::Shot => "shot",
        }
    }

    /// Number of public signals the circuit exposes.
    pub const fn public_signal_count(self) -> usize {
        match self {
            Self::Board => 1,
            Self::Shot => 4,
        }
    }
}

impl fmt::Display for CircuitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Public and private inputs for one proving request.
#[derive(Debug, Clone)]
pub enum CircuitInputs {
    /// Public: `[commitment]`. Private: `board`.
    Board {
        commitment: ark_bn254::Fr,
        board: Board,
    },
    /// Public: `[commitment, x, y, hit]`. Private: `board`.
    Shot {
        commitment: ark_bn254::Fr,
        board: Board,
        shot: Coordinate,
        hit: bool,
    },
}

impl CircuitInputs {
    /// Board-validity inputs; the commitment is computed from `board`.
    pub fn board(board: Board) -> Self {
        Self::Board {
            commitment: crate::commitment::commit(&board),
            board,
        }
    }

    /// Shot-consistency inputs for a claimed outcome at `shot`.
    pub fn shot(board: Board, shot: Coordinate, hit: bool) -> Self {
        Self::Shot {
            commitment: crate::commitment::commit(&board),
            board,
            shot,
            hit,
        }
    }

    pub const fn kind(&self) -> CircuitKind {
        match self {
            Self::Board { .. } => CircuitKind::Board,
            Self::Shot { .. } => CircuitKind::Shot,
        }
    }
}

/// Errors that can occur during proof generation, verification or encoding.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    /// The witness does not satisfy the circuit: the private board does not
    /// open the commitment, the board is invalid, or the claim is false.
    #[error("{circuit} witness is unsatisfiable: {reason}")]
    ProvingFailure { circuit: CircuitKind, reason: String },

    /// A freshly generated proof failed local verification.
    #[error("{circuit} proof failed local verification")]
    LocalVerificationFailure { circuit: CircuitKind },

    #[error("invalid curve point: {0}")]
    InvalidPoint(String),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("{circuit} proof carries {actual} public signals, expected {expected}")]
    SignalCount {
        circuit: CircuitKind,
        expected: usize,
        actual: usize,
    },

    #[error("no artifacts found for the {0} circuit")]
    MissingArtifacts(CircuitKind),

    #[error("circuit artifacts are not installed")]
    ArtifactsNotInstalled,

    #[error("circuit artifacts are already installed")]
    ArtifactsAlreadyInstalled,

    #[error("circuit proof generation failed: {0}")]
    CircuitProofError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProofError {
    /// Whether the failure means the claim itself is wrong rather than the
    /// pipeline being broken.
    pub const fn is_unsatisfiable(&self) -> bool {
        matches!(self, Self::ProvingFailure { .. })
    }
}

/// Opaque prover/verifier pair keyed by circuit.
///
/// Proving is CPU-bound and blocking. Latency varies with the circuit and
/// machine; callers that must stay responsive run it on a blocking pool.
pub trait CircuitBackend: Send + Sync {
    /// Computes the witness and produces a proof with its public signals.
    fn full_prove(&self, inputs: &CircuitInputs) -> Result<ProofBundle, ProofError>;

    /// Checks `bundle` against the circuit's verifying key.
    fn verify(&self, circuit: CircuitKind, bundle: &ProofBundle) -> Result<bool, ProofError>;
}
