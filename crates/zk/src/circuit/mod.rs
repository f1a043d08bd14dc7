//! Arkworks circuit proving backend.
//!
//! Hand-written R1CS versions of the two battleship relations, proven with
//! Groth16 over BN254:
//!
//! ```text
//! Board ──► BoardCircuit ─┐
//!                         ├─► BattleshipCircuit ──► Groth16Backend ──► ProofBundle
//! Board + shot ─► ShotCircuit ─┘                         ▲
//!                                               CircuitArtifacts (pk, vk)
//! ```
//!
//! Witnesses are synthesized and checked before proving: arkworks will
//! happily produce a proof for an unsatisfied system in release builds, and
//! a false claim must surface as [`ProofError::ProvingFailure`].

pub mod artifacts;
pub mod board;
pub mod gadgets;
pub mod groth16;
pub mod shot;

pub use artifacts::CircuitArtifacts;
pub use board::BoardCircuit;
pub use groth16::{Groth16Backend, Groth16Keys};
pub use shot::ShotCircuit;

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef, SynthesisError,
};
use game_core::{Board, Coordinate, ShipPlacement};

use crate::prover::{CircuitInputs, CircuitKind, ProofError};

/// Placeholder fleet for key generation; setup never reads witness values.
const TEMPLATE_BOARD: Board = Board::new([
    ShipPlacement::horizontal(0, 0),
    ShipPlacement::horizontal(0, 1),
    ShipPlacement::horizontal(0, 2),
    ShipPlacement::horizontal(0, 3),
    ShipPlacement::horizontal(0, 4),
]);

/// Either circuit, dispatched by [`CircuitKind`].
#[derive(Clone, Debug)]
pub enum BattleshipCircuit {
    Board(BoardCircuit),
    Shot(ShotCircuit),
}

impl BattleshipCircuit {
    /// Shape-only instance used for key generation.
    pub fn template(kind: CircuitKind) -> Self {
        match kind {
            CircuitKind::Board => Self::Board(BoardCircuit::new(Fr::zero(), TEMPLATE_BOARD)),
            CircuitKind::Shot => Self::Shot(ShotCircuit::new(
                Fr::zero(),
                TEMPLATE_BOARD,
                Coordinate::new(0, 0),
                false,
            )),
        }
    }

    pub fn kind(&self) -> CircuitKind {
        match self {
            Self::Board(_) => CircuitKind::Board,
            Self::Shot(_) => CircuitKind::Shot,
        }
    }

    pub fn public_inputs(&self) -> Vec<Fr> {
        match self {
            Self::Board(circuit) => circuit.public_inputs(),
            Self::Shot(circuit) => circuit.public_inputs(),
        }
    }

    /// Synthesizes the witness and checks every constraint.
    pub fn check_witness(&self) -> Result<(), ProofError> {
        let circuit = self.kind();
        let cs = ConstraintSystem::<Fr>::new_ref();
        self.clone()
            .generate_constraints(cs.clone())
            .map_err(|e| ProofError::ProvingFailure {
                circuit,
                reason: e.to_string(),
            })?;

        match cs.which_is_unsatisfied() {
            Ok(None) => {
                tracing::debug!(%circuit, constraints = cs.num_constraints(), "Witness satisfied");
                Ok(())
            }
            Ok(Some(constraint)) => Err(ProofError::ProvingFailure {
                circuit,
                reason: format!("constraint {constraint} is not satisfied"),
            }),
            Err(e) => Err(ProofError::CircuitProofError(e.to_string())),
        }
    }
}

impl From<&CircuitInputs> for BattleshipCircuit {
    fn from(inputs: &CircuitInputs) -> Self {
        match inputs {
            CircuitInputs::Board { commitment, board } => {
                Self::Board(BoardCircuit::new(*commitment, board.clone()))
            }
            CircuitInputs::Shot {
                commitment,
                board,
                shot,
                hit,
            } => Self::Shot(ShotCircuit::new(*commitment, board.clone(), *shot, *hit)),
        }
    }
}

impl ConstraintSynthesizer<Fr> for BattleshipCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        match self {
            Self::Board(circuit) => circuit.generate_constraints(cs),
            Self::Shot(circuit) => circuit.generate_constraints(cs),
        }
    }
}
