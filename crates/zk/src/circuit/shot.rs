//! Shot-consistency circuit.
//!
//! Public: `[commitment, x, y, hit]`. Private: the fleet.
//!
//! Enforces that the fleet hashes to the commitment, that the shot lies on
//! the board, and that `hit` equals the number of ship cells at the shot.
//! Overlap is ruled out by the board proof published with the commitment,
//! so that count is 0 or 1.

use ark_bn254::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::{FieldVar, fp::FpVar};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use game_core::{Board, Coordinate, GameConfig};

use super::gadgets::{alloc_fleet, enforce_commitment_gadget, enforce_on_board_gadget, fleet_cells};

#[derive(Clone, Debug)]
pub struct ShotCircuit {
    pub commitment: Fr,
    pub board: Board,
    pub shot: Coordinate,
    pub hit: bool,
}

impl ShotCircuit {
    pub fn new(commitment: Fr, board: Board, shot: Coordinate, hit: bool) -> Self {
        Self {
            commitment,
            board,
            shot,
            hit,
        }
    }

    pub fn public_inputs(&self) -> Vec<Fr> {
        vec![
            self.commitment,
            Fr::from(self.shot.x),
            Fr::from(self.shot.y),
            Fr::from(self.hit),
        ]
    }
}

impl ConstraintSynthesizer<Fr> for ShotCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // Allocation order fixes the public signal order.
        let commitment = FpVar::new_input(cs.clone(), || Ok(self.commitment))?;
        let x = FpVar::new_input(cs.clone(), || Ok(Fr::from(self.shot.x)))?;
        let y = FpVar::new_input(cs.clone(), || Ok(Fr::from(self.shot.y)))?;
        let hit = Boolean::new_input(cs.clone(), || Ok(self.hit))?;

        let fleet = alloc_fleet(cs, &self.board)?;
        enforce_commitment_gadget(&fleet, &commitment)?;

        enforce_on_board_gadget(&x)?;
        enforce_on_board_gadget(&y)?;
        let target = &x + &y * Fr::from(GameConfig::BOARD_SIZE);

        let mut hits = FpVar::zero();
        for cell in fleet_cells(&fleet) {
            hits += FpVar::from(cell.is_eq(&target)?);
        }
        hits.enforce_equal(&FpVar::from(hit))
    }
}
