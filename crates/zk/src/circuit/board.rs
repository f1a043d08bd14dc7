//! Board-validity circuit.
//!
//! Public: `[commitment]`. Private: the fleet.
//!
//! Enforces that the fleet hashes to the commitment, that every ship lies on
//! the board, and that no two ship cells coincide.

use ark_bn254::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use game_core::Board;

use super::gadgets::{
    alloc_fleet, enforce_commitment_gadget, enforce_distinct_gadget, enforce_on_board_gadget,
    fleet_cells,
};

#[derive(Clone, Debug)]
pub struct BoardCircuit {
    pub commitment: Fr,
    pub board: Board,
}

impl BoardCircuit {
    pub fn new(commitment: Fr, board: Board) -> Self {
        Self { commitment, board }
    }

    pub fn public_inputs(&self) -> Vec<Fr> {
        vec![self.commitment]
    }
}

impl ConstraintSynthesizer<Fr> for BoardCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let commitment = FpVar::new_input(cs.clone(), || Ok(self.commitment))?;
        let fleet = alloc_fleet(cs, &self.board)?;

        enforce_commitment_gadget(&fleet, &commitment)?;

        // A straight ship is on the board iff both ends are.
        for ship in &fleet {
            let (end_x, end_y) = ship.end();
            enforce_on_board_gadget(&ship.x)?;
            enforce_on_board_gadget(&ship.y)?;
            enforce_on_board_gadget(&end_x)?;
            enforce_on_board_gadget(&end_y)?;
        }

        let cells = fleet_cells(&fleet);
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                enforce_distinct_gadget(a, b)?;
            }
        }

        Ok(())
    }
}
