//! R1CS gadgets shared by the board and shot circuits.
//!
//! This module provides reusable constraint gadgets for:
//! - MiMC-sponge hashing (circuit twin of [`crate::commitment`])
//! - Small-range membership checks for board coordinates
//! - Fleet allocation and cell index derivation

use ark_bn254::Fr;
use ark_ff::Field;
use ark_r1cs_std::R1CSVar;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::{FieldVar, fp::FpVar};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};
use game_core::{Board, GameConfig, Orientation};

use crate::commitment::{MIMC_ROUNDS, mimc_constants};

// ============================================================================
// MiMC Sponge Gadgets
// ============================================================================

/// One Feistel permutation (circuit version of `commitment::mimc_feistel`).
///
/// Each round costs three constraints: `t^2`, `t^4` and the combined
/// `t^4 * t = x_new - x_old`. The new state half is allocated explicitly so
/// linear combinations never chain across rounds.
pub fn mimc_feistel_gadget(
    xl: FpVar<Fr>,
    xr: FpVar<Fr>,
    k: &FpVar<Fr>,
) -> Result<(FpVar<Fr>, FpVar<Fr>), SynthesisError> {
    let cs = xl.cs().or(xr.cs()).or(k.cs());
    let (mut xl, mut xr) = (xl, xr);

    for (i, c) in mimc_constants().iter().enumerate() {
        let t = &xl + k + *c;
        let t2 = t.square()?;
        let t4 = t2.square()?;
        let mixed = FpVar::new_witness(cs.clone(), || {
            Ok(xr.value()? + t4.value()? * t.value()?)
        })?;
        t4.mul_equals(&t, &(&mixed - &xr))?;

        if i < MIMC_ROUNDS - 1 {
            xr = xl;
            xl = mixed;
        } else {
            xr = mixed;
        }
    }

    Ok((xl, xr))
}

/// Single-output MiMC sponge with key zero.
///
/// This is the R1CS version of `commitment::hash_many()`.
pub fn mimc_multi_hash_gadget(inputs: &[FpVar<Fr>]) -> Result<FpVar<Fr>, SynthesisError> {
    if inputs.is_empty() {
        return Err(SynthesisError::Unsatisfiable);
    }

    let key = FpVar::zero();
    let mut r = FpVar::zero();
    let mut c = FpVar::zero();
    for input in inputs {
        (r, c) = mimc_feistel_gadget(&r + input, c, &key)?;
    }
    Ok(r)
}

// ============================================================================
// Range and Distinctness Gadgets
// ============================================================================

/// Enforces `value ∈ {0, 1, ..., bound - 1}` via `Π (value - i) = 0`.
pub fn enforce_small_range_gadget(value: &FpVar<Fr>, bound: u8) -> Result<(), SynthesisError> {
    let mut acc = value.clone();
    for i in 1..bound {
        acc *= value - Fr::from(i);
    }
    acc.enforce_equal(&FpVar::zero())
}

/// Enforces `a != b` by exhibiting `(a - b)^-1`.
///
/// Unlike `EqGadget::enforce_not_equal`, an equal pair yields an unsatisfied
/// constraint instead of a missing assignment, so the witness checker can
/// report it.
pub fn enforce_distinct_gadget(a: &FpVar<Fr>, b: &FpVar<Fr>) -> Result<(), SynthesisError> {
    let diff = a - b;
    let inverse = FpVar::new_witness(diff.cs(), || {
        Ok(diff.value()?.inverse().unwrap_or_default())
    })?;
    diff.mul_equals(&inverse, &FpVar::one())
}

/// Enforces that a coordinate lies on the board.
pub fn enforce_on_board_gadget(value: &FpVar<Fr>) -> Result<(), SynthesisError> {
    enforce_small_range_gadget(value, GameConfig::BOARD_SIZE)
}

// ============================================================================
// Fleet Gadgets
// ============================================================================

/// Allocated placement of one ship.
#[derive(Clone)]
pub struct ShipVar {
    pub x: FpVar<Fr>,
    pub y: FpVar<Fr>,
    pub vertical: Boolean<Fr>,
    pub length: u8,
}

impl ShipVar {
    /// Orientation bit as a field element.
    pub fn z(&self) -> FpVar<Fr> {
        FpVar::from(self.vertical.clone())
    }

    /// Row-major index of cell `offset`: `x + i(1 - z) + 10(y + iz)`.
    ///
    /// Linear in the allocated variables, so no constraints are added.
    pub fn cell_index(&self, offset: u8) -> FpVar<Fr> {
        let size = Fr::from(GameConfig::BOARD_SIZE);
        let i = Fr::from(offset);
        &self.x + &self.y * size + i + self.z() * (i * (size - Fr::from(1u8)))
    }

    /// Last covered cell as `(x, y)`.
    pub fn end(&self) -> (FpVar<Fr>, FpVar<Fr>) {
        let extent = Fr::from(self.length - 1);
        let z = self.z();
        let end_x = &self.x + (FpVar::one() - &z) * extent;
        let end_y = &self.y + z * extent;
        (end_x, end_y)
    }
}

/// Allocates the private fleet. Orientation bits are constrained boolean.
pub fn alloc_fleet(
    cs: ConstraintSystemRef<Fr>,
    board: &Board,
) -> Result<Vec<ShipVar>, SynthesisError> {
    board
        .ships()
        .iter()
        .zip(GameConfig::SHIP_LENGTHS)
        .map(|(ship, length)| {
            Ok(ShipVar {
                x: FpVar::new_witness(cs.clone(), || Ok(Fr::from(ship.x)))?,
                y: FpVar::new_witness(cs.clone(), || Ok(Fr::from(ship.y)))?,
                vertical: Boolean::new_witness(cs.clone(), || {
                    Ok(ship.orientation == Orientation::Vertical)
                })?,
                length,
            })
        })
        .collect()
}

/// Hash inputs in commitment order: `[x0, y0, z0, x1, y1, z1, ...]`.
pub fn fleet_hash_inputs(fleet: &[ShipVar]) -> Vec<FpVar<Fr>> {
    fleet
        .iter()
        .flat_map(|ship| [ship.x.clone(), ship.y.clone(), ship.z()])
        .collect()
}

/// Cell indices of every ship cell, in placement order.
pub fn fleet_cells(fleet: &[ShipVar]) -> Vec<FpVar<Fr>> {
    fleet
        .iter()
        .flat_map(|ship| (0..ship.length).map(move |i| ship.cell_index(i)))
        .collect()
}

/// Enforces that the fleet hashes to `commitment`.
pub fn enforce_commitment_gadget(
    fleet: &[ShipVar],
    commitment: &FpVar<Fr>,
) -> Result<(), SynthesisError> {
    mimc_multi_hash_gadget(&fleet_hash_inputs(fleet))?.enforce_equal(commitment)
}
