//! MiMC-sponge board commitments over the BN254 scalar field.
//!
//! The sponge is the circomlib construction: a 220-round Feistel network with
//! an `x^5` round function, key `0`, and round constants drawn from an
//! iterated Keccak-256 chain seeded with `"mimcsponge"` (first and last
//! constant forced to zero). Inputs are absorbed one at a time into the left
//! half of the state; the first output is the left half after the last
//! absorption.
//!
//! # Consistency with Circuit
//!
//! [`multi_hash`] must match `circuit::gadgets::mimc_multi_hash_gadget`.
//! Validated by `tests/mimc_consistency.rs`.

use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_ff::{BigInteger, Field, PrimeField, Zero};
use game_core::Board;
use sha3::{Digest, Keccak256};

use crate::codec::FIELD_BYTES;

pub const MIMC_ROUNDS: usize = 220;
const MIMC_SEED: &[u8] = b"mimcsponge";

/// Cached round constants.
static MIMC_CONSTANTS: OnceLock<Vec<Fr>> = OnceLock::new();

/// Round constants, computed on first use.
pub fn mimc_constants() -> &'static [Fr] {
    MIMC_CONSTANTS.get_or_init(|| {
        let mut constants = vec![Fr::zero(); MIMC_ROUNDS];
        let mut digest = Keccak256::digest(MIMC_SEED);
        for constant in constants.iter_mut().take(MIMC_ROUNDS - 1).skip(1) {
            digest = Keccak256::digest(digest);
            *constant = Fr::from_be_bytes_mod_order(&digest);
        }
        constants
    })
}

/// One Feistel permutation of `(xl, xr)` under key `k`.
pub fn mimc_feistel(mut xl: Fr, mut xr: Fr, k: Fr) -> (Fr, Fr) {
    for (i, c) in mimc_constants().iter().enumerate() {
        let t = xl + k + c;
        let t2 = t.square();
        let t5 = t2.square() * t;
        if i < MIMC_ROUNDS - 1 {
            (xl, xr) = (xr + t5, xl);
        } else {
            xr += t5;
        }
    }
    (xl, xr)
}

/// Sponge over `inputs`, squeezing `outputs` elements.
pub fn multi_hash(inputs: &[Fr], key: Fr, outputs: usize) -> Vec<Fr> {
    let (mut r, mut c) = (Fr::zero(), Fr::zero());
    for input in inputs {
        (r, c) = mimc_feistel(r + input, c, key);
    }

    let mut out = Vec::with_capacity(outputs);
    if outputs > 0 {
        out.push(r);
    }
    for _ in 1..outputs {
        (r, c) = mimc_feistel(r, c, key);
        out.push(r);
    }
    out
}

/// Single-output sponge with key zero.
pub fn hash_many(inputs: &[Fr]) -> Fr {
    let (mut r, mut c) = (Fr::zero(), Fr::zero());
    for input in inputs {
        (r, c) = mimc_feistel(r + input, c, Fr::zero());
    }
    r
}

/// Flattened placement triples as field elements.
pub fn board_inputs(board: &Board) -> Vec<Fr> {
    board.flatten().into_iter().map(Fr::from).collect()
}

/// Board commitment.
pub fn commit(board: &Board) -> Fr {
    hash_many(&board_inputs(board))
}

/// Commitment as a 32-byte big-endian buffer (the on-ledger layout).
pub fn commitment_bytes(board: &Board) -> [u8; FIELD_BYTES] {
    field_to_bytes(&commit(board))
}

pub fn commitment_decimal(board: &Board) -> String {
    commit(board).into_bigint().to_string()
}

/// Canonical 32-byte big-endian encoding of a scalar.
pub fn field_to_bytes(value: &Fr) -> [u8; FIELD_BYTES] {
    let mut out = [0u8; FIELD_BYTES];
    out.copy_from_slice(&value.into_bigint().to_bytes_be());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Orientation, ShipPlacement};

    fn board() -> Board {
        Board::new([
            ShipPlacement::horizontal(0, 0),
            ShipPlacement::vertical(9, 1),
            ShipPlacement::horizontal(2, 4),
            ShipPlacement::vertical(0, 6),
            ShipPlacement::horizontal(5, 9),
        ])
    }

    #[test]
    fn constants_have_zero_ends() {
        let constants = mimc_constants();
        assert_eq!(constants.len(), MIMC_ROUNDS);
        assert!(constants[0].is_zero());
        assert!(constants[MIMC_ROUNDS - 1].is_zero());
        assert!(!constants[1].is_zero());
        assert_ne!(constants[1], constants[2]);
    }

    #[test]
    fn commitment_is_deterministic() {
        assert_eq!(commit(&board()), commit(&board().clone()));
        assert_eq!(commitment_bytes(&board()), commitment_bytes(&board()));
    }

    #[test]
    fn any_field_change_moves_the_commitment() {
        let base = commit(&board());
        let mut ships = *board().ships();

        ships[2].x += 1;
        assert_ne!(commit(&Board::new(ships)), base);

        let mut ships = *board().ships();
        ships[4].orientation = Orientation::Vertical;
        assert_ne!(commit(&Board::new(ships)), base);
    }

    #[test]
    fn ship_order_matters() {
        let mut ships = *board().ships();
        ships.swap(2, 3);
        assert_ne!(commit(&Board::new(ships)), commit(&board()));
    }

    #[test]
    fn first_output_matches_hash_many() {
        let inputs = board_inputs(&board());
        let outs = multi_hash(&inputs, Fr::zero(), 3);
        assert_eq!(outs.len(), 3);
        assert_eq!(outs[0], hash_many(&inputs));
        assert_ne!(outs[1], outs[2]);
    }

    #[test]
    fn decimal_and_bytes_agree() {
        let decimal = commitment_decimal(&board());
        let bytes = commitment_bytes(&board());
        assert_eq!(crate::codec::bytes_to_decimal(&bytes), decimal);
    }
}
