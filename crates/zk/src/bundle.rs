//! Groth16 proof artifact plus public signals.
//!
//! [`ProofBundle`] keeps the three proof points in the snarkjs coordinate
//! layout (projective triples, `z` doubling as the infinity sentinel) but as
//! arbitrary-precision integers instead of strings, so nothing is lost to
//! lossy numeric types. [`SnarkjsProof`] is the string form found in
//! `proof.json` files produced by external provers.

use ark_bn254::{Bn254, Fr};
use ark_ff::PrimeField;
use ark_groth16::Proof;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::codec::parse_decimal;
use crate::curve::{CurveContext, g1_to_coords, g2_to_coords};
use crate::prover::ProofError;

/// Proof points and public signals of one proving request. Transient: it is
/// encoded and discarded, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofBundle {
    pub pi_a: [BigUint; 3],
    pub pi_b: [[BigUint; 2]; 3],
    pub pi_c: [BigUint; 3],
    pub public_signals: Vec<BigUint>,
}

/// snarkjs `proof.json` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnarkjsProof {
    pub pi_a: [String; 3],
    pub pi_b: [[String; 2]; 3],
    pub pi_c: [String; 3],
    pub protocol: String,
    pub curve: String,
}

impl ProofBundle {
    /// Converts an arkworks proof and its public inputs.
    pub fn from_ark(proof: &Proof<Bn254>, public_inputs: &[Fr]) -> Self {
        Self {
            pi_a: g1_to_coords(&proof.a),
            pi_b: g2_to_coords(&proof.b),
            pi_c: g1_to_coords(&proof.c),
            public_signals: public_inputs
                .iter()
                .map(|input| input.into_bigint().into())
                .collect(),
        }
    }

    /// Reconstructs the arkworks proof, validating every point.
    pub fn to_ark(&self) -> Result<Proof<Bn254>, ProofError> {
        let ctx = CurveContext::get();
        Ok(Proof {
            a: ctx.g1_from_coords(&self.pi_a)?,
            b: ctx.g2_from_coords(&self.pi_b)?,
            c: ctx.g1_from_coords(&self.pi_c)?,
        })
    }

    /// Public signals as scalar field elements.
    pub fn public_inputs(&self) -> Result<Vec<Fr>, ProofError> {
        let ctx = CurveContext::get();
        self.public_signals.iter().map(|signal| ctx.fr(signal)).collect()
    }

    /// Parses snarkjs output. Unparseable coordinates are point errors;
    /// unparseable signals are encoding errors.
    pub fn from_snarkjs(proof: &SnarkjsProof, public_signals: &[String]) -> Result<Self, ProofError> {
        Ok(Self {
            pi_a: coords3(&proof.pi_a)?,
            pi_b: [
                coords2(&proof.pi_b[0])?,
                coords2(&proof.pi_b[1])?,
                coords2(&proof.pi_b[2])?,
            ],
            pi_c: coords3(&proof.pi_c)?,
            public_signals: public_signals
                .iter()
                .map(|signal| parse_decimal(signal))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Renders the snarkjs layout and the decimal public signals.
    pub fn to_snarkjs(&self) -> (SnarkjsProof, Vec<String>) {
        let dec = |v: &BigUint| v.to_str_radix(10);
        let proof = SnarkjsProof {
            pi_a: self.pi_a.each_ref().map(dec),
            pi_b: self.pi_b.each_ref().map(|pair| pair.each_ref().map(dec)),
            pi_c: self.pi_c.each_ref().map(dec),
            protocol: "groth16".to_string(),
            curve: "bn128".to_string(),
        };
        let signals = self.public_signals.iter().map(dec).collect();
        (proof, signals)
    }
}

fn coordinate(value: &str) -> Result<BigUint, ProofError> {
    parse_decimal(value)
        .map_err(|_| ProofError::InvalidPoint(format!("coordinate {value:?} is not a base-10 integer")))
}

fn coords3(values: &[String; 3]) -> Result<[BigUint; 3], ProofError> {
    Ok([
        coordinate(&values[0])?,
        coordinate(&values[1])?,
        coordinate(&values[2])?,
    ])
}

fn coords2(values: &[String; 2]) -> Result<[BigUint; 2], ProofError> {
    Ok([coordinate(&values[0])?, coordinate(&values[1])?])
}
