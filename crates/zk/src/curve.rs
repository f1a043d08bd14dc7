//! Process-wide BN254 arithmetic context.
//!
//! Holds the field moduli as big integers plus the Fq2 constants used to read
//! the projective `z` sentinels of a snarkjs proof. Built once on first use
//! and shared read-only by every encoder and verifier in the process.

use std::sync::OnceLock;

use ark_bn254::{Fq, Fq2, Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{One, PrimeField, Zero};
use num_bigint::BigUint;

use crate::prover::ProofError;

static CURVE_CONTEXT: OnceLock<CurveContext> = OnceLock::new();

/// Cached curve constants.
#[derive(Debug)]
pub struct CurveContext {
    base_modulus: BigUint,
    scalar_modulus: BigUint,
    fq2_one: Fq2,
    fq2_zero: Fq2,
}

impl CurveContext {
    /// Returns the shared context, initializing it on first call.
    pub fn get() -> &'static CurveContext {
        CURVE_CONTEXT.get_or_init(|| {
            tracing::debug!("Initializing BN254 curve context");
            CurveContext {
                base_modulus: Fq::MODULUS.into(),
                scalar_modulus: Fr::MODULUS.into(),
                fq2_one: Fq2::one(),
                fq2_zero: Fq2::zero(),
            }
        })
    }

    pub fn base_modulus(&self) -> &BigUint {
        &self.base_modulus
    }

    pub fn scalar_modulus(&self) -> &BigUint {
        &self.scalar_modulus
    }

    /// Base field element, rejecting non-canonical values.
    pub fn fq(&self, value: &BigUint) -> Result<Fq, ProofError> {
        if value >= &self.base_modulus {
            return Err(ProofError::InvalidPoint(format!(
                "coordinate {value} exceeds the base field modulus"
            )));
        }
        Ok(Fq::from(value.clone()))
    }

    /// Scalar field element, rejecting non-canonical values.
    pub fn fr(&self, value: &BigUint) -> Result<Fr, ProofError> {
        if value >= &self.scalar_modulus {
            return Err(ProofError::InvalidPoint(format!(
                "public signal {value} exceeds the scalar field modulus"
            )));
        }
        Ok(Fr::from(value.clone()))
    }

    pub fn fq2(&self, c0: &BigUint, c1: &BigUint) -> Result<Fq2, ProofError> {
        Ok(Fq2::new(self.fq(c0)?, self.fq(c1)?))
    }

    /// Rebuilds a G1 point from `[x, y, z]`.
    ///
    /// `z = 0` is the point at infinity, `z = 1` an affine point, any other
    /// `z` a Jacobian coordinate triple.
    pub fn g1_from_coords(&self, coords: &[BigUint; 3]) -> Result<G1Affine, ProofError> {
        let [x, y, z] = coords;
        let (x, y, z) = (self.fq(x)?, self.fq(y)?, self.fq(z)?);

        let point = if z.is_zero() {
            G1Affine::zero()
        } else if z.is_one() {
            G1Affine::new_unchecked(x, y)
        } else {
            G1Projective::new_unchecked(x, y, z).into_affine()
        };
        check_point("G1", point.is_on_curve(), point.is_in_correct_subgroup_assuming_on_curve())?;
        Ok(point)
    }

    /// Rebuilds a G2 point from `[[x0, x1], [y0, y1], [z0, z1]]`.
    ///
    /// `z = ("1", "0")` is the Fq2 identity (affine), `z = ("0", "0")` the
    /// point at infinity.
    pub fn g2_from_coords(&self, coords: &[[BigUint; 2]; 3]) -> Result<G2Affine, ProofError> {
        let [[x0, x1], [y0, y1], [z0, z1]] = coords;
        let x = self.fq2(x0, x1)?;
        let y = self.fq2(y0, y1)?;
        let z = self.fq2(z0, z1)?;

        let point = if z == self.fq2_zero {
            G2Affine::zero()
        } else if z == self.fq2_one {
            G2Affine::new_unchecked(x, y)
        } else {
            G2Projective::new_unchecked(x, y, z).into_affine()
        };
        check_point("G2", point.is_on_curve(), point.is_in_correct_subgroup_assuming_on_curve())?;
        Ok(point)
    }
}

fn check_point(group: &str, on_curve: bool, in_subgroup: bool) -> Result<(), ProofError> {
    if !on_curve {
        return Err(ProofError::InvalidPoint(format!("{group} point is not on the curve")));
    }
    if !in_subgroup {
        return Err(ProofError::InvalidPoint(format!(
            "{group} point is not in the prime-order subgroup"
        )));
    }
    Ok(())
}

/// Affine G1 point as snarkjs-style `[x, y, z]` integers.
pub fn g1_to_coords(point: &G1Affine) -> [BigUint; 3] {
    match point.xy() {
        Some((x, y)) => [x.into_bigint().into(), y.into_bigint().into(), BigUint::from(1u8)],
        None => [BigUint::from(0u8), BigUint::from(1u8), BigUint::from(0u8)],
    }
}

/// Affine G2 point as snarkjs-style `[[x0, x1], [y0, y1], [z0, z1]]` integers.
pub fn g2_to_coords(point: &G2Affine) -> [[BigUint; 2]; 3] {
    let zero = || BigUint::from(0u8);
    let one = || BigUint::from(1u8);
    match point.xy() {
        Some((x, y)) => [
            [x.c0.into_bigint().into(), x.c1.into_bigint().into()],
            [y.c0.into_bigint().into(), y.c1.into_bigint().into()],
            [one(), zero()],
        ],
        None => [[zero(), zero()], [one(), zero()], [zero(), zero()]],
    }
}
