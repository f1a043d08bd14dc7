//! Scalar codec: decimal strings ↔ fixed-width byte buffers.
//!
//! Proof coordinates and public signals travel as base-10 strings (the
//! snarkjs convention). The verifier wants fixed-width big-endian buffers,
//! while arkworks emits little-endian compressed points, so every block
//! crossing that boundary goes through [`reverse_bytes`].

use num_bigint::BigUint;

/// Width of a serialized BN254 scalar or base field element.
pub const FIELD_BYTES: usize = 32;

/// Malformed scalar input. Non-fatal: the caller fixes the input and retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("not a base-10 integer: {0:?}")]
    InvalidDecimal(String),

    #[error("value needs {needed} bytes but the buffer is {width} bytes wide")]
    Overflow { needed: usize, width: usize },

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// Parses a non-negative base-10 integer. Leading `+`, whitespace, signs and
/// empty strings are rejected.
pub fn parse_decimal(value: &str) -> Result<BigUint, EncodingError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EncodingError::InvalidDecimal(value.to_string()));
    }
    BigUint::parse_bytes(value.as_bytes(), 10)
        .ok_or_else(|| EncodingError::InvalidDecimal(value.to_string()))
}

/// Big-endian, zero-padded to `width` bytes.
pub fn decimal_to_bytes(value: &str, width: usize) -> Result<Vec<u8>, EncodingError> {
    biguint_to_bytes(&parse_decimal(value)?, width)
}

/// Big-endian, zero-padded to `width` bytes.
pub fn biguint_to_bytes(value: &BigUint, width: usize) -> Result<Vec<u8>, EncodingError> {
    // to_bytes_be() yields [0] for zero
    let raw = value.to_bytes_be();
    let raw: &[u8] = if raw == [0] { &[] } else { &raw };
    if raw.len() > width {
        return Err(EncodingError::Overflow {
            needed: raw.len(),
            width,
        });
    }
    let mut out = vec![0u8; width - raw.len()];
    out.extend_from_slice(raw);
    Ok(out)
}

pub fn bytes_to_biguint(be_bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(be_bytes)
}

pub fn bytes_to_decimal(be_bytes: &[u8]) -> String {
    bytes_to_biguint(be_bytes).to_str_radix(10)
}

pub fn reverse_bytes(buf: &[u8]) -> Vec<u8> {
    buf.iter().rev().copied().collect()
}

/// Lowercase hex without prefix.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Accepts an optional `0x` prefix.
pub fn from_hex(value: &str) -> Result<Vec<u8>, EncodingError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(stripped).map_err(|e| EncodingError::InvalidHex(e.to_string()))
}
